//! # tv-thumbs-image
//! twinview/crates/tv-plugins/tv-thumbs-image/src/lib.rs
//! `image`-rs implementation of `Thumbnailer`.
//! Features: format sniffing, color normalization, downscale-only resize, PNG output.

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat, ImageReader};
use tv_core::error::{AppError, Result};
use tv_core::traits::Thumbnailer;

/// Longest edge of a generated preview, in pixels.
pub const DEFAULT_MAX_EDGE: u32 = 128;

pub struct PngThumbnailer {
    max_edge: u32,
}

impl Default for PngThumbnailer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EDGE)
    }
}

impl PngThumbnailer {
    pub fn new(max_edge: u32) -> Self {
        Self { max_edge: max_edge.max(1) }
    }

    /// Sniffs the format from the content, falling back to the extension
    /// of `filename` for formats with no magic bytes.
    fn decode(filename: &str, data: &[u8]) -> Result<DynamicImage> {
        let mut reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| AppError::DecodeError(e.to_string()))?;
        if reader.format().is_none() {
            let format = ImageFormat::from_path(filename)
                .map_err(|e| AppError::DecodeError(format!("{filename}: {e}")))?;
            reader.set_format(format);
        }
        reader.decode().map_err(|e| AppError::DecodeError(e.to_string()))
    }

    /// PNG takes 8-bit gray, RGB and RGBA as-is. Anything else (gray+alpha,
    /// 16-bit, float) is widened to RGBA8 so transparency survives.
    fn normalize(img: DynamicImage) -> DynamicImage {
        match img {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
            other => DynamicImage::ImageRgba8(other.to_rgba8()),
        }
    }

    /// Shrinks to fit `max_edge` on both axes. Never enlarges.
    fn shrink(&self, img: DynamicImage) -> DynamicImage {
        if img.width() <= self.max_edge && img.height() <= self.max_edge {
            return img;
        }
        img.thumbnail(self.max_edge, self.max_edge)
    }

    fn encode(img: &DynamicImage) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
        img.write_with_encoder(encoder)
            .map_err(|e| AppError::EncodeError(e.to_string()))?;
        Ok(out)
    }
}

impl Thumbnailer for PngThumbnailer {
    fn generate(&self, filename: &str, data: &[u8]) -> Result<Vec<u8>> {
        let img = Self::decode(filename, data)?;
        let (w, h) = (img.width(), img.height());
        let thumb = self.shrink(Self::normalize(img));
        log::trace!("thumbnail {}x{} -> {}x{}", w, h, thumb.width(), thumb.height());
        Self::encode(&thumb)
    }

    fn content_type(&self) -> &'static str {
        "image/png"
    }
}
