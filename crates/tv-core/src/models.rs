//! # Domain Models
//!
//! One `ImageRecord` exists per uploaded file. Records are keyed by a
//! UUID v7 so that sorting by id follows upload order.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier handed out at upload time.
pub type ImageId = Uuid;

/// A stored image together with its derived preview.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub id: ImageId,
    /// Client-supplied name. Display and MIME inference only, never a key.
    pub filename: String,
    /// Full-resolution payload exactly as uploaded.
    pub original: Bytes,
    /// Encoded preview, or a copy of `original` when thumbnailing failed.
    pub thumbnail: Bytes,
    pub active: bool,
}

impl ImageRecord {
    /// Builds a fresh record. New records are always active.
    pub fn new(id: ImageId, filename: String, original: Bytes, thumbnail: Bytes) -> Self {
        Self {
            id,
            filename,
            original,
            thumbnail,
            active: true,
        }
    }

    pub fn original_file(&self) -> ImageFile {
        ImageFile {
            filename: self.filename.clone(),
            bytes: self.original.clone(),
        }
    }

    pub fn meta(&self) -> ImageMeta {
        ImageMeta {
            id: self.id,
            filename: self.filename.clone(),
            active: self.active,
        }
    }
}

/// The payload-free view of a record returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMeta {
    pub id: ImageId,
    pub filename: String,
    pub active: bool,
}

/// An original payload together with the name it was uploaded under.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub filename: String,
    pub bytes: Bytes,
}
