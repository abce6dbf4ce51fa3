//! # tv-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.

use std::sync::Arc;

use actix_multipart::{Field, Multipart};
use actix_web::{http::header, web, HttpResponse};
use askama::Template;
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt as _;
use serde::Serialize;
use tv_core::models::{ImageId, ImageMeta};
use tv_core::traits::{ImageRepo, Thumbnailer};
use tv_core::AppError;
use tv_ui::IndexTemplate;
use uuid::Uuid;

use crate::error::ApiError;

/// Multipart field carrying the uploaded files.
pub const UPLOAD_FIELD: &str = "files[]";

/// Extensions accepted by `/upload`, compared case-insensitively.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tga", "tiff"];

/// Per-file cap used when the binary does not configure one.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub repo: Box<dyn ImageRepo>,
    pub thumbs: Arc<dyn Thumbnailer>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(repo: Box<dyn ImageRepo>, thumbs: Arc<dyn Thumbnailer>) -> Self {
        Self {
            repo,
            thumbs,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}

#[derive(Serialize)]
struct CountResp {
    status: &'static str,
    count: usize,
}

#[derive(Serialize)]
struct ToggleResp {
    status: &'static str,
    active: bool,
}

#[derive(Serialize)]
struct ListResp {
    images: Vec<ImageMeta>,
}

/// True when `filename` is non-empty and ends in an accepted extension.
pub fn is_allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ACCEPTED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Unknown and malformed ids are both reported as missing images.
fn parse_id(raw: &str) -> Result<ImageId, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::image_not_found(raw))
}

/// Reads a field to the end. Returns `None` when it grows past `limit`;
/// the rest of the field is still consumed so the next part can be read.
async fn read_field(field: &mut Field, limit: usize) -> Result<Option<Bytes>, ApiError> {
    let mut buf = BytesMut::new();
    let mut oversized = false;
    while let Some(chunk) = field.try_next().await? {
        if oversized {
            continue;
        }
        if buf.len() + chunk.len() > limit {
            oversized = true;
            buf.clear();
            continue;
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(if oversized { None } else { Some(buf.freeze()) })
}

/// Runs the thumbnailer on the blocking pool. Any failure yields the
/// original bytes so the upload itself still succeeds.
async fn thumbnail_or_original(thumbs: Arc<dyn Thumbnailer>, filename: &str, original: Bytes) -> Bytes {
    let input = original.clone();
    let hint = filename.to_string();
    match web::block(move || thumbs.generate(&hint, &input)).await {
        Ok(Ok(thumb)) => Bytes::from(thumb),
        Ok(Err(e)) => {
            log::warn!("thumbnail for {filename} failed, serving original: {e}");
            original
        }
        Err(e) => {
            log::warn!("thumbnail worker for {filename} failed, serving original: {e}");
            original
        }
    }
}

/// Accepts a multipart batch under `files[]`.
///
/// Files with no name, an unsupported extension, no content, or more than
/// `max_upload_bytes` are skipped. The call only fails when nothing in the
/// batch was accepted.
pub async fn upload(data: web::Data<AppState>, mut payload: Multipart) -> Result<HttpResponse, ApiError> {
    let mut attached = 0usize;
    let mut accepted = 0usize;

    while let Some(mut field) = payload.try_next().await? {
        let (is_upload, filename) = {
            let disposition = field.content_disposition();
            (
                disposition.get_name() == Some(UPLOAD_FIELD),
                disposition.get_filename().unwrap_or_default().to_string(),
            )
        };
        if !is_upload {
            read_field(&mut field, 0).await?;
            continue;
        }
        attached += 1;

        if !is_allowed_file(&filename) {
            log::debug!("skipping upload {:?}: unsupported name", filename);
            read_field(&mut field, 0).await?;
            continue;
        }

        let original = match read_field(&mut field, data.max_upload_bytes).await? {
            Some(bytes) if !bytes.is_empty() => bytes,
            Some(_) => {
                log::debug!("skipping upload {:?}: empty body", filename);
                continue;
            }
            None => {
                log::warn!("skipping upload {:?}: larger than {} bytes", filename, data.max_upload_bytes);
                continue;
            }
        };

        let thumbnail = thumbnail_or_original(data.thumbs.clone(), &filename, original.clone()).await;
        let id = data.repo.insert(filename, original, thumbnail).await?;
        log::debug!("stored image {id}");
        accepted += 1;
    }

    if attached == 0 {
        return Err(AppError::ValidationError("No files attached".into()).into());
    }
    if accepted == 0 {
        return Err(AppError::ValidationError("No supported images in upload".into()).into());
    }

    log::info!("uploaded {} of {} files", accepted, attached);
    Ok(HttpResponse::Ok().json(CountResp {
        status: "success",
        count: accepted,
    }))
}

/// Lists metadata for every stored image.
pub async fn list_images(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let images = data.repo.list_metadata().await?;
    Ok(HttpResponse::Ok().json(ListResp { images }))
}

/// Serves the original bytes with a content type guessed from the filename.
pub async fn get_image(data: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let file = data.repo.get_original_file(id).await?;
    let mime = mime_guess::from_path(&file.filename).first_or_octet_stream();

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, mime.essence_str().to_string()))
        .body(file.bytes))
}

pub async fn get_thumbnail(data: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let bytes = data.repo.get_thumbnail(id).await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, data.thumbs.content_type()))
        .body(bytes))
}

pub async fn toggle(data: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let active = data.repo.toggle(id).await?;
    log::debug!("image {id} active={active}");

    Ok(HttpResponse::Ok().json(ToggleResp {
        status: "success",
        active,
    }))
}

/// Deletes every inactive image.
pub async fn delete_deactivated(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let count = data.repo.purge_inactive().await?;
    log::info!("purged {count} inactive images");

    Ok(HttpResponse::Ok().json(CountResp {
        status: "success",
        count,
    }))
}

/// Renders the shell page for "/"
pub async fn index() -> Result<HttpResponse, ApiError> {
    let html = IndexTemplate {
        title: "TwinView",
        accepted: ACCEPTED_EXTENSIONS,
    }
    .render()
    .map_err(|e| AppError::Internal(format!("template rendering failed: {e}")))?;

    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}
