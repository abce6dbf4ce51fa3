//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::models::{ImageFile, ImageId, ImageMeta};

/// Storage contract for uploaded images and their previews.
///
/// Every mutating call must appear atomic to concurrent readers: a listing
/// taken during a purge sees either the full pre-purge set or the post-purge
/// set.
#[async_trait]
pub trait ImageRepo: Send + Sync {
    /// Stores a new active record and returns its freshly generated id.
    async fn insert(&self, filename: String, original: Bytes, thumbnail: Bytes) -> Result<ImageId>;

    /// Metadata for every stored record, payloads excluded.
    async fn list_metadata(&self) -> Result<Vec<ImageMeta>>;

    /// Filename and original bytes, read together so a concurrent purge
    /// cannot split them. `NotFound` for unknown ids.
    async fn get_original_file(&self, id: ImageId) -> Result<ImageFile>;

    /// Full-resolution bytes. `NotFound` for unknown ids.
    async fn get_original(&self, id: ImageId) -> Result<Bytes>;

    /// Preview bytes. `NotFound` for unknown ids.
    async fn get_thumbnail(&self, id: ImageId) -> Result<Bytes>;

    /// Flips the active flag and returns the new value.
    async fn toggle(&self, id: ImageId) -> Result<bool>;

    /// Drops every inactive record, returning how many were removed.
    async fn purge_inactive(&self) -> Result<usize>;

    /// Number of stored records.
    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Preview generation contract.
///
/// Implementations are CPU-bound and synchronous; callers decide where
/// to run them.
pub trait Thumbnailer: Send + Sync {
    /// Encodes a bounded-size preview of `data`. `filename` is a format hint
    /// for containers without a signature (TGA); content sniffing wins.
    fn generate(&self, filename: &str, data: &[u8]) -> Result<Vec<u8>>;

    /// Content type of everything `generate` produces.
    fn content_type(&self) -> &'static str;
}
