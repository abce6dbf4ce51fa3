//! # tv-store-memory Implementation
//!
//! Process-scoped implementation of `ImageRepo`. Nothing is written to disk;
//! the table lives exactly as long as the `MemoryImageRepo` that owns it.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;
use tv_core::error::{AppError, Result};
use tv_core::models::{ImageFile, ImageId, ImageMeta, ImageRecord};
use tv_core::traits::ImageRepo;
use uuid::Uuid;

/// Lock-protected table of image records.
///
/// Keys are UUID v7, so iterating the map yields upload order.
#[derive(Default)]
pub struct MemoryImageRepo {
    records: RwLock<BTreeMap<ImageId, ImageRecord>>,
}

impl MemoryImageRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<ImageId, ImageRecord>>> {
        self.records
            .read()
            .map_err(|_| AppError::Internal("image table lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<ImageId, ImageRecord>>> {
        self.records
            .write()
            .map_err(|_| AppError::Internal("image table lock poisoned".into()))
    }
}

#[async_trait]
impl ImageRepo for MemoryImageRepo {
    async fn insert(&self, filename: String, original: Bytes, thumbnail: Bytes) -> Result<ImageId> {
        if original.is_empty() {
            return Err(AppError::ValidationError(format!("{filename} has no content")));
        }

        let mut table = self.write()?;
        // now_v7 is monotonic per process; the re-draw only matters if the clock steps back.
        let mut id = Uuid::now_v7();
        while table.contains_key(&id) {
            id = Uuid::now_v7();
        }
        table.insert(id, ImageRecord::new(id, filename, original, thumbnail));
        Ok(id)
    }

    async fn list_metadata(&self) -> Result<Vec<ImageMeta>> {
        Ok(self.read()?.values().map(ImageRecord::meta).collect())
    }

    async fn get_original_file(&self, id: ImageId) -> Result<ImageFile> {
        self.read()?
            .get(&id)
            .map(ImageRecord::original_file)
            .ok_or_else(|| AppError::image_not_found(id))
    }

    async fn get_original(&self, id: ImageId) -> Result<Bytes> {
        self.read()?
            .get(&id)
            .map(|r| r.original.clone())
            .ok_or_else(|| AppError::image_not_found(id))
    }

    async fn get_thumbnail(&self, id: ImageId) -> Result<Bytes> {
        self.read()?
            .get(&id)
            .map(|r| r.thumbnail.clone())
            .ok_or_else(|| AppError::image_not_found(id))
    }

    async fn toggle(&self, id: ImageId) -> Result<bool> {
        let mut table = self.write()?;
        let record = table.get_mut(&id).ok_or_else(|| AppError::image_not_found(id))?;
        record.active = !record.active;
        Ok(record.active)
    }

    async fn purge_inactive(&self) -> Result<usize> {
        let mut table = self.write()?;
        let before = table.len();
        table.retain(|_, r| r.active);
        let removed = before - table.len();
        log::debug!("purged {} inactive images, {} remain", removed, table.len());
        Ok(removed)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn payload(tag: &str) -> Bytes {
        Bytes::from(tag.as_bytes().to_vec())
    }

    async fn seed(repo: &MemoryImageRepo, name: &str) -> ImageId {
        repo.insert(name.to_string(), payload(name), payload("thumb"))
            .await
            .expect("insert failed")
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let repo = MemoryImageRepo::new();
        assert!(repo.is_empty().await.unwrap());

        let id = seed(&repo, "a.png").await;
        let listing = repo.list_metadata().await.unwrap();

        assert_eq!(listing, vec![ImageMeta { id, filename: "a.png".into(), active: true }]);
    }

    #[tokio::test]
    async fn test_listing_follows_upload_order() {
        let repo = MemoryImageRepo::new();
        let ids = vec![
            seed(&repo, "1.png").await,
            seed(&repo, "2.png").await,
            seed(&repo, "3.png").await,
        ];
        let listed: Vec<ImageId> = repo.list_metadata().await.unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_duplicate_filenames_are_distinct_records() {
        let repo = MemoryImageRepo::new();
        let a = seed(&repo, "same.png").await;
        let b = seed(&repo, "same.png").await;
        assert_ne!(a, b);
        assert_eq!(repo.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_original_rejected() {
        let repo = MemoryImageRepo::new();
        let err = repo
            .insert("empty.png".into(), Bytes::new(), Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(repo.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_returns_stored_bytes() {
        let repo = MemoryImageRepo::new();
        let id = seed(&repo, "a.png").await;

        let first = repo.get_original(id).await.unwrap();
        let second = repo.get_original(id).await.unwrap();
        assert_eq!(first.as_ref(), b"a.png");
        assert_eq!(first, second);
        assert_eq!(repo.get_thumbnail(id).await.unwrap().as_ref(), b"thumb");

        let file = repo.get_original_file(id).await.unwrap();
        assert_eq!(file.filename, "a.png");
        assert_eq!(file.bytes, first);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let repo = MemoryImageRepo::new();
        seed(&repo, "a.png").await;
        let ghost = Uuid::now_v7();

        assert!(matches!(repo.get_original_file(ghost).await, Err(AppError::NotFound(..))));
        assert!(matches!(repo.get_original(ghost).await, Err(AppError::NotFound(..))));
        assert!(matches!(repo.get_thumbnail(ghost).await, Err(AppError::NotFound(..))));
        assert!(matches!(repo.toggle(ghost).await, Err(AppError::NotFound(..))));
        assert_eq!(repo.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let repo = MemoryImageRepo::new();
        let id = seed(&repo, "a.png").await;

        assert!(!repo.toggle(id).await.unwrap());
        assert!(repo.toggle(id).await.unwrap());
        assert!(repo.list_metadata().await.unwrap()[0].active);
    }

    #[tokio::test]
    async fn test_purge_removes_only_inactive() {
        let repo = MemoryImageRepo::new();
        let keep = seed(&repo, "keep.png").await;
        let drop_a = seed(&repo, "a.png").await;
        let drop_b = seed(&repo, "b.png").await;
        repo.toggle(drop_a).await.unwrap();
        repo.toggle(drop_b).await.unwrap();

        assert_eq!(repo.purge_inactive().await.unwrap(), 2);

        let listing = repo.list_metadata().await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].id, keep);
        assert!(repo.get_original(keep).await.is_ok());
        assert!(matches!(repo.get_original(drop_a).await, Err(AppError::NotFound(..))));
        assert!(matches!(repo.get_original_file(drop_a).await, Err(AppError::NotFound(..))));
        assert_eq!(repo.get_original_file(keep).await.unwrap().filename, "keep.png");
        assert!(matches!(repo.get_thumbnail(drop_b).await, Err(AppError::NotFound(..))));

        // Nothing left to purge.
        assert_eq!(repo.purge_inactive().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_yield_unique_ids() {
        let repo = Arc::new(MemoryImageRepo::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                for j in 0..50 {
                    let name = format!("{i}-{j}.png");
                    ids.push(repo.insert(name.clone(), payload(&name), payload("t")).await.unwrap());
                }
                ids
            }));
        }

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(repo.len().await.unwrap(), 400);
    }
}
