//! An in‑process stand‑in for `skillswap_core::blob::BlobStore`.
//!
//! Hands out `mem://photos/<n>.<ext>` URLs and remembers every upload so
//! tests can assert on what reached the store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use skillswap_core::blob::{BlobStore, PhotoUpload};
use skillswap_core::BlobError;

#[derive(Clone, Default)]
pub struct FakeBlobStore {
    /// Every payload the manager stored, in order.
    pub uploads: Arc<Mutex<Vec<Vec<u8>>>>,
    /// URLs the manager asked to delete.
    pub deleted: Arc<Mutex<Vec<String>>>,
}

impl FakeBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn put(&self, upload: PhotoUpload) -> Result<String, BlobError> {
        let ext = upload.extension()?;
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(upload.bytes);
        Ok(format!("mem://photos/{}.{ext}", uploads.len()))
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        self.deleted.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
