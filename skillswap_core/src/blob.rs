use std::path::Path;

use async_trait::async_trait;

use crate::errors::BlobError;

/// Formats accepted for profile photos.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A photo as received from the client, before it reaches the blob store.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl PhotoUpload {
    /// Resolve the file extension from the file name, falling back to the content type.
    pub fn extension(&self) -> Result<&'static str, BlobError> {
        if self.bytes.is_empty() {
            return Err(BlobError::Empty);
        }

        let from_name = self
            .file_name
            .as_deref()
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let from_type = self.content_type.as_deref().map(|ct| match ct {
            "image/jpeg" | "image/jpg" => "jpg".to_string(),
            "image/png" => "png".to_string(),
            other => other.to_string(),
        });

        let candidate = from_name.or(from_type).unwrap_or_default();
        ALLOWED_EXTENSIONS
            .iter()
            .find(|allowed| **allowed == candidate)
            .copied()
            .ok_or(BlobError::UnsupportedFormat(candidate))
    }
}

/// Stores image bytes somewhere reachable and hands back a stable URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, upload: PhotoUpload) -> Result<String, BlobError>;

    /// Remove a blob previously returned by `put`. Unknown URLs are ignored.
    async fn delete(&self, url: &str) -> Result<(), BlobError>;
}
