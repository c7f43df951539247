use std::{io, path::PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use skillswap_core::blob::{BlobStore, PhotoUpload};
use skillswap_core::BlobError;
use uuid::Uuid;

/// Writes photos to a local directory that the HTTP server exposes as static files.
///
/// `put` returns `<public_base>/<uuid>.<ext>`; the server must serve `dir`
/// at `public_base`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    dir: PathBuf,
    public_base: String,
}

impl LocalBlobStore {
    pub fn new(dir: impl Into<PathBuf>, public_base: impl Into<String>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, upload: PhotoUpload) -> Result<String, BlobError> {
        let ext = upload.extension()?;
        let file_name = format!("{}.{ext}", Uuid::new_v4());
        tokio::fs::write(self.dir.join(&file_name), &upload.bytes).await?;

        info!("Stored {} byte photo as {}", upload.bytes.len(), file_name);
        Ok(format!("{}/{}", self.public_base, file_name))
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        let file_name = match url
            .strip_prefix(&self.public_base)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            Some(name) if !name.is_empty() && !name.contains(['/', '\\']) && name != ".." => name,
            _ => {
                debug!("Ignoring delete of foreign photo url {}", url);
                return Ok(());
            }
        };

        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => {
                info!("Removed photo {}", file_name);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
