//! Filesystem artifact storage.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::ArtifactStorage;
use crate::error::{AppError, Result};

/// Filesystem-based artifact storage.
///
/// Uploads land in a temp file beside the target and are renamed into place,
/// so a polling bot downloading mid-upload never sees a half-written ZIP.
pub struct FilesystemStorage {
    base_path: PathBuf,
}

impl FilesystemStorage {
    /// Create new filesystem storage
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn file_path(&self, filename: &str) -> PathBuf {
        self.base_path.join(filename)
    }
}

#[async_trait]
impl ArtifactStorage for FilesystemStorage {
    async fn put(&self, filename: &str, content: Bytes) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.file_path(filename);
        let tmp = self.file_path(&format!("{}.tmp", filename));

        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&content).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp, &path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to place {}: {}", filename, e)))?;

        Ok(())
    }

    async fn get(&self, filename: &str) -> Result<Bytes> {
        let path = self.file_path(filename);
        let content = fs::read(&path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read {}: {}", filename, e)))?;
        Ok(Bytes::from(content))
    }

    async fn exists(&self, filename: &str) -> Result<bool> {
        Ok(self.file_path(filename).exists())
    }

    async fn delete(&self, filename: &str) -> Result<()> {
        fs::remove_file(self.file_path(filename))
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete {}: {}", filename, e)))?;
        Ok(())
    }
}
