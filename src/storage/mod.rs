//! Artifact storage backends.

pub mod filesystem;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Derive the stored artifact name from a normalized version.
pub fn artifact_filename(version: &str) -> String {
    format!("bot-{}.zip", version)
}

/// Artifact storage backend trait
#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    /// Store an artifact under the given filename, replacing any previous one
    async fn put(&self, filename: &str, content: Bytes) -> Result<()>;

    /// Retrieve an artifact by filename
    async fn get(&self, filename: &str) -> Result<Bytes>;

    /// Check if an artifact exists
    async fn exists(&self, filename: &str) -> Result<bool>;

    /// Delete an artifact by filename
    async fn delete(&self, filename: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_filename_is_deterministic() {
        assert_eq!(artifact_filename("v1.0"), "bot-v1.0.zip");
        assert_eq!(artifact_filename("v2.13"), "bot-v2.13.zip");
    }
}
