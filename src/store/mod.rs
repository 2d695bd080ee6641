//! JSON document store.
//!
//! Four singleton documents live under the data directory: `releases.json`,
//! `stats.json`, `bots.json`, `trash.json`. Each mutating request does a full
//! read-modify-write of the relevant document. There is no cross-request
//! locking: concurrent writers race last-writer-wins, which is acceptable at
//! this system's load (a handful of bots, one owner). Writes go through a
//! temp file and a rename so a reader never observes a torn document.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{BotRoster, ReleaseRegistry, Stats, TrashEntry};

const RELEASES_DOC: &str = "releases.json";
const STATS_DOC: &str = "stats.json";
const BOTS_DOC: &str = "bots.json";
const TRASH_DOC: &str = "trash.json";

/// Typed access to the JSON documents under a data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Ensure the data directory exists.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    fn doc_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    async fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.doc_path(name);
        match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| AppError::Storage(format!("Corrupt document {}: {}", name, e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                name, e
            ))),
        }
    }

    async fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.doc_path(name);
        let tmp = self.doc_path(&format!("{}.tmp", name));
        let bytes = serde_json::to_vec_pretty(value)?;

        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp, &path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", name, e)))?;
        Ok(())
    }

    pub async fn load_registry(&self) -> Result<ReleaseRegistry> {
        self.load(RELEASES_DOC).await
    }

    pub async fn save_registry(&self, registry: &ReleaseRegistry) -> Result<()> {
        self.save(RELEASES_DOC, registry).await
    }

    pub async fn load_stats(&self) -> Result<Stats> {
        self.load(STATS_DOC).await
    }

    pub async fn save_stats(&self, stats: &Stats) -> Result<()> {
        self.save(STATS_DOC, stats).await
    }

    pub async fn load_bots(&self) -> Result<BotRoster> {
        self.load(BOTS_DOC).await
    }

    pub async fn save_bots(&self, bots: &BotRoster) -> Result<()> {
        self.save(BOTS_DOC, bots).await
    }

    pub async fn load_trash(&self) -> Result<Vec<TrashEntry>> {
        self.load(TRASH_DOC).await
    }

    pub async fn save_trash(&self, trash: &[TrashEntry]) -> Result<()> {
        self.save(TRASH_DOC, &trash).await
    }

    /// Whether the data directory is writable (used by the health check).
    pub async fn is_writable(&self) -> bool {
        let probe = self.doc_path(".probe");
        let ok = fs::write(&probe, b"ok").await.is_ok();
        if ok {
            let _ = fs::remove_file(&probe).await;
        }
        ok
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
