//! Release registry operations.
//!
//! Owns the version -> release mapping and the `latest` pointer. Every
//! operation loads the registry document, mutates it, and writes it back;
//! see `store` for the consistency caveats.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Release, ReleaseRegistry, TrashEntry};
use crate::store::DataStore;
use crate::version;

/// Whether a publish created a new slot or replaced an existing one.
///
/// Version numbers are not append-only history here: re-publishing a version
/// silently discards its previous artifact, so callers can surface which
/// path was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Replaced,
}

/// Release registry service.
pub struct RegistryService<'a> {
    store: &'a DataStore,
}

impl<'a> RegistryService<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Publish a release: upsert by normalized version, then advertise it.
    ///
    /// `latest` is set unconditionally — there is no draft state, every
    /// upload immediately becomes the version the fleet is told about.
    pub async fn publish(
        &self,
        version: &str,
        filename: &str,
        notes: &str,
    ) -> Result<(Release, PublishOutcome)> {
        let version = version::normalize(version);
        let release = Release {
            version: version.clone(),
            filename: filename.to_string(),
            notes: notes.to_string(),
            created_at: Utc::now(),
        };

        let mut registry = self.store.load_registry().await?;
        let outcome = match registry.items.iter_mut().find(|r| r.version == version) {
            Some(existing) => {
                *existing = release.clone();
                PublishOutcome::Replaced
            }
            None => {
                registry.items.push(release.clone());
                PublishOutcome::Created
            }
        };
        registry.latest = Some(version);
        self.store.save_registry(&registry).await?;

        Ok((release, outcome))
    }

    /// Point `latest` back at an existing version without touching `items`.
    pub async fn revert(&self, version: &str) -> Result<Release> {
        let version = version::normalize(version);

        let mut registry = self.store.load_registry().await?;
        let release = registry
            .find(&version)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Release {} not found", version)))?;

        registry.latest = Some(version);
        self.store.save_registry(&registry).await?;

        Ok(release)
    }

    /// Remove a release from the registry, recording it in the trash.
    ///
    /// When the deleted version was `latest`, the pointer moves to the
    /// remaining release with the most recent `created_at`, or `None` when
    /// nothing remains — it never dangles.
    pub async fn delete(&self, version: &str) -> Result<Release> {
        let version = version::normalize(version);

        let mut registry = self.store.load_registry().await?;
        let idx = registry
            .items
            .iter()
            .position(|r| r.version == version)
            .ok_or_else(|| AppError::NotFound(format!("Release {} not found", version)))?;
        let removed = registry.items.remove(idx);

        if registry.latest.as_deref() == Some(version.as_str()) {
            registry.latest = registry
                .items
                .iter()
                .max_by_key(|r| r.created_at)
                .map(|r| r.version.clone());
        }
        self.store.save_registry(&registry).await?;

        let mut trash = self.store.load_trash().await?;
        trash.push(TrashEntry {
            version: removed.version.clone(),
            filename: removed.filename.clone(),
            notes: removed.notes.clone(),
            deleted_at: Utc::now(),
        });
        self.store.save_trash(&trash).await?;

        Ok(removed)
    }

    /// All releases in numeric-aware version order.
    pub async fn list(&self) -> Result<Vec<Release>> {
        let mut registry = self.store.load_registry().await?;
        registry
            .items
            .sort_by(|a, b| version::compare(&a.version, &b.version));
        Ok(registry.items)
    }

    pub async fn load(&self) -> Result<ReleaseRegistry> {
        self.store.load_registry().await
    }
}
