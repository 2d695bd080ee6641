//! Release registry models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One published, versioned artifact record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Release {
    /// Unique version identifier, always normalized with a `v` prefix
    pub version: String,
    /// Stored artifact name, derived deterministically from the version
    pub filename: String,
    /// Free-text release notes
    #[serde(default)]
    pub notes: String,
    /// Set at publish time, replaced wholesale on re-publish
    pub created_at: DateTime<Utc>,
}

/// Singleton registry document: all releases plus the advertised version.
///
/// Invariant: when `latest` is `Some`, it names a version present in `items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseRegistry {
    pub latest: Option<String>,
    #[serde(default)]
    pub items: Vec<Release>,
}

impl ReleaseRegistry {
    /// Look up a release by its already-normalized version.
    pub fn find(&self, version: &str) -> Option<&Release> {
        self.items.iter().find(|r| r.version == version)
    }

    /// The release currently advertised to polling bots, if any.
    pub fn latest_release(&self) -> Option<&Release> {
        self.latest.as_deref().and_then(|v| self.find(v))
    }
}

/// Metadata of a deleted release, kept for the owner's records.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrashEntry {
    pub version: String,
    pub filename: String,
    #[serde(default)]
    pub notes: String,
    pub deleted_at: DateTime<Utc>,
}
