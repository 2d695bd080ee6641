//! Owner-registered bot profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A bot registered by the owner, with its Discord token encrypted at rest.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BotProfile {
    /// Display name
    pub name: String,
    /// Discord id of the account operating the bot
    pub owner_id: String,
    /// AES-256-GCM ciphertext of the bot token, base64-encoded
    pub token_encrypted: String,
    #[serde(default)]
    pub notes: String,
    /// Last time the bot reported coming online
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ready: Option<DateTime<Utc>>,
    /// Last time the bot reported anything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check: Option<DateTime<Utc>>,
    #[serde(default)]
    pub restarts: u64,
    #[serde(default)]
    pub errors: u64,
    pub created_at: DateTime<Utc>,
}

/// Singleton document: registered profiles keyed by bot id.
pub type BotRoster = BTreeMap<String, BotProfile>;

/// Self-reported bot lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Ready,
    Restart,
    Error,
}

impl BotProfile {
    /// Apply a lifecycle report to the profile counters.
    pub fn apply_report(&mut self, kind: ReportKind, at: DateTime<Utc>) {
        self.last_check = Some(at);
        match kind {
            ReportKind::Ready => self.last_ready = Some(at),
            ReportKind::Restart => self.restarts += 1,
            ReportKind::Error => self.errors += 1,
        }
    }
}
