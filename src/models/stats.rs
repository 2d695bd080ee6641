//! Poll statistics models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Per-client telemetry entry, upserted on every poll.
///
/// `bot_id` keys are opaque strings supplied by the client and are not
/// authenticated; stats are advisory, not billing-grade.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BotRecord {
    /// Last version string the client reported having; `None` when the bot
    /// has only ever polled without a version parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_version: Option<String>,
    /// Timestamp of the most recent poll
    pub last_check: DateTime<Utc>,
    /// Latest version for which an obsolete notification was already sent;
    /// suppresses duplicate notifications for the same target version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_notified_for_version: Option<String>,
}

/// Singleton stats document.
///
/// Records grow without bound: bots are never expired or deleted
/// automatically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Poll counter, incremented once per query-endpoint call
    #[serde(default)]
    pub downloads: u64,
    /// Telemetry keyed by client-supplied bot id
    #[serde(default)]
    pub bots: BTreeMap<String, BotRecord>,
}
