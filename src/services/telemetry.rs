//! Bot poll telemetry.
//!
//! Every call to the public query endpoint counts as a poll and upserts the
//! calling bot's record. The query/mutation conflation is deliberate source
//! behavior and kept as-is.

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::Result;
use crate::models::BotRecord;
use crate::store::DataStore;
use crate::version;

/// Aggregate fleet counts derived on every poll.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct FleetCounts {
    pub total_bots: usize,
    pub up_to_date: usize,
    pub outdated: usize,
}

/// Result of recording one poll.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub counts: FleetCounts,
    /// Set when the bot is behind `latest` and has not yet been notified
    /// for this particular latest version; the caller owes exactly one
    /// obsolete notification.
    pub notify_obsolete: bool,
}

/// Telemetry tracker over the stats document.
pub struct TelemetryService<'a> {
    store: &'a DataStore,
}

impl<'a> TelemetryService<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Bump the poll counter without touching bot records (anonymous poll).
    pub async fn record_anonymous_poll(&self) -> Result<()> {
        let mut stats = self.store.load_stats().await?;
        stats.downloads += 1;
        self.store.save_stats(&stats).await
    }

    /// Record a poll: bump the counter, upsert the bot record, recompute
    /// aggregates against `latest`, and decide obsolete de-duplication.
    ///
    /// The de-duplication rule: a bot reporting the same stale version twice
    /// for the same `latest` triggers at most one notification; once
    /// `latest` changes, exactly one more may fire. A poll without a
    /// reported version only refreshes `last_check` and never counts as
    /// outdated. `bot_id` is client-supplied and unauthenticated.
    pub async fn record_poll(
        &self,
        bot_id: &str,
        reported_version: Option<&str>,
        latest: Option<&str>,
    ) -> Result<PollOutcome> {
        let reported = reported_version.map(version::normalize);
        let mut stats = self.store.load_stats().await?;
        stats.downloads += 1;

        let record = stats.bots.entry(bot_id.to_string()).or_insert(BotRecord {
            bot_version: None,
            last_check: Utc::now(),
            last_notified_for_version: None,
        });
        if reported.is_some() {
            record.bot_version = reported.clone();
        }
        record.last_check = Utc::now();

        let notify_obsolete = match (reported.as_deref(), latest) {
            (Some(reported), Some(latest)) if version::is_older(reported, latest) => {
                if record.last_notified_for_version.as_deref() != Some(latest) {
                    record.last_notified_for_version = Some(latest.to_string());
                    true
                } else {
                    false
                }
            }
            _ => false,
        };

        let total_bots = stats.bots.len();
        let up_to_date = match latest {
            Some(latest) => stats
                .bots
                .values()
                // an unknown version is not evidence of being outdated
                .filter(|r| {
                    !r.bot_version
                        .as_deref()
                        .is_some_and(|v| version::is_older(v, latest))
                })
                .count(),
            // no release yet: nobody can be outdated
            None => total_bots,
        };
        let counts = FleetCounts {
            total_bots,
            up_to_date,
            outdated: total_bots.saturating_sub(up_to_date),
        };

        self.store.save_stats(&stats).await?;

        Ok(PollOutcome {
            counts,
            notify_obsolete,
        })
    }
}
