//! Persisted data models.

pub mod bot;
pub mod release;
pub mod stats;

pub use bot::{BotProfile, BotRoster, ReportKind};
pub use release::{Release, ReleaseRegistry, TrashEntry};
pub use stats::{BotRecord, Stats};
