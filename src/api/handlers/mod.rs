//! HTTP handlers, split by resource.

pub mod bots;
pub mod health;
pub mod releases;
pub mod version;
