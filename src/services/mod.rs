//! Business logic services.

pub mod auth;
pub mod encryption;
pub mod notify;
pub mod registry;
pub mod telemetry;
