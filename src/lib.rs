//! Update Depot - Backend Library
//!
//! Distribution panel for a Discord bot fleet: the owner uploads versioned
//! ZIP releases, bots poll for the latest version, usage stats are persisted.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;
pub mod version;

pub use config::Config;
pub use error::{AppError, Result};
