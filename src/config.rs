//! Application configuration loaded from environment variables.

use crate::error::{AppError, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (host:port)
    pub bind_address: String,

    /// Absolute base URL advertised to polling bots in download links
    pub public_base_url: String,

    /// Directory holding the JSON documents (releases, stats, bots, trash)
    pub data_dir: String,

    /// Directory holding the uploaded ZIP artifacts
    pub upload_dir: String,

    /// Identities allowed to perform mutating operations
    pub owner_ids: Vec<String>,

    /// Outbound webhook URL for release/obsolete notifications (optional)
    pub webhook_url: Option<String>,

    /// Passphrase for encrypting bot tokens at rest
    pub token_passphrase: String,

    /// Log level
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let owner_ids: Vec<String> = env::var("OWNER_IDS")
            .map_err(|_| AppError::Config("OWNER_IDS not set".into()))?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if owner_ids.is_empty() {
            return Err(AppError::Config("OWNER_IDS must list at least one id".into()));
        }

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into()),
            owner_ids,
            webhook_url: env::var("WEBHOOK_URL").ok().filter(|s| !s.is_empty()),
            token_passphrase: env::var("TOKEN_PASSPHRASE")
                .map_err(|_| AppError::Config("TOKEN_PASSPHRASE not set".into()))?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        })
    }
}
