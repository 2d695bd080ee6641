//! API module - HTTP handlers and middleware.

pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::AuthPolicy;
use crate::services::notify::Notifier;
use crate::storage::ArtifactStorage;
use crate::store::DataStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: DataStore,
    pub artifacts: Arc<dyn ArtifactStorage>,
    pub notifier: Arc<Notifier>,
    pub auth: Arc<dyn AuthPolicy>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: DataStore,
        artifacts: Arc<dyn ArtifactStorage>,
        notifier: Arc<Notifier>,
        auth: Arc<dyn AuthPolicy>,
    ) -> Self {
        Self {
            config,
            store,
            artifacts,
            notifier,
            auth,
        }
    }

    /// Absolute download URL for a stored artifact.
    pub fn download_url(&self, filename: &str) -> String {
        format!(
            "{}/artifacts/{}",
            self.config.public_base_url.trim_end_matches('/'),
            filename
        )
    }
}

pub type SharedState = Arc<AppState>;
