//! Update Depot - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use update_depot_backend::{
    api::{self, AppState},
    config::Config,
    error::Result,
    services::{auth::OwnerAllowlist, notify::Notifier},
    storage::filesystem::FilesystemStorage,
    store::DataStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "update_depot_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Starting Update Depot");

    // Prepare the document store and upload directory
    let store = DataStore::new(&config.data_dir);
    store.ensure_dir().await?;
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!(data_dir = %config.data_dir, upload_dir = %config.upload_dir, "Storage ready");

    let registry = store.load_registry().await?;
    match &registry.latest {
        Some(version) => tracing::info!(version = %version, "Advertising version"),
        None => tracing::info!("No release published yet"),
    }

    let artifacts = Arc::new(FilesystemStorage::new(&config.upload_dir));
    let notifier = Arc::new(Notifier::new(config.webhook_url.clone()));
    if notifier.is_enabled() {
        tracing::info!("Webhook notifications enabled");
    } else {
        tracing::info!("WEBHOOK_URL not set, notifications disabled");
    }
    let auth = Arc::new(OwnerAllowlist::new(config.owner_ids.clone()));

    let state = Arc::new(AppState::new(
        config.clone(),
        store,
        artifacts,
        notifier,
        auth,
    ));

    // Build router
    let app = api::routes::create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.bind_address.parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
