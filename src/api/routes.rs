//! Route definitions for the API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};

use super::handlers;
use super::middleware::owner::owner_middleware;
use super::SharedState;

/// Uploads are whole-ZIP replacements; a bot bundle fits comfortably here.
const UPLOAD_BODY_LIMIT: usize = 256 * 1024 * 1024; // 256 MB

/// Create the main router
pub fn create_router(state: SharedState) -> Router {
    let openapi = super::openapi::build_openapi();

    // Public surface: polling, release listing, artifact download, health.
    let public_routes = Router::new()
        .route("/api/version", get(handlers::version::get_version))
        .route("/api/releases", get(handlers::releases::list_releases))
        .route("/artifacts/:filename", get(handlers::releases::download_artifact))
        .route("/api/report", post(handlers::bots::report))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/v1/openapi.json",
            get(move || {
                let doc = openapi.clone();
                async move { Json(doc) }
            }),
        );

    // Owner-only surface: every mutating panel operation fails closed
    // behind the owner middleware.
    let owner_routes = Router::new()
        .route("/upload", post(handlers::releases::upload_release))
        .route(
            "/releases/:version/revert",
            post(handlers::releases::revert_release),
        )
        .route("/delete/:version", post(handlers::releases::delete_release))
        .route("/api/trash", get(handlers::releases::list_trash))
        .route(
            "/api/bots",
            get(handlers::bots::list_bots).post(handlers::bots::register_bot),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            owner_middleware,
        ))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .merge(public_routes)
        .merge(owner_routes)
        .with_state(state)
}
