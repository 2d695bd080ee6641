//! OpenAPI specification generated from handler annotations via utoipa.

use utoipa::OpenApi;

use super::handlers;
use crate::models::{BotRecord, Release, TrashEntry};
use crate::services::telemetry::FleetCounts;

/// Top-level OpenAPI document for the Update Depot API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Update Depot API",
        description = "Update distribution panel for a Discord bot fleet.",
        version = "0.1.0",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    paths(
        handlers::version::get_version,
        handlers::releases::list_releases,
        handlers::releases::upload_release,
        handlers::releases::revert_release,
        handlers::releases::delete_release,
        handlers::releases::download_artifact,
        handlers::releases::list_trash,
        handlers::bots::register_bot,
        handlers::bots::list_bots,
        handlers::bots::report,
        handlers::health::health_check,
    ),
    tags(
        (name = "version", description = "Public polling endpoint"),
        (name = "releases", description = "Release publishing and rollback"),
        (name = "bots", description = "Bot roster and lifecycle reports"),
        (name = "health", description = "Health checks"),
    ),
    components(schemas(
        ErrorResponse,
        Release,
        TrashEntry,
        BotRecord,
        FleetCounts,
        handlers::version::VersionResponse,
        handlers::releases::UploadForm,
        handlers::bots::RegisterBotRequest,
        handlers::bots::BotProfileResponse,
        handlers::bots::ReportRequest,
        handlers::health::HealthResponse,
        handlers::health::HealthChecks,
        handlers::health::CheckStatus,
    ))
)]
pub struct ApiDoc;

/// Standard error response body returned by all endpoints on failure.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "NOT_FOUND", "VALIDATION_ERROR")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Build the OpenAPI document.
pub fn build_openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
