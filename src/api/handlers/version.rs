//! Public query endpoint polled by the bot fleet.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::SharedState;
use crate::error::Result;
use crate::services::telemetry::TelemetryService;
use crate::version;

#[derive(Debug, Deserialize, IntoParams)]
pub struct VersionQuery {
    /// Opaque client-supplied bot identifier
    pub bot_id: Option<String>,
    /// Version the bot reports having
    pub version: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionResponse {
    /// Currently advertised version, `null` before the first upload
    pub version: Option<String>,
    /// Absolute download URL for the advertised artifact, `null` if none
    pub download: Option<String>,
    /// Suggested version for the next upload (latest with its last numeric
    /// segment bumped); the panel uses it to prefill the upload form
    pub next_version: Option<String>,
    pub message: String,
}

/// What is the latest version and where do I get it?
///
/// Every call counts as a poll: the downloads counter is incremented and,
/// when a `bot_id` is supplied, the bot's telemetry record is upserted. An
/// outdated bot may trigger one obsolete notification per latest version.
/// The read/mutate conflation is deliberate source behavior.
#[utoipa::path(
    get,
    path = "/api/version",
    tag = "version",
    params(VersionQuery),
    responses(
        (status = 200, description = "Latest version info", body = VersionResponse)
    )
)]
pub async fn get_version(
    State(state): State<SharedState>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<VersionResponse>> {
    let registry = state.store.load_registry().await?;
    let latest = registry.latest_release();

    let telemetry = TelemetryService::new(&state.store);
    match &query.bot_id {
        Some(bot_id) => {
            let outcome = telemetry
                .record_poll(bot_id, query.version.as_deref(), registry.latest.as_deref())
                .await?;

            if outcome.notify_obsolete {
                if let (Some(reported), Some(latest_version)) =
                    (query.version.as_deref(), registry.latest.as_deref())
                {
                    state
                        .notifier
                        .notify_obsolete(bot_id, reported, latest_version);
                }
            }
        }
        None => telemetry.record_anonymous_poll().await?,
    }

    let response = match latest {
        Some(release) => VersionResponse {
            version: Some(release.version.clone()),
            download: Some(state.download_url(&release.filename)),
            next_version: Some(version::bump(&release.version)),
            message: "Latest version available".to_string(),
        },
        None => VersionResponse {
            version: None,
            download: None,
            next_version: None,
            message: "No release published yet".to_string(),
        },
    };

    Ok(Json(response))
}
