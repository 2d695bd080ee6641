//! Bot roster handlers: owner-managed profiles and bot self-reports.

use axum::{
    extract::State,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::{BotProfile, ReportKind};
use crate::services::encryption::encrypt_token;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterBotRequest {
    /// Key identifying the bot in the roster (same id it polls with)
    pub bot_id: String,
    pub name: String,
    /// Discord id of the operating account
    pub owner_id: String,
    /// Bot token, stored encrypted, never returned
    pub token: String,
    #[serde(default)]
    pub notes: String,
}

/// Profile view with the token redacted.
#[derive(Debug, Serialize, ToSchema)]
pub struct BotProfileResponse {
    pub bot_id: String,
    pub name: String,
    pub owner_id: String,
    pub notes: String,
    pub last_ready: Option<DateTime<Utc>>,
    pub last_check: Option<DateTime<Utc>>,
    pub restarts: u64,
    pub errors: u64,
    pub created_at: DateTime<Utc>,
}

impl BotProfileResponse {
    fn from_profile(bot_id: &str, profile: &BotProfile) -> Self {
        Self {
            bot_id: bot_id.to_string(),
            name: profile.name.clone(),
            owner_id: profile.owner_id.clone(),
            notes: profile.notes.clone(),
            last_ready: profile.last_ready,
            last_check: profile.last_check,
            restarts: profile.restarts,
            errors: profile.errors,
            created_at: profile.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportRequest {
    pub bot_id: String,
    pub kind: ReportKind,
    /// Free-form context, logged but not stored
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Register (or replace) a bot profile, encrypting its token at rest.
#[utoipa::path(
    post,
    path = "/api/bots",
    tag = "bots",
    request_body = RegisterBotRequest,
    responses(
        (status = 200, description = "Profile stored", body = BotProfileResponse),
        (status = 400, description = "Missing fields"),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn register_bot(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterBotRequest>,
) -> Result<Json<BotProfileResponse>> {
    if payload.bot_id.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(AppError::Validation("bot_id and name are required".into()));
    }
    if payload.token.trim().is_empty() {
        return Err(AppError::Validation("token is required".into()));
    }

    let profile = BotProfile {
        name: payload.name,
        owner_id: payload.owner_id,
        token_encrypted: encrypt_token(&payload.token, &state.config.token_passphrase),
        notes: payload.notes,
        last_ready: None,
        last_check: None,
        restarts: 0,
        errors: 0,
        created_at: Utc::now(),
    };

    let mut roster = state.store.load_bots().await?;
    roster.insert(payload.bot_id.clone(), profile.clone());
    state.store.save_bots(&roster).await?;

    tracing::info!(bot_id = %payload.bot_id, "Bot profile registered");
    Ok(Json(BotProfileResponse::from_profile(
        &payload.bot_id,
        &profile,
    )))
}

/// List registered bot profiles, tokens redacted.
#[utoipa::path(
    get,
    path = "/api/bots",
    tag = "bots",
    responses(
        (status = 200, description = "Registered profiles", body = [BotProfileResponse]),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn list_bots(State(state): State<SharedState>) -> Result<Json<Vec<BotProfileResponse>>> {
    let roster = state.store.load_bots().await?;
    let profiles = roster
        .iter()
        .map(|(id, profile)| BotProfileResponse::from_profile(id, profile))
        .collect();
    Ok(Json(profiles))
}

/// Accept a lifecycle report (ready / restart / error) from a bot.
#[utoipa::path(
    post,
    path = "/api/report",
    tag = "bots",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Report recorded"),
        (status = 404, description = "Unknown bot")
    )
)]
pub async fn report(
    State(state): State<SharedState>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<serde_json::Value>> {
    let mut roster = state.store.load_bots().await?;
    let profile = roster
        .get_mut(&payload.bot_id)
        .ok_or_else(|| AppError::NotFound(format!("Bot {} not registered", payload.bot_id)))?;

    profile.apply_report(payload.kind, Utc::now());
    state.store.save_bots(&roster).await?;

    if let Some(extra) = &payload.payload {
        tracing::debug!(bot_id = %payload.bot_id, kind = ?payload.kind, payload = %extra, "Bot report");
    } else {
        tracing::debug!(bot_id = %payload.bot_id, kind = ?payload.kind, "Bot report");
    }

    Ok(Json(json!({ "ok": true })))
}
