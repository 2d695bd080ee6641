//! Owner-only gate for mutating routes.
//!
//! Extracts the caller identity from request headers and checks it against
//! the injected [`AuthPolicy`]. Fails closed: no identity or an unknown one
//! gets 403 before any handler state is touched.
//!
//! Supported identity transports:
//! - `X-Owner-Id: <id>` - direct identity header
//! - `Authorization: Bearer <id>` - bearer-style, for clients that insist

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderName},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::SharedState;
use crate::error::AppError;

static X_OWNER_ID: HeaderName = HeaderName::from_static("x-owner-id");

/// Extract the claimed identity from request headers.
fn extract_identity(request: &Request) -> Option<String> {
    if let Some(id) = request
        .headers()
        .get(&X_OWNER_ID)
        .and_then(|h| h.to_str().ok())
    {
        return Some(id.to_string());
    }

    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|id| id.to_string())
}

/// Middleware requiring an owner identity.
pub async fn owner_middleware(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(identity) = extract_identity(&request) else {
        return AppError::Forbidden("Owner identity required".into()).into_response();
    };

    if !state.auth.is_authorized(&identity) {
        tracing::warn!(identity = %identity, "Rejected non-owner mutation attempt");
        return AppError::Forbidden("Not an owner".into()).into_response();
    }

    next.run(request).await
}
