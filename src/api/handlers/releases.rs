//! Release management handlers: upload, list, revert, delete, download, trash.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{
        header::{CONTENT_TYPE, LOCATION},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::{Release, TrashEntry};
use crate::services::registry::{PublishOutcome, RegistryService};
use crate::storage::artifact_filename;
use crate::version;

#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// Version identifier, `v` prefix optional
    version: String,
    /// Release notes
    notes: Option<String>,
    /// The ZIP artifact
    #[schema(value_type = String, format = Binary)]
    zip: Vec<u8>,
}

/// List all releases in numeric-aware version order.
#[utoipa::path(
    get,
    path = "/api/releases",
    tag = "releases",
    responses(
        (status = 200, description = "All releases", body = [Release])
    )
)]
pub async fn list_releases(State(state): State<SharedState>) -> Result<Json<Vec<Release>>> {
    let releases = RegistryService::new(&state.store).list().await?;
    Ok(Json(releases))
}

/// Upload a new release artifact (owner-only, multipart).
///
/// The ZIP is placed in artifact storage (atomic rename) before the registry
/// is touched, so a failed write never leaves a release pointing at a
/// missing file. The redirect does not wait for the webhook notification.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "releases",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 302, description = "Published, redirecting to dashboard"),
        (status = 400, description = "Missing version, missing file, or not a ZIP"),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn upload_release(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut form_version: Option<String> = None;
    let mut form_notes = String::new();
    let mut zip_content: Option<Bytes> = None;
    let mut zip_filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart: {}", e)))?
    {
        match field.name().unwrap_or("") {
            "version" => {
                form_version = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid field: {}", e)))?,
                );
            }
            "notes" => {
                form_notes = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid field: {}", e)))?;
            }
            "zip" => {
                zip_filename = field.file_name().map(String::from);
                zip_content = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Invalid file: {}", e)))?,
                );
            }
            _ => {}
        }
    }

    let raw_version = form_version.unwrap_or_default();
    if raw_version.trim().is_empty() {
        return Err(AppError::Validation("Version is required".into()));
    }
    let content =
        zip_content.ok_or_else(|| AppError::Validation("Missing 'zip' file field".into()))?;
    if content.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".into()));
    }
    let uploaded_name = zip_filename.unwrap_or_default();
    if !uploaded_name.to_lowercase().ends_with(".zip") {
        return Err(AppError::Validation(format!(
            "Expected a .zip artifact, got '{}'",
            uploaded_name
        )));
    }

    let normalized = version::normalize(&raw_version);
    let filename = artifact_filename(&normalized);

    // artifact first; the registry is only updated after the file is in place
    state.artifacts.put(&filename, content).await?;

    let (release, outcome) = RegistryService::new(&state.store)
        .publish(&normalized, &filename, &form_notes)
        .await?;

    tracing::info!(
        version = %release.version,
        replaced = (outcome == PublishOutcome::Replaced),
        "Release published"
    );

    // fire-and-forget; the redirect must not wait on the webhook
    state.notifier.notify_release(&release);

    // plain 302, not the 303 that Redirect::to would produce
    Ok((StatusCode::FOUND, [(LOCATION, "/dashboard")]).into_response())
}

/// Point the advertised version back at an existing release (owner-only).
#[utoipa::path(
    post,
    path = "/releases/{version}/revert",
    tag = "releases",
    params(("version" = String, Path, description = "Target version")),
    responses(
        (status = 200, description = "Reverted"),
        (status = 404, description = "Unknown version"),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn revert_release(
    State(state): State<SharedState>,
    Path(target): Path<String>,
) -> Response {
    match RegistryService::new(&state.store).revert(&target).await {
        Ok(release) => {
            tracing::info!(version = %release.version, "Latest reverted");
            state.notifier.notify_revert(&release);
            Json(json!({ "ok": true, "version": release.version })).into_response()
        }
        Err(AppError::NotFound(msg)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "ok": false, "error": msg })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a release and its backing artifact (owner-only).
#[utoipa::path(
    post,
    path = "/delete/{version}",
    tag = "releases",
    params(("version" = String, Path, description = "Version to delete")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Unknown version"),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn delete_release(
    State(state): State<SharedState>,
    Path(target): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let removed = RegistryService::new(&state.store).delete(&target).await?;

    // The registry entry is gone either way; a missing file is not an error.
    if let Err(e) = state.artifacts.delete(&removed.filename).await {
        tracing::warn!(filename = %removed.filename, error = %e, "Artifact file removal failed");
    }

    tracing::info!(version = %removed.version, "Release deleted");
    Ok(Json(json!({ "ok": true, "version": removed.version })))
}

/// Download a stored artifact.
#[utoipa::path(
    get,
    path = "/artifacts/{filename}",
    tag = "releases",
    params(("filename" = String, Path, description = "Artifact filename")),
    responses(
        (status = 200, description = "ZIP bytes", content_type = "application/zip"),
        (status = 404, description = "Unknown artifact")
    )
)]
pub async fn download_artifact(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    // filenames are flat; anything path-like is hostile
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(AppError::Validation("Invalid artifact name".into()));
    }

    if !state.artifacts.exists(&filename).await? {
        return Err(AppError::NotFound(format!("Artifact {} not found", filename)));
    }
    let content = state.artifacts.get(&filename).await?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/zip")
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(content))
        .map_err(|e| AppError::Internal(e.to_string()))?)
}

/// List deleted releases (owner-only).
#[utoipa::path(
    get,
    path = "/api/trash",
    tag = "releases",
    responses(
        (status = 200, description = "Deleted release records", body = [TrashEntry]),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn list_trash(State(state): State<SharedState>) -> Result<Json<Vec<TrashEntry>>> {
    let trash = state.store.load_trash().await?;
    Ok(Json(trash))
}
