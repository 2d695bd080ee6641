//! End-to-end API tests.
//!
//! Drives the real router in-process with `tower::ServiceExt::oneshot`
//! against temp directories; no running server or network required.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use update_depot_backend::api::{routes, AppState};
use update_depot_backend::config::Config;
use update_depot_backend::services::auth::OwnerAllowlist;
use update_depot_backend::services::notify::Notifier;
use update_depot_backend::storage::filesystem::FilesystemStorage;
use update_depot_backend::store::DataStore;

const OWNER: &str = "owner-123";
const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

struct TestApp {
    router: Router,
    store: DataStore,
    // keep the tempdirs alive for the duration of the test
    _data_dir: tempfile::TempDir,
    _upload_dir: tempfile::TempDir,
}

fn test_app() -> TestApp {
    let data_dir = tempfile::tempdir().unwrap();
    let upload_dir = tempfile::tempdir().unwrap();

    let config = Config {
        bind_address: "127.0.0.1:0".into(),
        public_base_url: "http://depot.test".into(),
        data_dir: data_dir.path().to_string_lossy().into_owned(),
        upload_dir: upload_dir.path().to_string_lossy().into_owned(),
        owner_ids: vec![OWNER.to_string()],
        webhook_url: None,
        token_passphrase: "test-passphrase".into(),
        log_level: "debug".into(),
    };

    let store = DataStore::new(data_dir.path());
    let artifacts = Arc::new(FilesystemStorage::new(upload_dir.path()));
    let notifier = Arc::new(Notifier::new(None));
    let auth = Arc::new(OwnerAllowlist::new(config.owner_ids.clone()));

    let state = Arc::new(AppState::new(
        config,
        store.clone(),
        artifacts,
        notifier,
        auth,
    ));

    TestApp {
        router: routes::create_router(state),
        store,
        _data_dir: data_dir,
        _upload_dir: upload_dir,
    }
}

fn multipart_upload_body(version: &str, notes: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"version\"\r\n\r\n{version}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"notes\"\r\n\r\n{notes}\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"zip\"; filename=\"{filename}\"\r\nContent-Type: application/zip\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(version: &str, notes: &str, filename: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header("x-owner-id", OWNER)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_upload_body(
            version, notes, filename, content,
        )))
        .unwrap()
}

async fn upload(app: &TestApp, version: &str, notes: &str) -> StatusCode {
    let response = app
        .router
        .clone()
        .oneshot(upload_request(version, notes, "bot.zip", b"PK\x03\x04fake"))
        .await
        .unwrap();
    response.status()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn owner_post(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("x-owner-id", OWNER)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Public query endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn version_endpoint_with_no_release_returns_null_download() {
    let app = test_app();

    let (status, body) = get_json(&app, "/api/version").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["version"].is_null());
    assert!(body["download"].is_null());

    // the poll still counted
    let stats = app.store.load_stats().await.unwrap();
    assert_eq!(stats.downloads, 1);
}

#[tokio::test]
async fn version_endpoint_advertises_latest_with_absolute_url() {
    let app = test_app();
    assert_eq!(upload(&app, "v1.0", "first").await, StatusCode::FOUND);

    let (status, body) = get_json(&app, "/api/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "v1.0");
    assert_eq!(body["download"], "http://depot.test/artifacts/bot-v1.0.zip");
}

#[tokio::test]
async fn version_endpoint_upserts_bot_record_per_poll() {
    let app = test_app();
    upload(&app, "v2.0", "").await;

    get_json(&app, "/api/version?bot_id=bot-a&version=v1.0").await;
    get_json(&app, "/api/version?bot_id=bot-a&version=v2.0").await;

    let stats = app.store.load_stats().await.unwrap();
    assert_eq!(stats.downloads, 2); // uploads do not count, both polls do
    assert_eq!(stats.bots.len(), 1);
    assert_eq!(stats.bots["bot-a"].bot_version.as_deref(), Some("v2.0"));
}

#[tokio::test]
async fn version_endpoint_suggests_next_version() {
    let app = test_app();
    upload(&app, "v1.9", "").await;

    let (status, body) = get_json(&app, "/api/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next_version"], "v1.10");

    // nothing published, nothing to suggest
    let empty = test_app();
    let (_, body) = get_json(&empty, "/api/version").await;
    assert!(body["next_version"].is_null());
}

#[tokio::test]
async fn poll_without_version_is_recorded_but_never_flagged_obsolete() {
    let app = test_app();
    upload(&app, "v2.0", "").await;

    get_json(&app, "/api/version?bot_id=bot-a").await;

    let stats = app.store.load_stats().await.unwrap();
    let record = &stats.bots["bot-a"];
    assert!(record.bot_version.is_none(), "no version must be invented");
    assert!(
        record.last_notified_for_version.is_none(),
        "a bot that never reported a version cannot be obsolete"
    );
}

#[tokio::test]
async fn outdated_bot_is_marked_notified_once_per_latest() {
    let app = test_app();
    upload(&app, "v2.0", "").await;

    get_json(&app, "/api/version?bot_id=bot-a&version=v1.0").await;
    let stats = app.store.load_stats().await.unwrap();
    assert_eq!(
        stats.bots["bot-a"].last_notified_for_version.as_deref(),
        Some("v2.0")
    );

    // second identical poll must not change the de-dup marker
    get_json(&app, "/api/version?bot_id=bot-a&version=v1.0").await;
    let stats = app.store.load_stats().await.unwrap();
    assert_eq!(
        stats.bots["bot-a"].last_notified_for_version.as_deref(),
        Some("v2.0")
    );

    // a new latest re-arms the notification
    upload(&app, "v3.0", "").await;
    get_json(&app, "/api/version?bot_id=bot-a&version=v1.0").await;
    let stats = app.store.load_stats().await.unwrap();
    assert_eq!(
        stats.bots["bot-a"].last_notified_for_version.as_deref(),
        Some("v3.0")
    );
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_requires_owner_identity() {
    let app = test_app();

    let mut request = upload_request("v1.0", "", "bot.zip", b"PK");
    request.headers_mut().remove("x-owner-id");
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // registry untouched
    let registry = app.store.load_registry().await.unwrap();
    assert!(registry.items.is_empty());
}

#[tokio::test]
async fn upload_rejects_unknown_identity() {
    let app = test_app();

    let mut request = upload_request("v1.0", "", "bot.zip", b"PK");
    request
        .headers_mut()
        .insert("x-owner-id", "impostor".parse().unwrap());
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn upload_rejects_non_zip_file() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(upload_request("v1.0", "", "bot.tar.gz", b"data"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_rejects_blank_version() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(upload_request("  ", "", "bot.zip", b"PK"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_publishes_and_stores_artifact() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(upload_request("1.0", "hello", "bot.zip", b"PK\x03\x04"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/dashboard"
    );

    let registry = app.store.load_registry().await.unwrap();
    assert_eq!(registry.latest.as_deref(), Some("v1.0"));
    assert_eq!(registry.items[0].filename, "bot-v1.0.zip");
    assert_eq!(registry.items[0].notes, "hello");

    // the artifact is downloadable
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/artifacts/bot-v1.0.zip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"PK\x03\x04");
}

#[tokio::test]
async fn upload_redirect_is_plain_302() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(upload_request("v1.0", "", "bot.zip", b"PK"))
        .await
        .unwrap();
    // 302 Found, not the 303 a See Other redirect helper would emit
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/dashboard"
    );
}

#[tokio::test]
async fn republishing_a_version_replaces_in_place() {
    let app = test_app();

    upload(&app, "v2.0", "first notes").await;
    upload(&app, "v2.0", "second notes").await;

    let registry = app.store.load_registry().await.unwrap();
    assert_eq!(registry.items.len(), 1);
    assert_eq!(registry.items[0].notes, "second notes");
}

// ---------------------------------------------------------------------------
// Releases list, revert, delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn releases_are_listed_in_numeric_aware_order() {
    let app = test_app();
    upload(&app, "v2.0", "").await;
    upload(&app, "v1.9", "").await;
    upload(&app, "v1.10", "").await;

    let (status, body) = get_json(&app, "/api/releases").await;
    assert_eq!(status, StatusCode::OK);
    let versions: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["version"].as_str().unwrap())
        .collect();
    assert_eq!(versions, vec!["v1.9", "v1.10", "v2.0"]);
}

#[tokio::test]
async fn revert_repoints_latest_without_dropping_items() {
    let app = test_app();
    upload(&app, "v1.0", "").await;
    upload(&app, "v2.0", "").await;

    let (status, body) = owner_post(&app, "/releases/v1.0/revert").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let registry = app.store.load_registry().await.unwrap();
    assert_eq!(registry.latest.as_deref(), Some("v1.0"));
    assert_eq!(registry.items.len(), 2);
}

#[tokio::test]
async fn revert_unknown_version_reports_error() {
    let app = test_app();
    upload(&app, "v1.0", "").await;

    let (status, body) = owner_post(&app, "/releases/v9.9/revert").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().contains("v9.9"));
}

#[tokio::test]
async fn delete_of_latest_reassigns_and_removes_artifact() {
    let app = test_app();
    upload(&app, "v1.0", "").await;
    upload(&app, "v2.0", "").await;

    let (status, body) = owner_post(&app, "/delete/v2.0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let registry = app.store.load_registry().await.unwrap();
    assert_eq!(registry.latest.as_deref(), Some("v1.0"));
    assert!(registry.latest_release().is_some(), "latest must not dangle");

    // the artifact file is gone
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/artifacts/bot-v2.0.zip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_records_trash_entry() {
    let app = test_app();
    upload(&app, "v1.0", "old notes").await;
    owner_post(&app, "/delete/v1.0").await;

    let (status, body) = get_json_as_owner(&app, "/api/trash").await;
    assert_eq!(status, StatusCode::OK);
    let trash = body.as_array().unwrap();
    assert_eq!(trash.len(), 1);
    assert_eq!(trash[0]["version"], "v1.0");
    assert_eq!(trash[0]["notes"], "old notes");
}

async fn get_json_as_owner(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("x-owner-id", OWNER)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Bot roster and reports
// ---------------------------------------------------------------------------

async fn register_bot(app: &TestApp, bot_id: &str) -> (StatusCode, Value) {
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/bots")
                .header("x-owner-id", OWNER)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "bot_id": bot_id,
                        "name": "Test Bot",
                        "owner_id": OWNER,
                        "token": "super.secret.token",
                        "notes": "staging"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn register_bot_encrypts_token_and_redacts_it() {
    let app = test_app();

    let (status, body) = register_bot(&app, "bot-a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bot_id"], "bot-a");
    assert!(body.get("token").is_none());
    assert!(body.get("token_encrypted").is_none());

    // stored ciphertext decrypts back to the original token
    let roster = app.store.load_bots().await.unwrap();
    let stored = &roster["bot-a"].token_encrypted;
    assert_ne!(stored, "super.secret.token");
    let decrypted = update_depot_backend::services::encryption::decrypt_token(
        stored,
        "test-passphrase",
    )
    .unwrap();
    assert_eq!(decrypted, "super.secret.token");
}

#[tokio::test]
async fn bot_roster_requires_owner() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/bots")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reports_update_profile_counters() {
    let app = test_app();
    register_bot(&app, "bot-a").await;

    for kind in ["restart", "restart", "error", "ready"] {
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/report")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "bot_id": "bot-a", "kind": kind }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let roster = app.store.load_bots().await.unwrap();
    let profile = &roster["bot-a"];
    assert_eq!(profile.restarts, 2);
    assert_eq!(profile.errors, 1);
    assert!(profile.last_ready.is_some());
}

#[tokio::test]
async fn report_for_unknown_bot_is_not_found() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/report")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "bot_id": "ghost", "kind": "ready" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Health and docs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_healthy_store() {
    let app = test_app();

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["webhook"]["status"], "disabled");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = test_app();

    let (status, body) = get_json(&app, "/api/v1/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/version").is_some());
    assert!(body["paths"].get("/upload").is_some());
}

#[tokio::test]
async fn traversal_in_artifact_name_is_rejected() {
    let app = test_app();

    let (status, _) = get_json(&app, "/artifacts/..%2Freleases.json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
