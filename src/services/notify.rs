//! Best-effort webhook notifications.
//!
//! Release and obsolete-bot alerts go out as Discord-style webhook posts.
//! Delivery is fire-and-forget: the request path spawns a task and moves on,
//! failures are logged and never retried.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::models::Release;

/// Webhook notification sink. Inert when no URL is configured.
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self {
            client,
            webhook_url,
        }
    }

    /// Whether a webhook URL is configured at all.
    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    async fn post(&self, content: String) {
        let Some(url) = &self.webhook_url else {
            return;
        };
        let payload = json!({ "content": content });
        match self.client.post(url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "Webhook delivery rejected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Webhook delivery failed");
            }
        }
    }

    /// Announce a newly published release. Detached; never joined.
    pub fn notify_release(self: &Arc<Self>, release: &Release) {
        let this = self.clone();
        let content = format!(
            "📦 New release published: **{}** (`{}`){}",
            release.version,
            release.filename,
            if release.notes.is_empty() {
                String::new()
            } else {
                format!("\n{}", release.notes)
            }
        );
        tokio::spawn(async move { this.post(content).await });
    }

    /// Announce that `latest` was rolled back to an older release.
    pub fn notify_revert(self: &Arc<Self>, release: &Release) {
        let this = self.clone();
        let content = format!("⏪ Rolled back: **{}** is the advertised version again", release.version);
        tokio::spawn(async move { this.post(content).await });
    }

    /// Alert that a bot is still running an outdated version.
    pub fn notify_obsolete(self: &Arc<Self>, bot_id: &str, reported: &str, latest: &str) {
        let this = self.clone();
        let content = format!(
            "⚠️ Bot `{}` is on **{}**, latest is **{}**",
            bot_id, reported, latest
        );
        tokio::spawn(async move { this.post(content).await });
    }
}
