use chrono::Utc;
use serde_json::json;

/// Operator notification collaborator. A failed run is reported to a
/// webhook instead of dying silently; delivery failures are logged and
/// swallowed so notification can never take the service down.
#[derive(Clone)]
pub struct Notifier {
    webhook: String,
    client: reqwest::Client,
}

impl Notifier {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: reqwest::Client::new(),
        }
    }

    pub async fn send(&self, subject: &str, body: &str) {
        if self.webhook.is_empty() {
            return;
        }

        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_default();
        let payload = json!({
            "subject": subject,
            "body": body,
            "host": host,
            "timestamp": Utc::now().to_rfc3339(),
        });

        match self.client.post(&self.webhook).json(&payload).send().await {
            Ok(resp) if !resp.status().is_success() => {
                tracing::warn!("Notification webhook returned {}", resp.status());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to deliver notification: {}", e),
        }
    }
}
