//! TRMNL webhook sender -- push the validated report to the display plugin.

use chrono::Utc;
use reqwest::Client;
use url::Url;

use crate::error::CoreError;

/// Custom-plugin webhook base.
pub const WEBHOOK_BASE: &str = "https://usetrmnl.com/api/custom_plugins/";

pub struct TrmnlWebhook {
    http: Client,
    runtime: tokio::runtime::Runtime,
    url: Url,
    token: String,
}

impl TrmnlWebhook {
    pub fn new(plugin_id: &str, token: &str) -> Result<Self, CoreError> {
        Self::with_base_url(WEBHOOK_BASE, plugin_id, token)
    }

    /// Point the sender at a different webhook base (tests).
    pub fn with_base_url(base_url: &str, plugin_id: &str, token: &str) -> Result<Self, CoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            http: Client::new(),
            runtime,
            url: Url::parse(base_url)?.join(plugin_id)?,
            token: token.to_string(),
        })
    }

    /// POST the pre-encoded payload to the plugin webhook.
    pub fn push(&self, payload: &[u8]) -> Result<(), CoreError> {
        log::info!("pushing report to {}", self.url);
        let resp = self.runtime.block_on(
            self.http
                .post(self.url.clone())
                .header("Authorization", format!("Bearer {}", self.token))
                .header("Content-Type", "application/json")
                .body(payload.to_vec())
                .send(),
        )?;

        if !resp.status().is_success() {
            return Err(CoreError::Transport {
                endpoint: self.url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        log::info!("report delivered at {}", Utc::now().to_rfc3339());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_posts_the_payload_with_bearer_auth() {
        let mut server = mockito::Server::new();
        let base = format!("{}/", server.url());
        let mock = server
            .mock("POST", "/plugin-123")
            .match_header("authorization", "Bearer tok")
            .match_body(r#"{"merge_variables":{}}"#)
            .with_status(200)
            .create();

        let webhook = TrmnlWebhook::with_base_url(&base, "plugin-123", "tok").unwrap();
        webhook.push(br#"{"merge_variables":{}}"#).unwrap();
        mock.assert();
    }

    #[test]
    fn rejected_push_surfaces_the_status() {
        let mut server = mockito::Server::new();
        let base = format!("{}/", server.url());
        server
            .mock("POST", "/plugin-123")
            .with_status(422)
            .with_body("payload too large")
            .create();

        let webhook = TrmnlWebhook::with_base_url(&base, "plugin-123", "tok").unwrap();
        let err = webhook.push(b"{}").unwrap_err();
        assert!(matches!(err, CoreError::Transport { status: 422, .. }));
    }
}
