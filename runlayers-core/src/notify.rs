use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{JobError, truncate_body};

const SERVICE: &str = "webhook";

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts plain text to a Discord-style chat webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: Client,
}

impl WebhookNotifier {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Single attempt; a rejected post surfaces as [`JobError::Delivery`].
    #[instrument(skip_all, level = "info")]
    pub async fn post(&self, webhook_url: &str, text: &str) -> Result<(), JobError> {
        let res = self
            .http
            .post(webhook_url)
            .json(&WebhookPayload { content: text })
            .send()
            .await
            .map_err(JobError::transport(SERVICE))?;

        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(JobError::Delivery {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        info!(status = status.as_u16(), "Webhook accepted message");
        Ok(())
    }
}
