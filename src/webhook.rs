//! Chat webhook delivery.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;

use crate::config::WebhookConfig;
use crate::{RelayError, Result};

/// Longest summary sent to the webhook, in characters.
const MAX_SUMMARY_LENGTH: usize = 500;

const TRUNCATION_MARKER: &str = "...";

/// Posts article notifications to a chat webhook.
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    /// Create a client for the configured webhook endpoint. The URL is
    /// expected to carry the access token as a query parameter.
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RelayError::Delivery(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Post one article notification. A single attempt is made; any
    /// response other than 200 is an error.
    pub async fn deliver(&self, title: &str, link: &str, summary: &str) -> Result<()> {
        let message = format_message(title, link, summary);

        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "text": message }))
            .send()
            .await
            .map_err(|e| RelayError::Delivery(format!("request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RelayError::Delivery(format!(
                "webhook returned status {status}"
            )));
        }

        debug!("Delivered notification for \"{}\"", title);

        Ok(())
    }
}

/// Render the chat message for an article.
pub fn format_message(title: &str, link: &str, summary: &str) -> String {
    format!(
        "**{}**\n\n{}\n\n[Read more]({})",
        title,
        truncate_summary(summary),
        link
    )
}

/// Cap a summary at `MAX_SUMMARY_LENGTH` characters, appending a
/// truncation marker when it was cut.
fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() <= MAX_SUMMARY_LENGTH {
        return summary.to_string();
    }

    let mut truncated: String = summary.chars().take(MAX_SUMMARY_LENGTH).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
