//! Slack Incoming Webhook client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, warn};

use super::MessageSink;
use crate::errors::DeliveryError;
use crate::slack::response_builder::{create_webhook_payload, truncate_message};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Slack's documented ceiling for the `text` field of a message.
pub const MAX_MESSAGE_CHARS: usize = 40_000;

/// Body Slack returns when an incoming webhook accepted a message.
const WEBHOOK_OK: &str = "ok";

pub struct SlackWebhookClient {
    http: Client,
    webhook_url: String,
    max_message_chars: usize,
}

impl SlackWebhookClient {
    /// # Errors
    ///
    /// Returns `DeliveryError::TransportFailure` if the HTTP client cannot be built.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DeliveryError::TransportFailure(e.to_string()))?;
        Ok(Self {
            http,
            webhook_url: webhook_url.into(),
            max_message_chars: MAX_MESSAGE_CHARS,
        })
    }

    #[must_use]
    pub fn with_max_message_chars(mut self, max_message_chars: usize) -> Self {
        self.max_message_chars = max_message_chars;
        self
    }

    /// Posts `message` as plain text. Oversized text is truncated, not rejected.
    ///
    /// # Errors
    ///
    /// `TransportFailure` when Slack is unreachable or answers with a non-2xx
    /// status, `Rejected` when it answers 2xx with anything but `ok`.
    pub async fn send_message(&self, message: &str) -> Result<(), DeliveryError> {
        let (text, truncated) = truncate_message(message, self.max_message_chars);
        if truncated {
            warn!(
                "Message of {} chars truncated to the {} char webhook limit",
                message.chars().count(),
                self.max_message_chars
            );
        }

        let resp = self
            .http
            .post(&self.webhook_url)
            .json(&create_webhook_payload(&text))
            .send()
            .await
            .map_err(|e| DeliveryError::TransportFailure(e.to_string()))?;

        let status = resp.status();
        let body_text = resp
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());

        if !status.is_success() {
            error!("Slack webhook POST failed: status={} body={}", status, body_text);
            return Err(DeliveryError::TransportFailure(format!(
                "status {status}: {body_text}"
            )));
        }

        if body_text.trim() != WEBHOOK_OK {
            error!("Slack webhook rejected message: body={}", body_text);
            return Err(DeliveryError::Rejected(body_text));
        }

        Ok(())
    }
}

#[async_trait]
impl MessageSink for SlackWebhookClient {
    async fn deliver(&self, message_text: &str) -> Result<(), DeliveryError> {
        self.send_message(message_text).await
    }
}
