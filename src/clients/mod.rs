//! Client modules for external API interactions
//!
//! Each external collaborator sits behind a trait so the worker pipeline can
//! be driven by in-memory fakes in tests.

pub mod github_client;
pub mod llm_client;
pub mod slack_client;

use async_trait::async_trait;

use crate::core::models::{NotificationRecord, ReleaseCandidate, ReleaseDetails};
use crate::errors::{DeliveryError, NotifierError};

pub use github_client::GitHubClient;
pub use llm_client::LlmClient;
pub use slack_client::SlackWebhookClient;

/// Upstream feed of repository activity.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `NotifierError::Fetch` when the feed cannot be read.
    async fn list_recent_notifications(
        &self,
        since_hours: u32,
    ) -> Result<Vec<NotificationRecord>, NotifierError>;

    /// # Errors
    ///
    /// Returns `NotifierError::ReleaseLookup` when the release cannot be resolved.
    async fn release_details(
        &self,
        candidate: &ReleaseCandidate,
    ) -> Result<ReleaseDetails, NotifierError>;
}

/// Language-model backed text condenser. One call per invocation of `summarize`.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// # Errors
    ///
    /// Returns `NotifierError::Summarization` on service errors or empty output.
    async fn summarize(&self, notes_text: &str, instructions: &str)
    -> Result<String, NotifierError>;
}

/// Chat destination for formatted release messages.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// # Errors
    ///
    /// Returns a `DeliveryError` when the message was not accepted.
    async fn deliver(&self, message_text: &str) -> Result<(), DeliveryError>;
}
