use thiserror::Error;

/// Errors raised anywhere in the notification pipeline.
///
/// `Config` and `Fetch` abort an invocation. Everything else is scoped to a
/// single release and ends up as an entry in the report's error list.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch GitHub notifications: {0}")]
    Fetch(String),

    #[error("Failed to fetch release details: {0}")]
    ReleaseLookup(String),

    #[error("LLM summarization failed: {0}")]
    Summarization(String),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl NotifierError {
    /// Whether the error ends the whole invocation rather than a single item.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Fetch(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("Slack webhook request failed: {0}")]
    TransportFailure(String),

    #[error("Slack webhook rejected the message: {0}")]
    Rejected(String),
}
