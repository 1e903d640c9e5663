/// Release Notifier - posts condensed GitHub release notes to Slack.
///
/// One invocation reads the GitHub notification feed, keeps the release
/// notifications from the last few hours, summarizes each release's notes
/// with an `OpenAI` model and posts the summaries to a Slack incoming webhook.
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for on-demand, stateless execution (scheduled or manual)
/// - reqwest for the GitHub, `OpenAI` and Slack HTTP APIs
/// - openai-api-rs message types for prompt construction
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use release_notifier::core::config::AppConfig;
/// use release_notifier::core::models::InvocationRequest;
/// use release_notifier::worker::handler::{build_pipeline, run_invocation};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     release_notifier::setup_logging();
///
///     let config = AppConfig::from_env(false)?;
///     let pipeline = build_pipeline(&config)?;
///     let request = InvocationRequest {
///         test_mode: true,
///         since_hours: 24,
///         dry_run: true,
///     };
///
///     let body = run_invocation(&pipeline, &request).await;
///     println!("{body}");
///     Ok(())
/// }
/// ```
// Module declarations
pub mod clients;
pub mod core;
pub mod errors;
pub mod prompt;
pub mod slack;
pub mod utils;
pub mod worker;

pub use errors::{DeliveryError, NotifierError};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Uses `RUST_LOG` when set and `info` otherwise. Calling it again after a
/// subscriber is installed is a no-op.
///
/// # Example
///
/// ```
/// release_notifier::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
