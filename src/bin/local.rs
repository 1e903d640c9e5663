//! Runs the notifier once from a shell, outside the Lambda runtime.

use std::process::ExitCode;

use clap::Parser;
use release_notifier::core::config::AppConfig;
use release_notifier::core::models::InvocationRequest;
use release_notifier::worker::handler::{build_pipeline, run_invocation};
use release_notifier::worker::response::{fatal_response, is_error_response};
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "release-notifier-local", about = "Run the GitHub release notifier locally")]
struct Args {
    /// Process only the newest release notification
    #[arg(long)]
    test_mode: bool,

    /// Look back this many hours in the notification feed
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..))]
    since_hours: u32,

    /// Summarize and log messages without posting to Slack
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_result = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenv_result
        && !e.not_found()
    {
        warn!("Failed to load .env: {}", e);
    }

    let args = Args::parse();
    let request = InvocationRequest {
        test_mode: args.test_mode,
        since_hours: args.since_hours,
        dry_run: args.dry_run,
    };

    let body = match AppConfig::from_env(!args.dry_run).and_then(|c| build_pipeline(&c)) {
        Ok(pipeline) => run_invocation(&pipeline, &request).await,
        Err(e) => fatal_response(&e),
    };

    match serde_json::to_string_pretty(&body) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{body}"),
    }

    if is_error_response(&body) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
