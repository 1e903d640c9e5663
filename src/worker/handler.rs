#![allow(clippy::missing_errors_doc)]
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use super::parsing::parse_request;
use super::pipeline::{Pipeline, PipelineSettings};
use super::response::{fatal_response, ok_report};
use crate::clients::{GitHubClient, LlmClient, MessageSink, SlackWebhookClient};
use crate::core::config::AppConfig;
use crate::core::models::InvocationRequest;
use crate::errors::NotifierError;

/// Wires the real GitHub, `OpenAI` and Slack clients into a pipeline.
///
/// The Slack client is only built when a webhook URL is configured.
pub fn build_pipeline(config: &AppConfig) -> Result<Pipeline, NotifierError> {
    let source = GitHubClient::new(&config.github_token)?;
    let summarizer = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_org_id.clone(),
        config.model_name().to_string(),
    )?;
    let sink = match &config.slack_webhook_url {
        Some(url) => {
            let client = SlackWebhookClient::new(url.as_str())
                .map_err(|e| NotifierError::Config(format!("Slack webhook client: {e}")))?;
            Some(Box::new(client) as Box<dyn MessageSink>)
        }
        None => None,
    };
    let settings = PipelineSettings::from_config(config)?;

    Ok(Pipeline::new(
        Box::new(source),
        Box::new(summarizer),
        sink,
        settings,
    ))
}

/// Runs one invocation and renders its response body.
pub async fn run_invocation(pipeline: &Pipeline, request: &InvocationRequest) -> Value {
    let invocation_id = Uuid::new_v4();
    let span = info_span!("invocation", %invocation_id);

    async {
        info!("GitHub Release Notifier started");
        match pipeline.run(request).await {
            Ok(report) => {
                info!(
                    "Completed: {}/{} sent",
                    report.sent, report.release_notifications
                );
                ok_report(&report)
            }
            Err(e) => {
                error!("Fatal error: {}", e);
                fatal_response(&e)
            }
        }
    }
    .instrument(span)
    .await
}

/// Resolves configuration for `request`, then runs it.
pub async fn handle_payload(payload: &Value) -> Value {
    let request = parse_request(payload);
    info!(
        "Payload: test_mode={}, since_hours={}, dry_run={}",
        request.test_mode, request.since_hours, request.dry_run
    );

    let pipeline = match AppConfig::from_env(!request.dry_run).and_then(|c| build_pipeline(&c)) {
        Ok(p) => p,
        Err(e) => {
            error!("Config error: {}", e);
            return fatal_response(&e);
        }
    };

    run_invocation(&pipeline, &request).await
}

/// Lambda handler. Always answers with a JSON body; fatal problems use the
/// `{ "error": ... }` shape rather than a Lambda error.
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(handle_payload(&event.payload).await)
}

pub use self::function_handler as handler;
