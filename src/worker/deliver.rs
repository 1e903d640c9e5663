use tracing::info;

use super::summarize::{SummaryResult, format_error_entry};
use crate::clients::MessageSink;
use crate::errors::NotifierError;
use crate::slack::format_release_message;

/// Formats and sends one summarized release.
///
/// In dry-run mode nothing is sent and the item counts as delivered.
///
/// # Errors
///
/// Returns the report entry describing why the item was not delivered.
pub async fn deliver_result(
    sink: Option<&dyn MessageSink>,
    result: SummaryResult,
    locale: &str,
    dry_run: bool,
) -> Result<(), String> {
    let SummaryResult {
        candidate,
        release,
        outcome,
    } = result;

    let (summary, release) = match (outcome, release) {
        (Ok(summary), Some(release)) => (summary, release),
        (Err(e), _) => return Err(format_error_entry(&candidate, &e)),
        (Ok(_), None) => {
            let e = NotifierError::ReleaseLookup("release details missing".to_string());
            return Err(format_error_entry(&candidate, &e));
        }
    };

    let message = format_release_message(candidate.repository_name(), &release, &summary, locale);

    if dry_run {
        info!(
            "Dry run: not sending {} ({} chars)\n{}",
            candidate.label(),
            message.chars().count(),
            message
        );
        return Ok(());
    }

    let Some(sink) = sink else {
        let e = NotifierError::Config("no Slack webhook configured".to_string());
        return Err(format_error_entry(&candidate, &e));
    };

    sink.deliver(&message)
        .await
        .map_err(|e| format_error_entry(&candidate, &NotifierError::Delivery(e)))
}
