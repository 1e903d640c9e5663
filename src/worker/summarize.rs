use crate::clients::{NotificationSource, Summarizer};
use crate::core::models::{ReleaseCandidate, ReleaseDetails};
use crate::errors::NotifierError;
use crate::prompt::{build_user_message, clamp_summary};

/// Outcome of resolving and summarizing one candidate.
#[derive(Debug)]
pub struct SummaryResult {
    pub candidate: ReleaseCandidate,
    /// `None` when the release lookup itself failed.
    pub release: Option<ReleaseDetails>,
    pub outcome: Result<String, NotifierError>,
}

#[must_use]
pub fn format_error_entry(candidate: &ReleaseCandidate, error: &NotifierError) -> String {
    format!("{}: {}", candidate.label(), error)
}

/// Looks up the release behind `candidate` and condenses its notes.
///
/// Never fails as a whole; any error is carried in `SummaryResult::outcome`.
pub async fn summarize_candidate(
    source: &dyn NotificationSource,
    summarizer: &dyn Summarizer,
    instructions: &str,
    summary_max_chars: usize,
    candidate: ReleaseCandidate,
) -> SummaryResult {
    let release = match source.release_details(&candidate).await {
        Ok(release) => release,
        Err(e) => {
            return SummaryResult {
                candidate,
                release: None,
                outcome: Err(e),
            };
        }
    };

    let notes_text = build_user_message(
        candidate.repository_name(),
        &release.tag_name,
        release.notes(),
    );

    let outcome = summarizer
        .summarize(&notes_text, instructions)
        .await
        .map(|summary| clamp_summary(&summary, summary_max_chars))
        .and_then(|summary| {
            if summary.is_empty() {
                Err(NotifierError::Summarization("empty summary".to_string()))
            } else {
                Ok(summary)
            }
        });

    SummaryResult {
        candidate,
        release: Some(release),
        outcome,
    }
}
