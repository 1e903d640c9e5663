//! Invocation pipeline: fetch, filter, summarize and deliver releases.
//!
//! One pass per invocation with no state carried across invocations. Fetch
//! failures abort the run; anything that goes wrong for a single release is
//! recorded in the report and the loop moves on to the next one.

use std::fmt;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{error, info};

use super::deliver::deliver_result;
use super::summarize::{SummaryResult, summarize_candidate};
use crate::clients::{MessageSink, NotificationSource, Summarizer};
use crate::core::config::AppConfig;
use crate::core::models::{InvocationReport, InvocationRequest, ReleaseCandidate};
use crate::errors::NotifierError;
use crate::utils::filters::filter_releases;

pub const MESSAGE_PROCESSED: &str = "GitHub Release notifications processed";
pub const MESSAGE_NONE_FOUND: &str = "No release notifications found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Filtering,
    ProcessingItems,
    Reporting,
    Done,
    AbortedEarly,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Fetching => "fetching",
            Stage::Filtering => "filtering",
            Stage::ProcessingItems => "processing_items",
            Stage::Reporting => "reporting",
            Stage::Done => "done",
            Stage::AbortedEarly => "aborted_early",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Rendered instruction template passed to every summarize call.
    pub instructions: String,
    pub locale: String,
    pub summary_max_chars: usize,
    /// Upper bound on summarize calls in flight.
    pub concurrency: usize,
}

impl PipelineSettings {
    /// # Errors
    ///
    /// Returns `NotifierError::Config` if the instruction template cannot be loaded.
    pub fn from_config(config: &AppConfig) -> Result<Self, NotifierError> {
        Ok(Self {
            instructions: config.load_instructions()?,
            locale: config.summary_locale.clone(),
            summary_max_chars: config.summary_max_chars,
            concurrency: config.summary_concurrency,
        })
    }
}

pub struct Pipeline {
    source: Box<dyn NotificationSource>,
    summarizer: Box<dyn Summarizer>,
    sink: Option<Box<dyn MessageSink>>,
    settings: PipelineSettings,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        source: Box<dyn NotificationSource>,
        summarizer: Box<dyn Summarizer>,
        sink: Option<Box<dyn MessageSink>>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            summarizer,
            sink,
            settings,
        }
    }

    /// # Errors
    ///
    /// See [`Pipeline::run_at`].
    pub async fn run(&self, request: &InvocationRequest) -> Result<InvocationReport, NotifierError> {
        self.run_at(request, Utc::now()).await
    }

    /// Runs one invocation using `now` as the reference time for the window.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::Config` when a live run has no sink and
    /// `NotifierError::Fetch` when the notification feed cannot be read.
    /// Per-release failures never surface here; they are listed in the report.
    pub async fn run_at(
        &self,
        request: &InvocationRequest,
        now: DateTime<Utc>,
    ) -> Result<InvocationReport, NotifierError> {
        let mut stage = Stage::Idle;
        info!(
            "Pipeline {}: test_mode={} since_hours={} dry_run={}",
            stage, request.test_mode, request.since_hours, request.dry_run
        );

        if !request.dry_run && self.sink.is_none() {
            return Err(NotifierError::Config(
                "SLACK_WEBHOOK_URL is required unless running in dry-run mode".to_string(),
            ));
        }

        stage = Stage::Fetching;
        info!(
            "Pipeline {}: notifications from the last {} hours",
            stage, request.since_hours
        );
        let notifications = match self
            .source
            .list_recent_notifications(request.since_hours)
            .await
        {
            Ok(n) => n,
            Err(e) => {
                error!("Pipeline {}: {}", Stage::AbortedEarly, e);
                return Err(e);
            }
        };
        info!("Found {} notifications", notifications.len());

        stage = Stage::Filtering;
        let candidates = filter_releases(&notifications, request.since_hours, now);
        info!(
            "Pipeline {}: {} release notifications",
            stage,
            candidates.len()
        );

        if candidates.is_empty() {
            info!("Pipeline {}: nothing to process", Stage::Done);
            return Ok(InvocationReport {
                message: MESSAGE_NONE_FOUND.to_string(),
                test_mode: request.test_mode,
                since_hours: request.since_hours,
                notifications_total: notifications.len(),
                release_notifications: 0,
                sent: 0,
                errors: None,
            });
        }

        stage = Stage::ProcessingItems;
        let selected = select_candidates(&candidates, request.test_mode);
        info!(
            "Pipeline {}: processing {} of {} releases",
            stage,
            selected.len(),
            candidates.len()
        );

        let results = self.summarize_all(selected).await;
        let (sent, errors) = self.deliver_all(results, request.dry_run).await;

        stage = Stage::Reporting;
        info!(
            "Pipeline {}: {}/{} sent, {} errors",
            stage,
            sent,
            candidates.len(),
            errors.len()
        );

        let report = InvocationReport {
            message: MESSAGE_PROCESSED.to_string(),
            test_mode: request.test_mode,
            since_hours: request.since_hours,
            notifications_total: notifications.len(),
            release_notifications: candidates.len(),
            sent,
            errors: if errors.is_empty() { None } else { Some(errors) },
        };
        info!("Pipeline {}", Stage::Done);
        Ok(report)
    }

    /// Summarizes with bounded concurrency; results keep input order.
    async fn summarize_all(&self, selected: Vec<ReleaseCandidate>) -> Vec<SummaryResult> {
        let total = selected.len();
        let source = self.source.as_ref();
        let summarizer = self.summarizer.as_ref();
        let instructions = self.settings.instructions.as_str();
        let max_chars = self.settings.summary_max_chars;

        stream::iter(selected.into_iter().enumerate())
            .map(|(idx, candidate)| async move {
                let label = candidate.label();
                let result =
                    summarize_candidate(source, summarizer, instructions, max_chars, candidate)
                        .await;
                match &result.outcome {
                    Ok(summary) => info!(
                        "  [{}/{}] Summarized: {} ({} chars)",
                        idx + 1,
                        total,
                        label,
                        summary.chars().count()
                    ),
                    Err(e) => error!("  [{}/{}] Summarization failed: {}: {}", idx + 1, total, label, e),
                }
                result
            })
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await
    }

    /// Delivers sequentially; the only place report counters are written.
    async fn deliver_all(&self, results: Vec<SummaryResult>, dry_run: bool) -> (usize, Vec<String>) {
        let total = results.len();
        let sink = self.sink.as_deref();
        let mut sent = 0;
        let mut errors = Vec::new();

        for (idx, result) in results.into_iter().enumerate() {
            let label = result.candidate.label();
            match deliver_result(sink, result, &self.settings.locale, dry_run).await {
                Ok(()) => {
                    sent += 1;
                    info!("  [{}/{}] Delivered: {}", idx + 1, total, label);
                }
                Err(entry) => {
                    error!("  [{}/{}] Not delivered: {}", idx + 1, total, entry);
                    errors.push(entry);
                }
            }
        }

        (sent, errors)
    }
}

/// Test mode keeps only the newest candidate; otherwise all candidates are
/// processed oldest first (the feed lists newest first).
#[must_use]
pub fn select_candidates(candidates: &[ReleaseCandidate], test_mode: bool) -> Vec<ReleaseCandidate> {
    if test_mode {
        candidates.iter().take(1).cloned().collect()
    } else {
        candidates.iter().rev().cloned().collect()
    }
}
