use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use release_notifier::clients::{MessageSink, NotificationSource, Summarizer};
use release_notifier::core::models::{
    InvocationRequest, NotificationRecord, ReleaseCandidate, ReleaseDetails, SubjectType,
};
use release_notifier::errors::{DeliveryError, NotifierError};
use release_notifier::worker::pipeline::{MESSAGE_NONE_FOUND, MESSAGE_PROCESSED};
use release_notifier::worker::{Pipeline, PipelineSettings};
use serde_json::Value;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn record(id: &str, subject_type: SubjectType, hours_ago: i64) -> NotificationRecord {
    NotificationRecord {
        id: id.to_string(),
        subject_type,
        repository_name: format!("acme/repo-{id}"),
        title: format!("v{id}.0.0"),
        subject_url: Some(format!("https://api.github.com/repos/acme/repo-{id}/releases/{id}")),
        updated_at: now() - Duration::hours(hours_ago),
        raw_payload: Value::Null,
    }
}

/// Ten notifications, newest first; releases 1, 5 and 8 are in the window.
fn mixed_feed() -> Vec<NotificationRecord> {
    vec![
        record("1", SubjectType::Release, 1),
        record("2", SubjectType::Issue, 2),
        record("3", SubjectType::PullRequest, 3),
        record("4", SubjectType::Other, 4),
        record("5", SubjectType::Release, 5),
        record("6", SubjectType::Issue, 6),
        record("7", SubjectType::PullRequest, 7),
        record("8", SubjectType::Release, 8),
        record("9", SubjectType::Issue, 9),
        record("10", SubjectType::Release, 30),
    ]
}

struct FakeSource {
    records: Result<Vec<NotificationRecord>, String>,
    missing_details: HashSet<String>,
}

impl FakeSource {
    fn with(records: Vec<NotificationRecord>) -> Self {
        Self {
            records: Ok(records),
            missing_details: HashSet::new(),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            records: Err(message.to_string()),
            missing_details: HashSet::new(),
        }
    }
}

#[async_trait]
impl NotificationSource for FakeSource {
    async fn list_recent_notifications(
        &self,
        _since_hours: u32,
    ) -> Result<Vec<NotificationRecord>, NotifierError> {
        self.records.clone().map_err(NotifierError::Fetch)
    }

    async fn release_details(
        &self,
        candidate: &ReleaseCandidate,
    ) -> Result<ReleaseDetails, NotifierError> {
        if self.missing_details.contains(&candidate.record.id) {
            return Err(NotifierError::ReleaseLookup("404 Not Found".to_string()));
        }
        Ok(ReleaseDetails {
            tag_name: candidate.record.title.clone(),
            name: None,
            body: Some(format!("notes for {}", candidate.record.repository_name)),
            html_url: format!("https://github.com/{}/releases", candidate.record.repository_name),
            published_at: Some(candidate.record.updated_at),
        })
    }
}

#[derive(Default)]
struct FakeSummarizer {
    calls: Arc<Mutex<Vec<String>>>,
    fail_when_contains: Option<String>,
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, notes_text: &str, instructions: &str) -> Result<String, NotifierError> {
        assert_eq!(instructions, "INSTRUCTIONS");
        self.calls.lock().unwrap().push(notes_text.to_string());
        if let Some(marker) = &self.fail_when_contains
            && notes_text.contains(marker.as_str())
        {
            return Err(NotifierError::Summarization("quota exceeded".to_string()));
        }
        Ok("- summary".to_string())
    }
}

#[derive(Default)]
struct FakeSink {
    delivered: Arc<Mutex<Vec<String>>>,
    fail_on_call: Option<usize>,
    calls: Arc<Mutex<usize>>,
}

#[async_trait]
impl MessageSink for FakeSink {
    async fn deliver(&self, message_text: &str) -> Result<(), DeliveryError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.fail_on_call == Some(call) {
            return Err(DeliveryError::TransportFailure("status 500".to_string()));
        }
        self.delivered.lock().unwrap().push(message_text.to_string());
        Ok(())
    }
}

fn settings() -> PipelineSettings {
    PipelineSettings {
        instructions: "INSTRUCTIONS".to_string(),
        locale: "en".to_string(),
        summary_max_chars: 2000,
        concurrency: 3,
    }
}

fn request(test_mode: bool, dry_run: bool) -> InvocationRequest {
    InvocationRequest {
        test_mode,
        since_hours: 24,
        dry_run,
    }
}

#[tokio::test]
async fn all_releases_summarized_and_delivered() {
    let sink = FakeSink::default();
    let delivered = Arc::clone(&sink.delivered);
    let pipeline = Pipeline::new(
        Box::new(FakeSource::with(mixed_feed())),
        Box::new(FakeSummarizer::default()),
        Some(Box::new(sink)),
        settings(),
    );

    let report = pipeline.run_at(&request(false, false), now()).await.unwrap();

    assert_eq!(report.message, MESSAGE_PROCESSED);
    assert_eq!(report.notifications_total, 10);
    assert_eq!(report.release_notifications, 3);
    assert_eq!(report.sent, 3);
    assert_eq!(report.errors, None);

    // Oldest first so the channel reads chronologically.
    let delivered = delivered.lock().unwrap();
    assert_eq!(delivered.len(), 3);
    assert!(delivered[0].contains("acme/repo-8"));
    assert!(delivered[1].contains("acme/repo-5"));
    assert!(delivered[2].contains("acme/repo-1"));
    assert!(delivered[0].contains("- summary"));
}

#[tokio::test]
async fn delivery_failure_for_one_item_does_not_stop_others() {
    let sink = FakeSink {
        fail_on_call: Some(2),
        ..FakeSink::default()
    };
    let delivered = Arc::clone(&sink.delivered);
    let pipeline = Pipeline::new(
        Box::new(FakeSource::with(mixed_feed())),
        Box::new(FakeSummarizer::default()),
        Some(Box::new(sink)),
        settings(),
    );

    let report = pipeline.run_at(&request(false, false), now()).await.unwrap();

    assert_eq!(report.release_notifications, 3);
    assert_eq!(report.sent, 2);
    let errors = report.errors.unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("acme/repo-5 v5.0.0: "));
    assert!(errors[0].contains("status 500"));

    let delivered = delivered.lock().unwrap();
    assert!(delivered[0].contains("acme/repo-8"));
    assert!(delivered[1].contains("acme/repo-1"));
}

#[tokio::test]
async fn summarization_and_lookup_failures_are_recorded_per_item() {
    let mut source = FakeSource::with(mixed_feed());
    source.missing_details.insert("8".to_string());
    let summarizer = FakeSummarizer {
        fail_when_contains: Some("acme/repo-1\n".to_string()),
        ..FakeSummarizer::default()
    };
    let sink = FakeSink::default();
    let delivered = Arc::clone(&sink.delivered);
    let pipeline = Pipeline::new(
        Box::new(source),
        Box::new(summarizer),
        Some(Box::new(sink)),
        settings(),
    );

    let report = pipeline.run_at(&request(false, false), now()).await.unwrap();

    assert_eq!(report.sent, 1);
    let errors = report.errors.unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("acme/repo-8 v8.0.0: Failed to fetch release details"));
    assert!(errors[1].starts_with("acme/repo-1 v1.0.0: LLM summarization failed"));
    assert_eq!(delivered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mode_processes_only_first_candidate() {
    let summarizer = FakeSummarizer::default();
    let calls = Arc::clone(&summarizer.calls);
    let sink = FakeSink::default();
    let delivered = Arc::clone(&sink.delivered);
    let pipeline = Pipeline::new(
        Box::new(FakeSource::with(mixed_feed())),
        Box::new(summarizer),
        Some(Box::new(sink)),
        settings(),
    );

    let report = pipeline.run_at(&request(true, false), now()).await.unwrap();

    assert!(report.test_mode);
    assert_eq!(report.release_notifications, 3);
    assert_eq!(report.sent, 1);
    assert_eq!(calls.lock().unwrap().len(), 1);
    let delivered = delivered.lock().unwrap();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].contains("acme/repo-1"));
}

#[tokio::test]
async fn dry_run_never_calls_sink() {
    let sink = FakeSink::default();
    let sink_calls = Arc::clone(&sink.calls);
    let summarizer = FakeSummarizer {
        fail_when_contains: Some("acme/repo-5\n".to_string()),
        ..FakeSummarizer::default()
    };
    let pipeline = Pipeline::new(
        Box::new(FakeSource::with(mixed_feed())),
        Box::new(summarizer),
        Some(Box::new(sink)),
        settings(),
    );

    let report = pipeline.run_at(&request(false, true), now()).await.unwrap();

    assert_eq!(*sink_calls.lock().unwrap(), 0);
    assert_eq!(report.sent, 2);
    assert_eq!(report.errors.map(|e| e.len()), Some(1));
}

#[tokio::test]
async fn dry_run_works_without_sink() {
    let pipeline = Pipeline::new(
        Box::new(FakeSource::with(mixed_feed())),
        Box::new(FakeSummarizer::default()),
        None,
        settings(),
    );

    let report = pipeline.run_at(&request(false, true), now()).await.unwrap();
    assert_eq!(report.sent, 3);
}

#[tokio::test]
async fn live_run_without_sink_is_config_error() {
    let pipeline = Pipeline::new(
        Box::new(FakeSource::with(mixed_feed())),
        Box::new(FakeSummarizer::default()),
        None,
        settings(),
    );

    let err = pipeline.run_at(&request(false, false), now()).await.unwrap_err();
    assert!(matches!(err, NotifierError::Config(_)));
}

#[tokio::test]
async fn fetch_failure_aborts_before_processing() {
    let summarizer = FakeSummarizer::default();
    let calls = Arc::clone(&summarizer.calls);
    let pipeline = Pipeline::new(
        Box::new(FakeSource::failing("GitHub API returned 401 Unauthorized")),
        Box::new(summarizer),
        Some(Box::new(FakeSink::default())),
        settings(),
    );

    let err = pipeline.run_at(&request(false, false), now()).await.unwrap_err();

    assert!(err.is_fatal());
    assert!(err.to_string().contains("401"));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_feed_reports_zero_counts() {
    let pipeline = Pipeline::new(
        Box::new(FakeSource::with(Vec::new())),
        Box::new(FakeSummarizer::default()),
        Some(Box::new(FakeSink::default())),
        settings(),
    );

    let report = pipeline.run_at(&request(false, false), now()).await.unwrap();

    assert_eq!(report.message, MESSAGE_NONE_FOUND);
    assert_eq!(report.notifications_total, 0);
    assert_eq!(report.release_notifications, 0);
    assert_eq!(report.sent, 0);
    assert_eq!(report.errors, None);
}

#[tokio::test]
async fn counts_stay_within_bounds() {
    for fail_on_call in [None, Some(1), Some(3)] {
        for test_mode in [false, true] {
            let sink = FakeSink {
                fail_on_call,
                ..FakeSink::default()
            };
            let pipeline = Pipeline::new(
                Box::new(FakeSource::with(mixed_feed())),
                Box::new(FakeSummarizer::default()),
                Some(Box::new(sink)),
                settings(),
            );
            let report = pipeline.run_at(&request(test_mode, false), now()).await.unwrap();

            assert!(report.release_notifications <= report.notifications_total);
            assert!(report.sent <= report.release_notifications);
            let failures = report.errors.as_ref().map_or(0, Vec::len);
            let processed = if test_mode { 1 } else { 3 };
            assert_eq!(report.sent + failures, processed);
        }
    }
}
