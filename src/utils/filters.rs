use chrono::{DateTime, Duration, Utc};

use crate::core::models::{NotificationRecord, ReleaseCandidate, SubjectType};

/// Keeps only release notifications updated within `since_hours` of `now`.
///
/// The window is inclusive: a record exactly `since_hours` old is kept.
/// Feed order is preserved.
#[must_use]
pub fn filter_releases(
    records: &[NotificationRecord],
    since_hours: u32,
    now: DateTime<Utc>,
) -> Vec<ReleaseCandidate> {
    let window = Duration::hours(i64::from(since_hours));
    records
        .iter()
        .filter(|record| {
            let is_release = record.subject_type == SubjectType::Release;
            let in_window = now.signed_duration_since(record.updated_at) <= window;

            is_release && in_window
        })
        .cloned()
        .map(|record| ReleaseCandidate { record })
        .collect()
}
