use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_SINCE_HOURS: u32 = 24;

/// Kind of thing a notification points at (`subject.type` in the GitHub API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectType {
    Release,
    Issue,
    PullRequest,
    #[serde(other)]
    Other,
}

/// One entry of the notification feed, immutable once fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    pub id: String,
    pub subject_type: SubjectType,
    pub repository_name: String,
    pub title: String,
    /// API URL of the subject, e.g. the release resource.
    pub subject_url: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub raw_payload: Value,
}

/// A notification known to be a release published inside the query window.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseCandidate {
    pub record: NotificationRecord,
}

impl ReleaseCandidate {
    #[must_use]
    pub fn repository_name(&self) -> &str {
        &self.record.repository_name
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.record.title
    }

    /// `"<repository> <title>"`, the prefix used in logs and error entries.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.record.repository_name, self.record.title)
    }
}

/// Release resource looked up for a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseDetails {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl ReleaseDetails {
    #[must_use]
    pub fn notes(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// Request body of one invocation. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    #[serde(default)]
    pub test_mode: bool,
    #[serde(default = "default_since_hours")]
    pub since_hours: u32,
    #[serde(default)]
    pub dry_run: bool,
}

const fn default_since_hours() -> u32 {
    DEFAULT_SINCE_HOURS
}

impl Default for InvocationRequest {
    fn default() -> Self {
        Self {
            test_mode: false,
            since_hours: DEFAULT_SINCE_HOURS,
            dry_run: false,
        }
    }
}

/// The externally visible outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationReport {
    pub message: String,
    pub test_mode: bool,
    pub since_hours: u32,
    pub notifications_total: usize,
    pub release_notifications: usize,
    pub sent: usize,
    /// `None` serializes as `null` and means no item failed.
    pub errors: Option<Vec<String>>,
}
