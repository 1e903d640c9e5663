//! GitHub Notifications API client
//!
//! Reads the authenticated user's notification feed and resolves release
//! subjects to their release resource.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::NotificationSource;
use crate::core::models::{NotificationRecord, ReleaseCandidate, ReleaseDetails, SubjectType};
use crate::errors::NotifierError;

pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct RawNotification {
    id: String,
    subject: RawSubject,
    repository: RawRepository,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RawSubject {
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "type")]
    subject_type: SubjectType,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    full_name: String,
}

/// Converts one element of the `/notifications` response, keeping the raw JSON.
///
/// # Errors
///
/// Returns the serde error when required fields are missing or malformed.
pub fn parse_notification(raw: Value) -> Result<NotificationRecord, serde_json::Error> {
    let parsed: RawNotification = serde_json::from_value(raw.clone())?;
    Ok(NotificationRecord {
        id: parsed.id,
        subject_type: parsed.subject.subject_type,
        repository_name: parsed.repository.full_name,
        title: parsed.subject.title,
        subject_url: parsed.subject.url,
        updated_at: parsed.updated_at,
        raw_payload: raw,
    })
}

pub struct GitHubClient {
    http: Client,
    base_url: String,
}

impl GitHubClient {
    /// # Errors
    ///
    /// Returns `NotifierError::Config` if the token is not a valid header value
    /// or the HTTP client cannot be built.
    pub fn new(token: &str) -> Result<Self, NotifierError> {
        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| NotifierError::Config(format!("Invalid GITHUB_TOKEN: {e}")))?;
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("release-notifier/", env!("CARGO_PKG_VERSION"))),
        );

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| NotifierError::Config(format!("Failed to build GitHub HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: GITHUB_API_BASE_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetches notifications updated after `since`, read ones included.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::Fetch` on transport failure, non-success status
    /// or a body that is not a JSON array.
    pub async fn get_notifications(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<NotificationRecord>, NotifierError> {
        let url = format!("{}/notifications", self.base_url);
        let since_str = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let page_size = PAGE_SIZE.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("all", "true"),
                ("since", since_str.as_str()),
                ("per_page", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| NotifierError::Fetch(format!("GitHub API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(NotifierError::Fetch(format!(
                "GitHub API returned {status}: {body}"
            )));
        }

        let items: Vec<Value> = response
            .json()
            .await
            .map_err(|e| NotifierError::Fetch(format!("Invalid notifications payload: {e}")))?;

        let records: Vec<NotificationRecord> = items
            .into_iter()
            .filter_map(|item| match parse_notification(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed notification: {}", e);
                    None
                }
            })
            .collect();

        info!("Fetched {} notifications since {}", records.len(), since_str);
        Ok(records)
    }

    /// # Errors
    ///
    /// Returns `NotifierError::ReleaseLookup` if the release cannot be fetched or parsed.
    pub async fn get_release_details(
        &self,
        release_url: &str,
    ) -> Result<ReleaseDetails, NotifierError> {
        let response = self
            .http
            .get(release_url)
            .send()
            .await
            .map_err(|e| NotifierError::ReleaseLookup(format!("{release_url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifierError::ReleaseLookup(format!(
                "{release_url} returned {status}"
            )));
        }

        response
            .json::<ReleaseDetails>()
            .await
            .map_err(|e| NotifierError::ReleaseLookup(format!("{release_url}: {e}")))
    }
}

#[async_trait]
impl NotificationSource for GitHubClient {
    async fn list_recent_notifications(
        &self,
        since_hours: u32,
    ) -> Result<Vec<NotificationRecord>, NotifierError> {
        let since = Utc::now()
            .checked_sub_signed(chrono::Duration::hours(i64::from(since_hours)))
            .ok_or_else(|| {
                NotifierError::Fetch(format!("since_hours {since_hours} is out of range"))
            })?;
        self.get_notifications(since).await
    }

    async fn release_details(
        &self,
        candidate: &ReleaseCandidate,
    ) -> Result<ReleaseDetails, NotifierError> {
        let url = candidate.record.subject_url.as_deref().ok_or_else(|| {
            NotifierError::ReleaseLookup("notification has no release URL".to_string())
        })?;
        self.get_release_details(url).await
    }
}
