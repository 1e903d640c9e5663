use std::env;
use std::fs;

use url::Url;

use crate::errors::NotifierError;
use crate::prompt::{DEFAULT_INSTRUCTION_TEMPLATE, render_instructions};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5-mini";
pub const DEFAULT_SUMMARY_LOCALE: &str = "ja";
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 2000;
pub const DEFAULT_SUMMARY_CONCURRENCY: usize = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github_token: String,
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub summary_locale: String,
    pub summary_max_chars: usize,
    pub summary_concurrency: usize,
    pub prompt_template_path: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from process environment.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::Config` naming the first missing or invalid variable.
    pub fn from_env(require_webhook: bool) -> Result<Self, NotifierError> {
        Self::from_lookup(|name| env::var(name).ok(), require_webhook)
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::Config` naming the first missing or invalid variable.
    pub fn from_lookup<F>(lookup: F, require_webhook: bool) -> Result<Self, NotifierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            optional(name).ok_or_else(|| {
                NotifierError::Config(format!("{name} environment variable is not set"))
            })
        };

        let github_token = required("GITHUB_TOKEN")?;
        let openai_api_key = required("OPENAI_API_KEY")?;
        let slack_webhook_url = match optional("SLACK_WEBHOOK_URL") {
            Some(raw) => Some(validate_webhook_url(&raw)?),
            None if require_webhook => {
                return Err(NotifierError::Config(
                    "SLACK_WEBHOOK_URL environment variable is not set".to_string(),
                ));
            }
            None => None,
        };

        Ok(Self {
            github_token,
            openai_api_key,
            openai_org_id: optional("OPENAI_ORG_ID"),
            openai_model: optional("OPENAI_MODEL"),
            slack_webhook_url,
            summary_locale: optional("SUMMARY_LOCALE")
                .unwrap_or_else(|| DEFAULT_SUMMARY_LOCALE.to_string()),
            summary_max_chars: parse_positive(
                "SUMMARY_MAX_CHARS",
                optional("SUMMARY_MAX_CHARS"),
                DEFAULT_SUMMARY_MAX_CHARS,
            )?,
            summary_concurrency: parse_positive(
                "SUMMARY_CONCURRENCY",
                optional("SUMMARY_CONCURRENCY"),
                DEFAULT_SUMMARY_CONCURRENCY,
            )?,
            prompt_template_path: optional("PROMPT_TEMPLATE_PATH"),
        })
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.openai_model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL)
    }

    /// Loads the instruction template and renders it for the configured
    /// locale and character budget.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::Config` when `PROMPT_TEMPLATE_PATH` cannot be read.
    pub fn load_instructions(&self) -> Result<String, NotifierError> {
        let template = match &self.prompt_template_path {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                NotifierError::Config(format!("Prompt template file {path} not readable: {e}"))
            })?,
            None => DEFAULT_INSTRUCTION_TEMPLATE.to_string(),
        };
        Ok(render_instructions(
            &template,
            &self.summary_locale,
            self.summary_max_chars,
        ))
    }
}

fn validate_webhook_url(raw: &str) -> Result<String, NotifierError> {
    let parsed = Url::parse(raw)
        .map_err(|e| NotifierError::Config(format!("SLACK_WEBHOOK_URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(NotifierError::Config(format!(
            "SLACK_WEBHOOK_URL: unsupported scheme {}",
            parsed.scheme()
        )));
    }
    Ok(raw.to_string())
}

fn parse_positive(
    name: &str,
    raw: Option<String>,
    default: usize,
) -> Result<usize, NotifierError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(NotifierError::Config(format!(
                "{name}: expected a positive integer, got {value:?}"
            ))),
        },
    }
}
