//! LLM (`OpenAI`) API client module
//!
//! Condenses release notes through the Responses API. Each call is
//! independent: no shared state, caching or batching across releases.

use std::time::Duration;

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

use super::Summarizer;
use crate::errors::NotifierError;

pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_TEMPERATURE: f32 = 0.3;

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Reasoning models only accept the default temperature.
#[must_use]
pub fn supports_temperature(model_name: &str) -> bool {
    !model_name.starts_with("gpt-5")
}

/// LLM API client for summarizing release notes
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    base_url: String,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns `NotifierError::Config` if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        org_id: Option<String>,
        model_name: String,
    ) -> Result<Self, NotifierError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotifierError::Config(format!("Failed to build OpenAI HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_key,
            org_id,
            model_name,
            base_url: OPENAI_API_BASE_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    #[must_use]
    pub fn build_prompt(&self, instructions: &str, notes_text: &str) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(instructions.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(notes_text.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    #[must_use]
    pub fn build_request_body(&self, prompt: &[ChatCompletionMessage]) -> Value {
        let mut body = json!({
            "model": self.model_name,
            "input": build_responses_input_from_prompt(prompt),
        });
        if supports_temperature(&self.model_name) {
            body["temperature"] = json!(DEFAULT_TEMPERATURE);
        }
        body
    }

    /// # Errors
    ///
    /// Returns `NotifierError::Summarization` on request failure, non-success
    /// status, unparsable body or a response without text.
    pub async fn generate_summary(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<String, NotifierError> {
        #[cfg(feature = "debug-logs")]
        info!("Using ChatGPT prompt:\n{:?}", prompt);

        let estimated_input_tokens = prompt
            .iter()
            .map(|msg| estimate_tokens(&format!("{:?}", msg.content)))
            .sum::<usize>();
        info!(
            "Requesting summary from {} (~{} input tokens)",
            self.model_name, estimated_input_tokens
        );

        let request_body = self.build_request_body(&prompt);

        let mut request = self
            .http
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body);
        if let Some(org) = &self.org_id {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.send().await.map_err(|e| {
            NotifierError::Summarization(format!("OpenAI API request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(NotifierError::Summarization(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            NotifierError::Summarization(format!("Failed to parse OpenAI response: {e}"))
        })?;

        extract_output_text(&response_json)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| NotifierError::Summarization("No text in response".to_string()))
    }
}

#[async_trait]
impl Summarizer for LlmClient {
    async fn summarize(
        &self,
        notes_text: &str,
        instructions: &str,
    ) -> Result<String, NotifierError> {
        let prompt = self.build_prompt(instructions, notes_text);
        self.generate_summary(prompt).await
    }
}

/// Build Responses API input payload from a chat-style prompt.
pub(crate) fn build_responses_input_from_prompt(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter_map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
                MessageRole::assistant => "assistant",
            };
            match &m.content {
                Content::Text(t) => Some(json!({
                    "role": role_str,
                    "content": [{ "type": "input_text", "text": t }]
                })),
                Content::ImageUrl(_) => None,
            }
        })
        .collect()
}

/// Pull the generated text out of a Responses API body.
///
/// Prefers the `output_text` convenience field and falls back to joining the
/// `output_text` parts of `output[].content[]`.
pub(crate) fn extract_output_text(response_json: &Value) -> Option<String> {
    response_json
        .get("output_text")
        .and_then(|v| v.as_str())
        .map(std::string::ToString::to_string)
        .or_else(|| {
            let mut collected: Vec<String> = Vec::new();
            if let Some(items) = response_json.get("output").and_then(|o| o.as_array()) {
                for item in items {
                    if let Some(parts) = item.get("content").and_then(|c| c.as_array()) {
                        for p in parts {
                            let is_output_text = p
                                .get("type")
                                .and_then(|t| t.as_str())
                                .is_some_and(|t| t == "output_text");
                            if !is_output_text {
                                continue;
                            }
                            if let Some(s) = p.get("text").and_then(|t| t.as_str()) {
                                collected.push(s.to_string());
                            } else if let Some(s) = p
                                .get("text")
                                .and_then(|t| t.get("value"))
                                .and_then(|v| v.as_str())
                            {
                                collected.push(s.to_string());
                            }
                        }
                    }
                }
            }
            if collected.is_empty() {
                None
            } else {
                Some(collected.join("\n"))
            }
        })
}
