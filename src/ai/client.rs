//! LLM (`OpenAI`) API client module
//!
//! Sends prompts to the legacy completions endpoint and returns the cleaned text.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::params::{CompletionOverrides, CompletionParams};
use crate::errors::BotError;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/completions";

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the upstream request fails or yields no text.
    async fn complete(
        &self,
        prompt: &str,
        overrides: &CompletionOverrides,
    ) -> Result<String, BotError>;
}

/// Strips whitespace, then any surrounding double quotes.
#[must_use]
pub fn clean_completion_text(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

/// Pulls `choices[0].text` out of a completions response body.
///
/// # Errors
///
/// Returns `BotError::OpenAIError` if the body carries no text choice.
pub fn extract_completion_text(response_json: &Value) -> Result<String, BotError> {
    response_json
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("text"))
        .and_then(Value::as_str)
        .map(clean_completion_text)
        .ok_or_else(|| BotError::OpenAIError("No text in completion response".to_string()))
}

/// LLM API client for generating replies
pub struct LlmClient {
    api_key: String,
    org_id: Option<String>,
    params: CompletionParams,
    http: Client,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        org_id: Option<String>,
        params: CompletionParams,
    ) -> Result<Self, BotError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| BotError::HttpError(format!("Failed to build OpenAI HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            org_id,
            params,
            http,
        })
    }
}

#[async_trait]
impl CompletionApi for LlmClient {
    async fn complete(
        &self,
        prompt: &str,
        overrides: &CompletionOverrides,
    ) -> Result<String, BotError> {
        let request = self.params.merged(overrides).to_request(prompt);

        #[cfg(feature = "debug-logs")]
        debug!("Using completion prompt:\n{}", prompt);

        info!(
            model = %request.model,
            prompt_chars = prompt.chars().count(),
            stop_count = request.stop.as_ref().map_or(0, Vec::len),
            "Requesting completion"
        );

        let mut builder = self
            .http
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request);

        if let Some(org) = &self.org_id {
            builder = builder.header("OpenAI-Organization", org);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(BotError::OpenAIError(format!(
                "OpenAI API error (status {status}): {error_text}"
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| BotError::OpenAIError(format!("Failed to parse OpenAI response: {e}")))?;
        debug!("OpenAI response: {}", response_json);

        extract_completion_text(&response_json)
    }
}
