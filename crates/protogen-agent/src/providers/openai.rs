// ABOUTME: OpenAI adapter implementing the CompletionClient trait.
// ABOUTME: Translates a CompletionRequest into a Chat Completions call and extracts the message text.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::providers::{body_error, classify_status, http_client, transport_error};
use crate::runtime::{CompletionClient, CompletionError, CompletionRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// OpenAI completion adapter. Sends a system + user message pair to the
/// Chat Completions API with the agent's temperature and token budget.
pub struct OpenAIClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAIClient {
    /// Create a new OpenAIClient with explicit configuration.
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
        }
    }

    /// Build the JSON request body for the Chat Completions API.
    pub fn build_request_body(&self, request: &CompletionRequest) -> Value {
        json!({
            "model": self.model,
            "max_tokens": request.max_output_tokens,
            "temperature": request.temperature,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user }
            ]
        })
    }

    /// Extract the assistant text from a Chat Completions response.
    pub fn parse_response(response_body: &Value) -> Result<String, CompletionError> {
        let choice = response_body
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                CompletionError::UpstreamFormat("missing choices array in response".to_string())
            })?
            .first()
            .ok_or_else(|| CompletionError::UpstreamFormat("empty choices array".to_string()))?;

        let content = choice
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                CompletionError::UpstreamFormat("missing message content in choice".to_string())
            })?;

        if content.trim().is_empty() {
            return Err(CompletionError::UpstreamFormat(
                "empty message content".to_string(),
            ));
        }

        Ok(content.to_string())
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = self.build_request_body(request);
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &error_body, API_KEY_VAR, self.timeout));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| body_error(e, self.timeout))?;

        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
