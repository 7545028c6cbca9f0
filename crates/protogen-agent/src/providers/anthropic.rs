// ABOUTME: Anthropic adapter implementing the CompletionClient trait.
// ABOUTME: Translates a CompletionRequest into a Messages API call and joins the returned text blocks.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::providers::{body_error, classify_status, http_client, transport_error};
use crate::runtime::{CompletionClient, CompletionError, CompletionRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const API_VERSION: &str = "2023-06-01";

/// Anthropic completion adapter.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl AnthropicClient {
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout,
        }
    }

    /// Build the JSON request body for the Messages API. The system prompt
    /// travels in the top-level `system` field.
    pub fn build_request_body(&self, request: &CompletionRequest) -> Value {
        json!({
            "model": self.model,
            "max_tokens": request.max_output_tokens,
            "temperature": request.temperature,
            "system": request.system,
            "messages": [
                { "role": "user", "content": request.user }
            ]
        })
    }

    /// Concatenate every text block in a Messages API response.
    pub fn parse_response(response_body: &Value) -> Result<String, CompletionError> {
        let blocks = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                CompletionError::UpstreamFormat("missing content array in response".to_string())
            })?;

        let text: String = blocks
            .iter()
            .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.trim().is_empty() {
            return Err(CompletionError::UpstreamFormat(
                "no text content in response".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = self.build_request_body(request);
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
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
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> AnthropicClient {
        AnthropicClient::new(
            "sk-ant-test".to_string(),
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
            Duration::from_secs(30),
        )
    }

    #[test]
    fn anthropic_client_creation() {
        let client = test_client();

        assert_eq!(client.provider_name(), "anthropic");
        assert_eq!(client.model_name(), DEFAULT_MODEL);
        assert_eq!(client.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn anthropic_builds_request_body() {
        let client = test_client();
        let request = CompletionRequest {
            system: "Designer UX/UI.".to_string(),
            user: "Continue.".to_string(),
            temperature: 0.7,
            max_output_tokens: 4000,
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["system"], "Designer UX/UI.");
        assert_eq!(body["max_tokens"], 4000);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Continue.");
    }

    #[test]
    fn anthropic_joins_text_blocks() {
        let response = json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": "<!DOCTYPE html>" },
                { "type": "text", "text": "<html></html>" }
            ],
            "stop_reason": "end_turn"
        });

        let text = AnthropicClient::parse_response(&response).unwrap();
        assert_eq!(text, "<!DOCTYPE html><html></html>");
    }

    #[test]
    fn anthropic_rejects_response_without_text() {
        let response = json!({
            "content": [ { "type": "tool_use", "id": "t1", "name": "x", "input": {} } ],
            "stop_reason": "tool_use"
        });

        let err = AnthropicClient::parse_response(&response).unwrap_err();
        assert!(matches!(err, CompletionError::UpstreamFormat(_)));
    }

    #[test]
    fn anthropic_rejects_missing_content() {
        let err = AnthropicClient::parse_response(&json!({})).unwrap_err();
        assert!(err.to_string().contains("content"));
    }
}
