// ABOUTME: Per-call request and result shapes for running one pipeline stage.
// ABOUTME: InvocationResult serializes to the {success, response?, agent_name?, error?} wire shape.

use serde::{Deserialize, Serialize};

/// One stage invocation. `user_input` and `context` default to empty so the
/// transport can accept bodies that omit them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub agent_id: String,
    #[serde(default)]
    pub user_input: String,
    #[serde(default)]
    pub context: String,
}

impl InvocationRequest {
    pub fn new(agent_id: &str, user_input: &str, context: &str) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            user_input: user_input.to_string(),
            context: context.to_string(),
        }
    }
}

const FALLBACK_ERROR: &str = "agent invocation failed";

/// Normalized outcome of one stage. Only [`InvocationResult::success`] and
/// [`InvocationResult::failure`] build one, so a response and agent name are
/// present exactly when the stage succeeded and an error message exactly when
/// it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    success: bool,
    #[serde(rename = "response", skip_serializing_if = "Option::is_none")]
    response_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    agent_name: Option<String>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl InvocationResult {
    pub fn success(response_text: String, agent_name: String) -> Self {
        Self {
            success: true,
            response_text: Some(response_text),
            agent_name: Some(agent_name),
            error_message: None,
        }
    }

    /// A failed stage. An empty message is replaced so the caller always has
    /// something to show.
    pub fn failure(error_message: impl Into<String>) -> Self {
        let mut message: String = error_message.into();
        if message.trim().is_empty() {
            message = FALLBACK_ERROR.to_string();
        }
        Self {
            success: false,
            response_text: None,
            agent_name: None,
            error_message: Some(message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn response_text(&self) -> Option<&str> {
        self.response_text.as_deref()
    }

    pub fn agent_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Split into `Ok((response, agent_name))` or `Err(message)`.
    pub fn into_outcome(self) -> Result<(String, String), String> {
        let Self {
            success,
            response_text,
            agent_name,
            error_message,
        } = self;
        match (success, response_text, agent_name) {
            (true, Some(response), Some(agent_name)) => Ok((response, agent_name)),
            _ => Err(error_message.unwrap_or_else(|| FALLBACK_ERROR.to_string())),
        }
    }
}
