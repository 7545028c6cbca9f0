// ABOUTME: Defines the CompletionClient trait that every LLM provider adapter implements.
// ABOUTME: Also defines CompletionRequest (what goes out) and CompletionError (what can go wrong).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use protogen_core::Instruction;

/// A single completion call: the composed instruction plus the sampling
/// parameters of the agent that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(instruction: Instruction, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            system: instruction.system,
            user: instruction.user,
            temperature,
            max_output_tokens,
        }
    }
}

/// Errors a completion call can produce. All of them are recoverable for the
/// process; the invoker reports them as failed stages.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompletionError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    UpstreamFormat(String),

    #[error("Provider call timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Provider error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Trait that all completion provider adapters implement. Adapters translate
/// a CompletionRequest into an API call and return the generated text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue one completion call and return the model's text output.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    /// Provider name for logging and display (e.g. "openai").
    fn provider_name(&self) -> &str;

    /// Model identifier being used (e.g. "gpt-4o-mini").
    fn model_name(&self) -> &str;
}
