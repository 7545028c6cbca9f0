// ABOUTME: The agent invoker: runs exactly one pipeline stage per call against the completion client.
// ABOUTME: Resolves the agent, composes its prompt, applies its sampling parameters, and normalizes the outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use protogen_core::{AgentRegistry, InvocationRequest, InvocationResult, RegistryError};
use ulid::Ulid;

use crate::runtime::{CompletionClient, CompletionError, CompletionRequest};

/// Per-call limit applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Why a stage failed before it is flattened into an InvocationResult.
#[derive(Debug, thiserror::Error)]
enum InvokeError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{agent} failed: {source}")]
    Upstream {
        agent: String,
        #[source]
        source: CompletionError,
    },
}

/// Stateless stage executor. Holds only the read-only registry and the
/// injected completion client, so one instance can be shared across any
/// number of concurrent requests.
#[derive(Clone)]
pub struct AgentInvoker {
    registry: Arc<AgentRegistry>,
    client: Arc<dyn CompletionClient>,
    timeout: Duration,
}

impl AgentInvoker {
    pub fn new(registry: Arc<AgentRegistry>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            registry,
            client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the per-call timeout on the completion call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn client(&self) -> &dyn CompletionClient {
        self.client.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one stage. Never fails: unknown agents and provider failures come
    /// back as `success: false` results with a message.
    pub async fn invoke(&self, request: &InvocationRequest) -> InvocationResult {
        let invocation_id = Ulid::new();
        let started = Instant::now();

        match self.try_invoke(request).await {
            Ok((text, agent_name)) => {
                tracing::info!(
                    %invocation_id,
                    agent = %request.agent_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    response_chars = text.chars().count(),
                    "agent stage completed"
                );
                InvocationResult::success(text, agent_name)
            }
            Err(e) => {
                tracing::warn!(
                    %invocation_id,
                    agent = %request.agent_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "agent stage failed: {}",
                    e
                );
                InvocationResult::failure(e.to_string())
            }
        }
    }

    async fn try_invoke(
        &self,
        request: &InvocationRequest,
    ) -> Result<(String, String), InvokeError> {
        let spec = self.registry.get(&request.agent_id)?;

        let instruction = spec.compose(&request.user_input, &request.context);
        let completion = CompletionRequest::new(instruction, spec.temperature, spec.max_tokens);

        tracing::debug!(
            agent = %spec.id,
            provider = self.client.provider_name(),
            model = self.client.model_name(),
            temperature = spec.temperature,
            max_tokens = spec.max_tokens,
            context_chars = request.context.chars().count(),
            "calling completion provider"
        );

        let outcome = tokio::time::timeout(self.timeout, self.client.complete(&completion))
            .await
            .unwrap_or(Err(CompletionError::Timeout(self.timeout)));

        match outcome {
            Ok(text) => Ok((text, spec.display_name.clone())),
            Err(source) => Err(InvokeError::Upstream {
                agent: spec.display_name.clone(),
                source,
            }),
        }
    }
}
