// ABOUTME: Agent execution for protogen: completion providers, the stateless invoker, and the pipeline driver.
// ABOUTME: The invoker turns one InvocationRequest into one InvocationResult with exactly one provider call.

pub mod client;
pub mod invoker;
pub mod pipeline;
pub mod providers;
pub mod runtime;
pub mod testing;

pub use client::{
    InitError, ProviderSettings, build_completion_client, create_completion_client, credential_var,
    mask_credential,
};
pub use invoker::{AgentInvoker, DEFAULT_TIMEOUT};
pub use pipeline::{Pipeline, PipelineOutcome, StageOutput, extract_html};
pub use runtime::{CompletionClient, CompletionError, CompletionRequest};
