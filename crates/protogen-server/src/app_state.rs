// ABOUTME: Shared application state for the protogen HTTP server.
// ABOUTME: Wraps the stateless AgentInvoker so every handler shares one registry and one completion client.

use std::sync::Arc;

use protogen_agent::AgentInvoker;

/// Shared application state accessible by all Axum handlers. Nothing in here
/// is mutated after startup.
pub struct AppState {
    pub invoker: AgentInvoker,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(invoker: AgentInvoker) -> Self {
        Self { invoker }
    }
}
