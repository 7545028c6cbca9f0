// ABOUTME: Agent listing endpoint used by clients to drive the five-step flow.
// ABOUTME: GET /api/agents returns the registry's {id, name} pairs in pipeline order.

use axum::Json;
use axum::extract::State;
use protogen_core::AgentSummary;

use crate::app_state::SharedState;

/// GET /api/agents - List all agents in pipeline order.
pub async fn list_agents(State(state): State<SharedState>) -> Json<Vec<AgentSummary>> {
    Json(state.invoker.registry().list_agents())
}
