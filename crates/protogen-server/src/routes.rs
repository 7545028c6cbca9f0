// ABOUTME: Route definitions for the protogen HTTP API and web front end.
// ABOUTME: Assembles all routes into a single Axum Router with shared state and request tracing.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::app_state::SharedState;
use crate::{api, web};

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(web::index))
        .route("/health", get(health))
        .route("/api/agents", get(api::agents::list_agents))
        .route("/api/process-agent", post(api::process::process_agent))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler. Reports the active provider and model.
async fn health(State(state): State<SharedState>) -> axum::Json<serde_json::Value> {
    let client = state.invoker.client();
    axum::Json(serde_json::json!({
        "status": "ok",
        "provider": client.provider_name(),
        "model": client.model_name(),
    }))
}
