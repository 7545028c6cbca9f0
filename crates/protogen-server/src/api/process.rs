// ABOUTME: Stage processing endpoint: runs one agent for the caller-supplied input and context.
// ABOUTME: POST /api/process-agent always answers with the {success, response?, agent_name?, error?} shape.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use protogen_core::{InvocationRequest, InvocationResult};

use crate::app_state::SharedState;

/// POST /api/process-agent - Run one pipeline stage.
///
/// Unknown agents answer 400 and upstream failures 502; the body is an
/// InvocationResult either way so clients only ever check `success`.
pub async fn process_agent(
    State(state): State<SharedState>,
    Json(req): Json<InvocationRequest>,
) -> impl IntoResponse {
    let known = state.invoker.registry().get(&req.agent_id).is_ok();
    let result: InvocationResult = state.invoker.invoke(&req).await;

    let status = if result.is_success() {
        StatusCode::OK
    } else if !known {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    };

    (status, Json(result))
}
