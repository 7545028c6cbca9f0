// ABOUTME: End-to-end smoke test driving the five-stage flow through the HTTP API.
// ABOUTME: Plays the browser client's role: lists agents, runs each stage with forwarded context, renders the index.

use std::sync::Arc;

use axum::body::Body;
use http::Request;
use protogen_agent::AgentInvoker;
use protogen_agent::testing::StubCompletionClient;
use protogen_core::AgentRegistry;
use protogen_server::{AppState, create_router};
use tower::ServiceExt;

/// Helper to create a test AppState backed by the given stub client.
fn test_app_state(stub: Arc<StubCompletionClient>) -> Arc<AppState> {
    let invoker = AgentInvoker::new(Arc::new(AgentRegistry::builtin()), stub);
    Arc::new(AppState::new(invoker))
}

/// Helper to extract JSON body from a response.
async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn smoke_test_full_pipeline() {
    let stub = Arc::new(StubCompletionClient::echo());
    let state = test_app_state(Arc::clone(&stub));

    // 1. GET /api/agents -> five steps in order
    let app = create_router(Arc::clone(&state));
    let resp = app
        .oneshot(Request::get("/api/agents").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let agents = json_body(resp).await;
    let ids: Vec<String> = agents
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        ids,
        vec!["discovery", "structure", "design", "implementation", "refinement"]
    );

    // 2. POST /api/process-agent for every step, forwarding context
    let mut context = String::new();
    for (index, agent_id) in ids.iter().enumerate() {
        let user_input = if index == 0 { "a recipe-sharing app" } else { "" };
        let body = serde_json::json!({
            "agent_id": agent_id,
            "user_input": user_input,
            "context": context,
        });

        let app = create_router(Arc::clone(&state));
        let resp = app
            .oneshot(
                Request::post("/api/process-agent")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), 200, "stage {} should succeed", agent_id);
        let json = json_body(resp).await;
        assert_eq!(json["success"], true);
        let response = json["response"].as_str().unwrap();
        let agent_name = json["agent_name"].as_str().unwrap();
        assert!(!response.is_empty());

        if index == 0 {
            assert_eq!(agent_name, "Discovery (Descoberta & Serendipidade)");
            assert!(response.contains("a recipe-sharing app"));
        } else {
            assert!(
                response.contains("Contexto:"),
                "stage {} should see forwarded context",
                agent_id
            );
        }

        if !context.is_empty() {
            context.push_str("\n\n");
        }
        context.push_str(&format!("## {}\n{}", agent_name, response.trim()));
    }

    // 3. Exactly one provider call per stage, each with the stage's parameters
    assert_eq!(stub.call_count(), 5);
    let budgets: Vec<u32> = stub
        .requests()
        .iter()
        .map(|r| r.max_output_tokens)
        .collect();
    assert_eq!(budgets, vec![1500, 1500, 1500, 4000, 4000]);

    // 4. GET / -> verify HTML renders
    let app = create_router(Arc::clone(&state));
    let resp = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), 200, "index should return 200");
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("<!DOCTYPE html>"), "index should return valid HTML");
    assert!(html.contains("protogen"), "index should contain protogen");
}
