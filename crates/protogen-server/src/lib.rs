// ABOUTME: HTTP server for protogen, exposing the agent list, stage processing, and the web front end.
// ABOUTME: Uses Axum with a shared, read-only AgentInvoker; every request is handled statelessly.

pub mod api;
pub mod app_state;
pub mod config;
pub mod routes;
pub mod web;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, ProtogenConfig};
pub use routes::create_router;
