// ABOUTME: API module containing the JSON handlers for the protogen HTTP API.
// ABOUTME: Split into the agent listing endpoint and the single-stage processing endpoint.

pub mod agents;
pub mod process;
