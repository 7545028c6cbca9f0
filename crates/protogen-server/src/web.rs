// ABOUTME: Web UI handler serving the single-page front end via an Askama template.
// ABOUTME: The page walks the user through the five stages and offers the final prototype as a download.

use askama::Template;
use askama_derive_axum::IntoResponse as AskamaIntoResponse;
use axum::extract::State;
use protogen_core::AgentSummary;

use crate::app_state::SharedState;

/// Index page listing every pipeline step.
#[derive(Template, AskamaIntoResponse)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub agents: Vec<AgentSummary>,
    pub model: String,
}

/// GET / - Render the main index page.
pub async fn index(State(state): State<SharedState>) -> IndexTemplate {
    IndexTemplate {
        agents: state.invoker.registry().list_agents(),
        model: state.invoker.client().model_name().to_string(),
    }
}
