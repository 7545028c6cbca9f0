// ABOUTME: AgentSpec describes one pipeline stage: its prompt, sampling temperature, and token budget.
// ABOUTME: AgentSummary is the public {id, name} view exposed to clients that drive the pipeline.

use serde::{Deserialize, Serialize};

use crate::prompt::{Instruction, PromptTemplate};

/// Immutable configuration for a single pipeline agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub id: String,
    pub display_name: String,
    pub prompt_template: PromptTemplate,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl AgentSpec {
    pub fn new(
        id: &str,
        display_name: &str,
        prompt_template: PromptTemplate,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            prompt_template,
            temperature,
            max_tokens,
        }
    }

    /// Compose this agent's instruction for the given input and context.
    pub fn compose(&self, user_input: &str, context: &str) -> Instruction {
        self.prompt_template.compose(user_input, context)
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id.clone(),
            name: self.display_name.clone(),
        }
    }
}

/// The `{id, name}` pair listed to clients, in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: String,
    pub name: String,
}
