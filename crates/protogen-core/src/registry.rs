// ABOUTME: The agent registry: an ordered, read-only catalog of the five pipeline agents.
// ABOUTME: Built-in prompts ship as text assets and may be overridden from a directory at startup.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::agent::{AgentSpec, AgentSummary};
use crate::prompt::PromptTemplate;

/// Errors produced by registry construction and lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown agent: '{0}'")]
    UnknownAgent(String),

    #[error("failed to read prompt override {}: {source}", .path.display())]
    PromptOverride {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt override {} is empty", .0.display())]
    EmptyPromptOverride(PathBuf),
}

/// Built-in agent table: (id, display name, prompt asset, temperature, max tokens).
/// Order here is the pipeline order.
const BUILTIN_AGENTS: [(&str, &str, &str, f32, u32); 5] = [
    (
        "discovery",
        "Discovery (Descoberta & Serendipidade)",
        include_str!("../prompts/discovery.md"),
        0.9,
        1500,
    ),
    (
        "structure",
        "Structure (Arquitetura & Estrutura)",
        include_str!("../prompts/structure.md"),
        0.7,
        1500,
    ),
    (
        "design",
        "Design (Design & Experiência)",
        include_str!("../prompts/design.md"),
        0.7,
        1500,
    ),
    (
        "implementation",
        "Implementation (Implementação)",
        include_str!("../prompts/implementation.md"),
        0.7,
        4000,
    ),
    (
        "refinement",
        "Refinement (Refinamento)",
        include_str!("../prompts/refinement.md"),
        0.7,
        4000,
    ),
];

/// Ordered catalog of agent specs. Populated once and never mutated.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentSpec>,
}

impl AgentRegistry {
    /// The five built-in pipeline agents with their shipped prompts.
    pub fn builtin() -> Self {
        let agents = BUILTIN_AGENTS
            .iter()
            .map(|(id, name, prompt, temperature, max_tokens)| {
                AgentSpec::new(id, name, PromptTemplate::new(*prompt), *temperature, *max_tokens)
            })
            .collect();
        Self { agents }
    }

    /// Built-in agents with prompt templates replaced by `<id>.md` files found
    /// in `dir`. Agents without a file keep their built-in prompt.
    pub fn with_prompt_overrides(dir: &Path) -> Result<Self, RegistryError> {
        let mut registry = Self::builtin();

        for agent in &mut registry.agents {
            let path = dir.join(format!("{}.md", agent.id));
            if !path.is_file() {
                continue;
            }

            let text = std::fs::read_to_string(&path).map_err(|source| {
                RegistryError::PromptOverride {
                    path: path.clone(),
                    source,
                }
            })?;

            if text.trim().is_empty() {
                return Err(RegistryError::EmptyPromptOverride(path));
            }

            tracing::info!(agent = %agent.id, path = %path.display(), "prompt template overridden");
            agent.prompt_template = PromptTemplate::new(text);
        }

        Ok(registry)
    }

    /// All agents as `{id, name}` pairs, in pipeline order.
    pub fn list_agents(&self) -> Vec<AgentSummary> {
        self.agents.iter().map(AgentSpec::summary).collect()
    }

    /// Resolve an agent id to its spec.
    pub fn get(&self, agent_id: &str) -> Result<&AgentSpec, RegistryError> {
        self.agents
            .iter()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| RegistryError::UnknownAgent(agent_id.to_string()))
    }

    /// Iterate specs in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSpec> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
