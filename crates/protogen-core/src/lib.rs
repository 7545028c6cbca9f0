// ABOUTME: Core domain types for protogen: agent specs, the agent registry, and invocation shapes.
// ABOUTME: Pure data and lookup logic with no I/O beyond optional prompt override loading.

pub mod agent;
pub mod invocation;
pub mod prompt;
pub mod registry;

pub use agent::{AgentSpec, AgentSummary};
pub use invocation::{InvocationRequest, InvocationResult};
pub use prompt::{Instruction, PromptTemplate};
pub use registry::{AgentRegistry, RegistryError};
