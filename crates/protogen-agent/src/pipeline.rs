// ABOUTME: Caller-side driver that runs all five stages in registry order for one idea.
// ABOUTME: Accumulates each stage's output into the context string and extracts the final HTML document.

use protogen_core::InvocationRequest;
use serde::Serialize;

use crate::invoker::AgentInvoker;

/// Output of one completed stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutput {
    pub agent_id: String,
    pub agent_name: String,
    pub response: String,
}

/// Result of a full pipeline run. `failed` names the stage that stopped the
/// run together with its error message; `stages` holds everything that
/// completed before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOutcome {
    pub stages: Vec<StageOutput>,
    pub failed: Option<(String, String)>,
}

impl PipelineOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }

    /// The final stage's output as a standalone HTML document, when the run
    /// completed.
    pub fn prototype_html(&self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }
        self.stages.last().map(|s| extract_html(&s.response))
    }
}

/// Drives the invoker through every registered agent, the same way the
/// browser client does: one call per stage, context passed forward.
pub struct Pipeline<'a> {
    invoker: &'a AgentInvoker,
}

impl<'a> Pipeline<'a> {
    pub fn new(invoker: &'a AgentInvoker) -> Self {
        Self { invoker }
    }

    /// Run every stage for `idea`. The first stage gets the idea as user
    /// input; later stages get an empty input and the accumulated context.
    /// Stops at the first failed stage.
    pub async fn run(&self, idea: &str) -> PipelineOutcome {
        let agent_ids: Vec<String> = self
            .invoker
            .registry()
            .iter()
            .map(|a| a.id.clone())
            .collect();

        let mut context = String::new();
        let mut stages = Vec::with_capacity(agent_ids.len());

        for (index, agent_id) in agent_ids.iter().enumerate() {
            let user_input = if index == 0 { idea } else { "" };
            let request = InvocationRequest::new(agent_id, user_input, &context);

            tracing::info!(stage = index + 1, agent = %agent_id, "running pipeline stage");

            match self.invoker.invoke(&request).await.into_outcome() {
                Ok((response, agent_name)) => {
                    append_section(&mut context, &agent_name, &response);
                    stages.push(StageOutput {
                        agent_id: agent_id.clone(),
                        agent_name,
                        response,
                    });
                }
                Err(message) => {
                    return PipelineOutcome {
                        stages,
                        failed: Some((agent_id.clone(), message)),
                    };
                }
            }
        }

        PipelineOutcome {
            stages,
            failed: None,
        }
    }
}

/// Append one stage's output to the running context.
pub fn append_section(context: &mut String, agent_name: &str, response: &str) {
    if !context.is_empty() {
        context.push_str("\n\n");
    }
    context.push_str("## ");
    context.push_str(agent_name);
    context.push('\n');
    context.push_str(response.trim());
}

/// Strip a surrounding Markdown code fence (```html ... ```) from model
/// output. Only a fence that opens a line counts; backtick runs inside the
/// document are left alone. Text without a fence, or whose fence holds
/// nothing, is returned trimmed.
pub fn extract_html(response: &str) -> String {
    let trimmed = response.trim();

    let Some(open) = fence_line_start(trimmed) else {
        return trimmed.to_string();
    };

    let after_open = &trimmed[open..];
    let body = match after_open.find('\n') {
        Some(newline) => &after_open[newline + 1..],
        None => "",
    };
    let body = match body.rfind("\n```") {
        Some(close) => &body[..close],
        None if body.starts_with("```") => "",
        None => body,
    };

    let body = body.trim();
    if body.is_empty() {
        trimmed.to_string()
    } else {
        body.to_string()
    }
}

/// Byte offset of the first line that starts with a code fence.
fn fence_line_start(text: &str) -> Option<usize> {
    if text.starts_with("```") {
        return Some(0);
    }
    text.find("\n```").map(|i| i + 1)
}
