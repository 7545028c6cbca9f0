// ABOUTME: Prompt templates and instruction composition for pipeline agents.
// ABOUTME: Turns a template plus user input and accumulated context into a system/user message pair.

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the caller's user input inside a template.
pub const USER_INPUT_PLACEHOLDER: &str = "{{user_input}}";

/// Placeholder replaced by the accumulated pipeline context inside a template.
pub const CONTEXT_PLACEHOLDER: &str = "{{context}}";

/// User turn sent when a stage has no user input of its own.
pub const CONTINUE_PROMPT: &str = "Continue.";

/// Heading that introduces the accumulated context in the user turn.
const CONTEXT_HEADING: &str = "Contexto:";

/// The fully composed text sent to the completion provider for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub system: String,
    pub user: String,
}

/// An agent's prompt template. The template text becomes the system prompt;
/// user input and context are carried in the user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Create a template from raw text. Trailing whitespace is dropped so
    /// templates loaded from files match inline ones.
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self {
            text: text.trim_end().to_string(),
        }
    }

    /// The raw template text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Compose the instruction for one invocation.
    ///
    /// Placeholders in the template are substituted verbatim. The user turn
    /// carries the context block (when non-empty) followed by the user input,
    /// or `Continue.` when the stage has no input of its own.
    pub fn compose(&self, user_input: &str, context: &str) -> Instruction {
        let system = substitute(&self.text, user_input, context);

        let turn = if user_input.trim().is_empty() {
            CONTINUE_PROMPT
        } else {
            user_input
        };

        let user = if context.trim().is_empty() {
            turn.to_string()
        } else {
            format!("{}\n{}\n\n{}", CONTEXT_HEADING, context, turn)
        };

        Instruction { system, user }
    }
}

/// Replace both placeholders in a single left-to-right pass. Substituted
/// values are never scanned again, so placeholder text inside them survives.
fn substitute(template: &str, user_input: &str, context: &str) -> String {
    let mut out = String::with_capacity(template.len() + user_input.len() + context.len());
    let mut rest = template;

    loop {
        let next = [
            (rest.find(USER_INPUT_PLACEHOLDER), USER_INPUT_PLACEHOLDER, user_input),
            (rest.find(CONTEXT_PLACEHOLDER), CONTEXT_PLACEHOLDER, context),
        ]
        .into_iter()
        .filter_map(|(pos, placeholder, value)| pos.map(|p| (p, placeholder, value)))
        .min_by_key(|(pos, _, _)| *pos);

        let Some((pos, placeholder, value)) = next else {
            out.push_str(rest);
            return out;
        };

        out.push_str(&rest[..pos]);
        out.push_str(value);
        rest = &rest[pos + placeholder.len()..];
    }
}
