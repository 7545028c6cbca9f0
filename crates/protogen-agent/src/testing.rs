// ABOUTME: Test utilities for protogen-agent, including a scriptable stub completion client.
// ABOUTME: Used in tests to simulate provider replies, failures, and hangs without real API calls.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::runtime::{CompletionClient, CompletionError, CompletionRequest};

/// What the stub does when called.
#[derive(Debug, Clone)]
enum StubBehavior {
    Reply(String),
    Echo,
    Fail(CompletionError),
    Hang(Duration),
}

/// A stub completion client that counts calls and records every request.
///
/// Useful in tests to assert how many provider calls an invocation made and
/// which sampling parameters it used.
#[derive(Debug)]
pub struct StubCompletionClient {
    behavior: StubBehavior,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletionClient {
    fn with_behavior(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a stub client that always returns the given text.
    pub fn new(response_text: &str) -> Self {
        Self::with_behavior(StubBehavior::Reply(response_text.to_owned()))
    }

    /// Create a stub client that replies with its own instruction:
    /// the system prompt, a blank line, then the user turn.
    pub fn echo() -> Self {
        Self::with_behavior(StubBehavior::Echo)
    }

    /// Create a stub client that always fails with the given error.
    pub fn failing(error: CompletionError) -> Self {
        Self::with_behavior(StubBehavior::Fail(error))
    }

    /// Create a stub client that sleeps before replying, to exercise timeouts.
    pub fn hanging(delay: Duration) -> Self {
        Self::with_behavior(StubBehavior::Hang(delay))
    }

    /// Number of completion calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for StubCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.behavior {
            StubBehavior::Reply(text) => Ok(text.clone()),
            StubBehavior::Echo => Ok(format!("{}\n\n{}", request.system, request.user)),
            StubBehavior::Fail(err) => Err(err.clone()),
            StubBehavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok("late reply".to_string())
            }
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "sys".to_string(),
            user: "usr".to_string(),
            temperature: 0.7,
            max_output_tokens: 1500,
        }
    }

    #[tokio::test]
    async fn stub_new_returns_configured_text() {
        let client = StubCompletionClient::new("Hello, world!");
        let text = client.complete(&request()).await.unwrap();

        assert_eq!(text, "Hello, world!");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn stub_echo_returns_instruction() {
        let client = StubCompletionClient::echo();
        let text = client.complete(&request()).await.unwrap();

        assert_eq!(text, "sys\n\nusr");
    }

    #[tokio::test]
    async fn stub_failing_returns_error_and_records_call() {
        let client = StubCompletionClient::failing(CompletionError::RateLimited);
        let result = client.complete(&request()).await;

        assert!(matches!(result, Err(CompletionError::RateLimited)));
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.requests()[0].max_output_tokens, 1500);
    }
}
