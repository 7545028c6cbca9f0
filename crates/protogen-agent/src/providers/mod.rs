// ABOUTME: Provider module aggregating all completion adapters.
// ABOUTME: Holds the HTTP status and transport error mapping shared by every adapter.

pub mod anthropic;
pub mod openai;

use std::time::Duration;

use reqwest::StatusCode;

use crate::runtime::CompletionError;

/// Longest slice of an error body kept in an error message.
const MAX_ERROR_BODY: usize = 500;

/// Map a non-success HTTP status to a CompletionError. `key_var` names the
/// credential variable so auth failures point at the right setting; `timeout`
/// is the configured per-call limit reported for upstream timeouts.
pub fn classify_status(
    status: StatusCode,
    body: &str,
    key_var: &str,
    timeout: Duration,
) -> CompletionError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CompletionError::Authentication(format!("{}: check {}", status, key_var))
        }
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CompletionError::Timeout(timeout)
        }
        _ => CompletionError::Api {
            status: status.as_u16(),
            message: truncate(body.trim(), MAX_ERROR_BODY),
        },
    }
}

/// Map a reqwest transport error, separating timeouts from other failures.
pub fn transport_error(err: reqwest::Error, timeout: Duration) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Timeout(timeout)
    } else {
        CompletionError::Network(err.to_string())
    }
}

/// Map a failure while reading or decoding a success response body. A body
/// that stalls past the deadline is a timeout, not a format error.
pub fn body_error(err: reqwest::Error, timeout: Duration) -> CompletionError {
    if err.is_timeout() || !err.is_decode() {
        transport_error(err, timeout)
    } else {
        CompletionError::UpstreamFormat(format!("failed to parse JSON: {}", err))
    }
}

/// Build a reqwest client with the per-call timeout applied.
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("failed to build HTTP client with timeout, using defaults: {}", e);
            reqwest::Client::new()
        })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
