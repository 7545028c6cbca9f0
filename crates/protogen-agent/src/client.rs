// ABOUTME: Factory for creating completion clients from a provider name and the process environment.
// ABOUTME: Validates credentials up front so a misconfigured process fails at startup, not on first use.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::providers::{anthropic, openai};
use crate::runtime::CompletionClient;

/// Startup failures. Unlike per-call errors these are fatal: without a
/// working client no agent can be served.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("{0} environment variable not set; configure it (e.g. in .env) before starting")]
    MissingCredential(&'static str),

    #[error("{var} has an invalid format: {reason}")]
    InvalidCredential { var: &'static str, reason: String },

    #[error("unsupported completion provider: {0}")]
    UnsupportedProvider(String),
}

/// Everything needed to build a client, already resolved from the environment.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Read an env var and return `Some(value)` only if it is non-empty after trimming.
fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

/// Create a completion client for the given provider from environment variables.
///
/// The model is resolved from:
/// 1. The explicit `model` parameter (if Some)
/// 2. A provider-specific environment variable (e.g. OPENAI_MODEL)
/// 3. The provider default
pub fn create_completion_client(
    provider: &str,
    model: Option<&str>,
    timeout: Duration,
) -> Result<Arc<dyn CompletionClient>, InitError> {
    let key_var = credential_var(provider)?;
    let (model_var, base_url_var) = match provider {
        "anthropic" => ("ANTHROPIC_MODEL", "ANTHROPIC_BASE_URL"),
        _ => ("OPENAI_MODEL", "OPENAI_BASE_URL"),
    };

    let settings = ProviderSettings {
        api_key: non_empty_env(key_var),
        model: model.map(String::from).or_else(|| non_empty_env(model_var)),
        base_url: non_empty_env(base_url_var),
    };

    build_completion_client(provider, settings, timeout)
}

/// The environment variable holding the credential for `provider`.
pub fn credential_var(provider: &str) -> Result<&'static str, InitError> {
    match provider {
        "openai" => Ok(openai::API_KEY_VAR),
        "anthropic" => Ok(anthropic::API_KEY_VAR),
        unknown => Err(InitError::UnsupportedProvider(unknown.to_string())),
    }
}

/// Create a completion client from already-resolved settings. Logs the
/// credential in masked form only.
pub fn build_completion_client(
    provider: &str,
    settings: ProviderSettings,
    timeout: Duration,
) -> Result<Arc<dyn CompletionClient>, InitError> {
    match provider {
        "openai" => {
            let api_key = validate_openai_key(settings.api_key)?;
            tracing::info!("{}: {}", openai::API_KEY_VAR, mask_credential(&api_key));
            let client = openai::OpenAIClient::new(
                api_key,
                settings
                    .base_url
                    .unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string()),
                settings
                    .model
                    .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string()),
                timeout,
            );
            Ok(Arc::new(client))
        }
        "anthropic" => {
            let api_key = require_key(anthropic::API_KEY_VAR, settings.api_key)?;
            tracing::info!("{}: {}", anthropic::API_KEY_VAR, mask_credential(&api_key));
            let client = anthropic::AnthropicClient::new(
                api_key,
                settings
                    .base_url
                    .unwrap_or_else(|| anthropic::DEFAULT_BASE_URL.to_string()),
                settings
                    .model
                    .unwrap_or_else(|| anthropic::DEFAULT_MODEL.to_string()),
                timeout,
            );
            Ok(Arc::new(client))
        }
        unknown => Err(InitError::UnsupportedProvider(unknown.to_string())),
    }
}

fn require_key(var: &'static str, key: Option<String>) -> Result<String, InitError> {
    let key = key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(InitError::MissingCredential(var))?;

    if key.chars().any(char::is_whitespace) {
        return Err(InitError::InvalidCredential {
            var,
            reason: "contains whitespace".to_string(),
        });
    }

    Ok(key)
}

fn validate_openai_key(key: Option<String>) -> Result<String, InitError> {
    let key = require_key(openai::API_KEY_VAR, key)?;
    if !key.starts_with("sk-") {
        return Err(InitError::InvalidCredential {
            var: openai::API_KEY_VAR,
            reason: "expected a key starting with 'sk-'".to_string(),
        });
    }
    Ok(key)
}

/// Render a credential for logs: the first 7 and last 4 characters only.
/// Short keys are fully masked.
pub fn mask_credential(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 16 {
        return "*".repeat(chars.len().max(3));
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serialize all tests that read/write env vars to prevent race conditions.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const SECS: Duration = Duration::from_secs(30);

    /// Helper to extract the error from a client factory result.
    /// Uses match instead of unwrap_err() because Arc<dyn CompletionClient> doesn't impl Debug.
    fn expect_err(result: Result<Arc<dyn CompletionClient>, InitError>) -> InitError {
        match result {
            Err(e) => e,
            Ok(client) => panic!("expected error, got client for {}", client.provider_name()),
        }
    }

    fn settings(key: &str) -> ProviderSettings {
        ProviderSettings {
            api_key: Some(key.to_string()),
            ..ProviderSettings::default()
        }
    }

    #[test]
    fn unknown_provider_returns_error() {
        let err = expect_err(build_completion_client("cohere", settings("sk-x"), SECS));
        assert!(matches!(err, InitError::UnsupportedProvider(ref p) if p == "cohere"));
    }

    #[test]
    fn openai_missing_key_is_reported() {
        let err = expect_err(build_completion_client(
            "openai",
            ProviderSettings::default(),
            SECS,
        ));
        assert!(matches!(err, InitError::MissingCredential("OPENAI_API_KEY")));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn openai_blank_key_counts_as_missing() {
        let err = expect_err(build_completion_client("openai", settings("   "), SECS));
        assert!(matches!(err, InitError::MissingCredential(_)));
    }

    #[test]
    fn openai_key_must_have_sk_prefix() {
        let err = expect_err(build_completion_client("openai", settings("pk-live-123"), SECS));
        assert!(matches!(err, InitError::InvalidCredential { .. }));
        assert!(err.to_string().contains("sk-"));
    }

    #[test]
    fn key_with_inner_whitespace_is_invalid() {
        let err = expect_err(build_completion_client("anthropic", settings("sk-ant 123"), SECS));
        assert!(matches!(err, InitError::InvalidCredential { .. }));
    }

    #[test]
    fn openai_defaults_model() {
        let client = build_completion_client("openai", settings("sk-proj-abc"), SECS).unwrap();
        assert_eq!(client.provider_name(), "openai");
        assert_eq!(client.model_name(), "gpt-4o-mini");
    }

    #[test]
    fn explicit_model_overrides_default() {
        let client = build_completion_client(
            "anthropic",
            ProviderSettings {
                api_key: Some("sk-ant-abc".to_string()),
                model: Some("claude-opus-4-20250514".to_string()),
                base_url: None,
            },
            SECS,
        )
        .unwrap();
        assert_eq!(client.model_name(), "claude-opus-4-20250514");
    }

    #[test]
    fn create_reads_key_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe {
            env::set_var("OPENAI_API_KEY", "sk-proj-from-env");
            env::set_var("OPENAI_MODEL", "gpt-4.1-mini");
        }

        let result = create_completion_client("openai", None, SECS);

        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe {
            env::remove_var("OPENAI_API_KEY");
            env::remove_var("OPENAI_MODEL");
        }

        let client = match result {
            Ok(c) => c,
            Err(e) => panic!("expected Ok, got Err: {}", e),
        };
        assert_eq!(client.model_name(), "gpt-4.1-mini");
    }

    #[test]
    fn create_without_env_key_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe { env::remove_var("ANTHROPIC_API_KEY") };

        let err = expect_err(create_completion_client("anthropic", None, SECS));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn credential_var_names_each_provider_key() {
        assert_eq!(credential_var("openai").unwrap(), "OPENAI_API_KEY");
        assert_eq!(credential_var("anthropic").unwrap(), "ANTHROPIC_API_KEY");
        assert!(matches!(
            credential_var("cohere"),
            Err(InitError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn mask_credential_hides_middle() {
        let masked = mask_credential("sk-proj-abcdefghijklmnop1234");
        assert_eq!(masked, "sk-proj...1234");
        assert!(!masked.contains("abcdef"));
    }

    #[test]
    fn mask_credential_hides_short_keys_entirely() {
        assert_eq!(mask_credential("sk-short"), "********");
        assert_eq!(mask_credential(""), "***");
    }
}
