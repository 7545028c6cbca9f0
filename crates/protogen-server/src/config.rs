// ABOUTME: Configuration loading and validation for the protogen server.
// ABOUTME: Reads environment variables for the bind address, provider selection, timeout, and prompt overrides.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOST/PORT do not form a valid socket address: {0}")]
    InvalidBind(String),

    #[error("PROTOGEN_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),

    #[error("PROTOGEN_PROMPTS_DIR {} is not a directory", .0.display())]
    PromptsDirMissing(PathBuf),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ProtogenConfig {
    pub bind: SocketAddr,
    pub provider: String,
    pub model: Option<String>,
    pub timeout: Duration,
    pub prompts_dir: Option<PathBuf>,
}

impl ProtogenConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - HOST: interface to bind (default: 127.0.0.1)
    /// - PORT: port to bind (default: 8000)
    /// - PROTOGEN_PROVIDER: completion provider (default: openai)
    /// - PROTOGEN_MODEL: model name (optional, provider default otherwise)
    /// - PROTOGEN_TIMEOUT_SECS: per-call completion timeout (default: 120)
    /// - PROTOGEN_PROMPTS_DIR: directory of `<agent_id>.md` prompt overrides (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = var("PORT").unwrap_or_else(|| "8000".to_string());
        let bind_str = if host.contains(':') {
            format!("[{}]:{}", host, port)
        } else {
            format!("{}:{}", host, port)
        };
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let provider = var("PROTOGEN_PROVIDER")
            .map(|p| p.to_lowercase())
            .unwrap_or_else(|| "openai".to_string());

        let model = var("PROTOGEN_MODEL");

        let timeout = match var("PROTOGEN_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => protogen_agent::DEFAULT_TIMEOUT,
        };

        let prompts_dir = var("PROTOGEN_PROMPTS_DIR").map(PathBuf::from);
        if let Some(ref dir) = prompts_dir
            && !dir.is_dir()
        {
            return Err(ConfigError::PromptsDirMissing(dir.clone()));
        }

        Ok(Self {
            bind,
            provider,
            model,
            timeout,
            prompts_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ProtogenConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProtogenConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn config_loads_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.provider, "openai");
        assert!(config.model.is_none());
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert!(config.prompts_dir.is_none());
    }

    #[test]
    fn config_reads_host_and_port() {
        let config = load(&[("HOST", "0.0.0.0"), ("PORT", "9090")]).unwrap();
        assert_eq!(config.bind, "0.0.0.0:9090".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn config_accepts_ipv6_host() {
        let config = load(&[("HOST", "::1"), ("PORT", "8000")]).unwrap();
        assert_eq!(config.bind, "[::1]:8000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn config_rejects_bad_port() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind(_)));
    }

    #[test]
    fn config_rejects_zero_timeout() {
        let err = load(&[("PROTOGEN_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("PROTOGEN_TIMEOUT_SECS"));
    }

    #[test]
    fn config_normalizes_provider_and_model() {
        let config = load(&[
            ("PROTOGEN_PROVIDER", " Anthropic "),
            ("PROTOGEN_MODEL", "claude-opus-4-20250514"),
            ("PROTOGEN_TIMEOUT_SECS", "45"),
        ])
        .unwrap();

        assert_eq!(config.provider, "anthropic");
        assert_eq!(config.model.as_deref(), Some("claude-opus-4-20250514"));
        assert_eq!(config.timeout, Duration::from_secs(45));
    }

    #[test]
    fn config_ignores_empty_values() {
        let config = load(&[("PROTOGEN_MODEL", "  "), ("HOST", "")]).unwrap();
        assert!(config.model.is_none());
        assert_eq!(config.bind.port(), 8000);
    }

    #[test]
    fn config_checks_prompts_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().to_string_lossy().to_string();

        let config = load(&[("PROTOGEN_PROMPTS_DIR", path.as_str())]).unwrap();
        assert_eq!(config.prompts_dir.as_deref(), Some(dir.path()));

        let missing = dir.path().join("nope").to_string_lossy().to_string();
        let err = load(&[("PROTOGEN_PROMPTS_DIR", missing.as_str())]).unwrap_err();
        assert!(matches!(err, ConfigError::PromptsDirMissing(_)));
    }
}
