//! Ranking provider configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default Groq (OpenAI-compatible) base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model to use.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Default upper bound on a single ranking call.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown ranking provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Which backend answers ranking prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Groq,
    Fake,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groq" => Ok(ProviderKind::Groq),
            "fake" => Ok(ProviderKind::Fake),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// LLM ranking configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Only required by the Groq provider.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// How long a ranking call may take before it is abandoned.
    pub timeout: Duration,
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// - `RANKING_PROVIDER`: "groq" | "fake" (default: "fake")
    /// - `GROQ_API_KEY`: API key, required when the provider is "groq"
    /// - `RANKING_MODEL`: Model name (default: "llama-3.1-8b-instant")
    /// - `RANKING_BASE_URL`: API base URL (default: "https://api.groq.com/openai/v1")
    /// - `RANKING_TIMEOUT_MS`: Per-call timeout in ms (default: 5000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = env::var("RANKING_PROVIDER")
            .unwrap_or_else(|_| "fake".to_string())
            .parse()?;

        let api_key = env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());

        let model = env::var("RANKING_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("RANKING_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_ms = match env::var("RANKING_TIMEOUT_MS") {
            Ok(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "RANKING_TIMEOUT_MS".to_string(),
                value: v,
            })?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("groq".parse::<ProviderKind>().unwrap(), ProviderKind::Groq);
        assert_eq!("fake".parse::<ProviderKind>().unwrap(), ProviderKind::Fake);
        assert!(matches!(
            "openai".parse::<ProviderKind>(),
            Err(ConfigError::UnknownProvider(p)) if p == "openai"
        ));
    }
}
