//! Server configuration, read once from the environment at startup.

use larder_core::llm::{ConfigError as RankingConfigError, LlmConfig};
use std::env;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

/// Shortest accepted `COOKIE_SECRET`, in bytes.
pub const MIN_COOKIE_SECRET_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingEnvVar(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error(transparent)]
    Ranking(#[from] RankingConfigError),
}

/// No `Debug`: holds the cookie secret.
#[derive(Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Prefix for the public URLs of stored images.
    pub public_base_url: String,
    pub cookie_secret: Vec<u8>,
    /// Mark cookies `Secure; SameSite=None` for cross-site frontends.
    pub cookie_secure: bool,
    pub allowed_origins: Vec<String>,
    pub featured_recipe_ids: Vec<Uuid>,
    pub ranking: LlmConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL"))?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let cookie_secret =
            env::var("COOKIE_SECRET").map_err(|_| ConfigError::MissingEnvVar("COOKIE_SECRET"))?;
        if cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "COOKIE_SECRET",
                value: format!("<{} bytes>", cookie_secret.len()),
            });
        }

        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let featured_recipe_ids = match env::var("FEATURED_RECIPE_IDS") {
            Ok(v) => parse_ids(&v).map_err(|value| ConfigError::Invalid {
                key: "FEATURED_RECIPE_IDS",
                value,
            })?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            database_url,
            bind_addr,
            public_base_url,
            cookie_secret: cookie_secret.into_bytes(),
            cookie_secure,
            allowed_origins,
            featured_recipe_ids,
            ranking: LlmConfig::from_env()?,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        use larder_core::llm::ProviderKind;
        use std::time::Duration;

        Self {
            database_url: "postgres://localhost:1/larder_test".to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            public_base_url: "http://larder.test".to_string(),
            cookie_secret: b"test-cookie-secret-test-cookie-secret".to_vec(),
            cookie_secure: false,
            allowed_origins: Vec::new(),
            featured_recipe_ids: Vec::new(),
            ranking: LlmConfig {
                provider: ProviderKind::Fake,
                api_key: None,
                model: "fake-model".to_string(),
                base_url: String::new(),
                timeout: Duration::from_millis(100),
            },
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a comma-separated UUID list. On failure returns the offending entry.
fn parse_ids(value: &str) -> Result<Vec<Uuid>, String> {
    split_list(value)
        .into_iter()
        .map(|s| Uuid::parse_str(&s).map_err(|_| s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_split_list_skips_blanks() {
        assert_eq!(
            split_list("https://a.example, ,https://b.example,"),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_parse_ids_reports_bad_entry() {
        let id = Uuid::new_v4();
        assert_eq!(parse_ids(&format!("{id}, ")).unwrap(), vec![id]);
        assert_eq!(
            parse_ids(&format!("{id},nope")).unwrap_err(),
            "nope".to_string()
        );
    }
}
