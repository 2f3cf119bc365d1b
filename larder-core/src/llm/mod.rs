//! LLM provider abstraction used to re-rank search results.
//!
//! The ranking step only needs "send a prompt, get text back", so providers
//! are hidden behind [`LlmProvider`] and can be swapped for [`FakeProvider`]
//! in tests or when no API key is configured.

mod config;
mod fake;
mod groq;

pub use config::{ConfigError, LlmConfig, ProviderKind};
pub use fake::FakeProvider;
pub use groq::GroqProvider;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error type for LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for LLM providers.
///
/// Implementations should be stateless and thread-safe. The provider is responsible
/// for making API calls and returning the model's text response.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a single user-role prompt and get the model's text response.
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError>;

    /// Get the provider name (e.g., "groq", "fake").
    fn provider_name(&self) -> &'static str;

    /// Get the model name (e.g., "llama-3.1-8b-instant").
    fn model_name(&self) -> &str;
}

/// Build the provider described by `config`.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.provider {
        ProviderKind::Fake => Ok(Arc::new(FakeProvider::default())),
        ProviderKind::Groq => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| LlmError::NotConfigured("GROQ_API_KEY not set".to_string()))?;
            Ok(Arc::new(GroqProvider::new(
                api_key,
                config.model.clone(),
                config.base_url.clone(),
            )))
        }
    }
}
