//! Fake LLM provider for testing and offline runs.
//!
//! Returns deterministic responses based on prompt matching, so ranking can
//! be exercised without network access or API costs.

use super::{LlmError, LlmProvider};
use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// A fake LLM provider.
///
/// Responses are matched by checking if the prompt contains a registered substring.
/// If no match is found, returns the default response or an error.
#[derive(Debug)]
pub struct FakeProvider {
    /// (prompt substring, response) pairs, checked in insertion order
    responses: Vec<(String, String)>,
    /// Default response if no match found
    default_response: Option<String>,
    /// Simulated latency before answering
    delay: Option<Duration>,
    /// Every prompt and temperature seen so far
    calls: RwLock<Vec<(String, f32)>>,
}

impl Default for FakeProvider {
    /// An empty ranking: callers keep their local order.
    fn default() -> Self {
        Self {
            responses: Vec::new(),
            default_response: Some("[]".to_string()),
            delay: None,
            calls: RwLock::new(Vec::new()),
        }
    }
}

impl FakeProvider {
    /// Create a new FakeProvider with no registered responses.
    pub fn new() -> Self {
        Self {
            default_response: None,
            ..Self::default()
        }
    }

    /// Create a FakeProvider that returns a specific response for prompts containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let mut provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    /// Add a response for prompts containing a specific substring.
    pub fn add_response(&mut self, prompt_contains: &str, response: &str) {
        self.responses
            .push((prompt_contains.to_string(), response.to_string()));
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Sleep for `delay` before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts and temperatures received, oldest first.
    pub fn calls(&self) -> Vec<(String, f32)> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((prompt.to_string(), temperature));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        // Find first matching pattern (case-insensitive)
        let prompt_lower = prompt.to_lowercase();
        for (pattern, response) in &self.responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return Ok(response.clone());
            }
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: No response configured for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
