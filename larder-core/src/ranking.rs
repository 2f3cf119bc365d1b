//! Remote re-ranking of locally scored search candidates.
//!
//! Ranking is best-effort: every failure surfaces as a [`RankingError`] and
//! the search engine falls back to the local order.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::llm::{LlmError, LlmProvider};
use crate::prompts::render_rank_prompt;
use crate::types::Recipe;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("Ranking call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("Ranking call timed out after {0:?}")]
    Timeout(Duration),

    #[error("No JSON array in ranking response")]
    MissingArray,

    #[error("Invalid JSON array in ranking response: {0}")]
    InvalidJson(String),
}

/// Orders candidates best to worst.
#[async_trait]
pub trait Ranker: Send + Sync {
    /// Identifiers in ranked order. May name only some of the candidates, and
    /// may name things that are not candidates at all; the caller sorts that out.
    async fn rank(&self, tokens: &[String], candidates: &[Recipe])
        -> Result<Vec<String>, RankingError>;
}

/// Ranker that asks an LLM for the order.
#[derive(Debug, Clone)]
pub struct LlmRanker {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl LlmRanker {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }
}

#[async_trait]
impl Ranker for LlmRanker {
    async fn rank(
        &self,
        tokens: &[String],
        candidates: &[Recipe],
    ) -> Result<Vec<String>, RankingError> {
        let prompt = render_rank_prompt(tokens, candidates);

        tracing::debug!(
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
            candidates = candidates.len(),
            "Requesting ranking"
        );

        let text = tokio::time::timeout(self.timeout, self.provider.complete(&prompt, 0.0))
            .await
            .map_err(|_| RankingError::Timeout(self.timeout))??;

        extract_ranked_ids(&text)
    }
}

/// Pull the id list out of free-form model output.
///
/// Takes the greedy span from the first `[` to the last `]`, which must parse
/// as a JSON array. Non-string elements are skipped.
pub fn extract_ranked_ids(text: &str) -> Result<Vec<String>, RankingError> {
    let start = text.find('[').ok_or(RankingError::MissingArray)?;
    let end = text.rfind(']').ok_or(RankingError::MissingArray)?;
    if end < start {
        return Err(RankingError::MissingArray);
    }

    let values: Vec<serde_json::Value> = serde_json::from_str(&text[start..=end])
        .map_err(|e| RankingError::InvalidJson(e.to_string()))?;

    Ok(values
        .into_iter()
        .filter_map(|v| match v {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeProvider;

    #[test]
    fn test_extract_bare_array() {
        let ids = extract_ranked_ids(r#"["a", "b"]"#).unwrap();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_extract_array_surrounded_by_prose() {
        let text = "Sure! Here is the ranking:\n[\"b\",\n \"a\"]\nHope that helps.";
        assert_eq!(extract_ranked_ids(text).unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn test_extract_skips_non_strings() {
        let ids = extract_ranked_ids(r#"["a", 7, null, "b"]"#).unwrap();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_extract_missing_array() {
        assert!(matches!(
            extract_ranked_ids("I cannot rank these."),
            Err(RankingError::MissingArray)
        ));
        assert!(matches!(
            extract_ranked_ids("] backwards ["),
            Err(RankingError::MissingArray)
        ));
    }

    #[test]
    fn test_extract_greedy_span_must_be_valid_json() {
        // First '[' to last ']' spans two arrays, which is not valid JSON.
        let result = extract_ranked_ids(r#"["a"] and also ["b"]"#);
        assert!(matches!(result, Err(RankingError::InvalidJson(_))));
    }

    #[tokio::test]
    async fn test_llm_ranker_uses_zero_temperature() {
        let provider = Arc::new(FakeProvider::new().with_default_response(r#"["x"]"#));
        let ranker = LlmRanker::new(provider.clone(), Duration::from_secs(1));

        let ids = ranker.rank(&["egg".to_string()], &[]).await.unwrap();

        assert_eq!(ids, vec!["x"]);
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, 0.0);
        assert!(calls[0].0.contains("\"egg\""));
    }

    #[tokio::test]
    async fn test_llm_ranker_propagates_provider_error() {
        let ranker = LlmRanker::new(Arc::new(FakeProvider::new()), Duration::from_secs(1));
        let result = ranker.rank(&["egg".to_string()], &[]).await;
        assert!(matches!(result, Err(RankingError::Provider(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_llm_ranker_times_out() {
        let provider = FakeProvider::new()
            .with_default_response(r#"["x"]"#)
            .with_delay(Duration::from_secs(30));
        let ranker = LlmRanker::new(Arc::new(provider), Duration::from_secs(2));

        let result = ranker.rank(&["egg".to_string()], &[]).await;
        assert!(matches!(result, Err(RankingError::Timeout(d)) if d == Duration::from_secs(2)));
    }
}
