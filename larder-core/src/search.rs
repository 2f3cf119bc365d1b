//! Ingredient match & rank engine.
//!
//! A search runs strictly in sequence: normalize the query, fetch candidates
//! that share at least one ingredient substring, score them locally, keep the
//! best [`TOP_K`], then let the [`Ranker`] reorder them. The ranker can only
//! reorder; it never adds or removes a candidate.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::ranking::Ranker;
use crate::repository::RecipeRepository;
use crate::types::Recipe;

/// Maximum number of candidates that survive local scoring.
pub const TOP_K: usize = 15;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Ingredient query missing")]
    Validation,

    #[error("No recipes found with those ingredients")]
    NotFound,

    #[error("Recipe lookup failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// A candidate with its local score. Lives for one search only.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub recipe: Recipe,
    /// Query tokens found in at least one of the recipe's ingredients.
    pub match_count: usize,
    /// Ingredient count minus `match_count`. Can go negative when several
    /// tokens hit the same ingredient.
    pub missing_count: i64,
    pub score: f64,
}

/// Split a comma-separated ingredient query into lower-cased, trimmed,
/// non-empty tokens. Order and duplicates are preserved.
pub fn normalize_query(raw: Option<&str>) -> Result<Vec<String>, SearchError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(SearchError::Validation);
    };

    let tokens: Vec<String> = raw
        .split(',')
        .map(|piece| piece.trim().to_lowercase())
        .filter(|piece| !piece.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err(SearchError::Validation);
    }

    Ok(tokens)
}

/// Score one recipe against the query tokens.
pub fn score_candidate(tokens: &[String], recipe: Recipe) -> ScoredCandidate {
    let ingredients: Vec<String> = recipe
        .ingredients
        .iter()
        .map(|i| i.to_lowercase())
        .collect();

    let match_count = tokens
        .iter()
        .filter(|token| ingredients.iter().any(|i| i.contains(token.as_str())))
        .count();

    let missing_count = ingredients.len() as i64 - match_count as i64;
    let score = match_count as f64 - 0.5 * missing_count as f64;

    ScoredCandidate {
        recipe,
        match_count,
        missing_count,
        score,
    }
}

/// Score every candidate, sort best first and keep the top [`TOP_K`].
///
/// The sort is stable, so equal scores keep retrieval order.
pub fn rank_locally(tokens: &[String], candidates: Vec<Recipe>) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|recipe| score_candidate(tokens, recipe))
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(TOP_K);
    scored
}

/// Put the ranker's picks first, in its order, then everything it left out in
/// local order.
///
/// Identifiers that are not candidates (or not UUIDs) are ignored, and an
/// identifier named twice is only used once.
pub fn assemble(ranked_ids: &[String], top: Vec<Recipe>) -> Vec<Recipe> {
    let mut remaining: Vec<Option<Recipe>> = top.into_iter().map(Some).collect();
    let mut results = Vec::with_capacity(remaining.len());

    for raw_id in ranked_ids {
        let Ok(id) = Uuid::parse_str(raw_id.trim()) else {
            continue;
        };
        let slot = remaining
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|r| r.id == id));
        if let Some(recipe) = slot.and_then(Option::take) {
            results.push(recipe);
        }
    }

    results.extend(remaining.into_iter().flatten());
    results
}

/// The search pipeline with its collaborators injected.
#[derive(Clone)]
pub struct SearchEngine {
    recipes: Arc<dyn RecipeRepository>,
    ranker: Arc<dyn Ranker>,
}

impl SearchEngine {
    pub fn new(recipes: Arc<dyn RecipeRepository>, ranker: Arc<dyn Ranker>) -> Self {
        Self { recipes, ranker }
    }

    /// Run a full search for a raw `ingredient` query.
    pub async fn search(&self, raw_query: Option<&str>) -> Result<Vec<Recipe>, SearchError> {
        let tokens = normalize_query(raw_query)?;
        self.search_tokens(&tokens).await
    }

    /// Run a search for tokens that already went through [`normalize_query`].
    pub async fn search_tokens(&self, tokens: &[String]) -> Result<Vec<Recipe>, SearchError> {
        if tokens.is_empty() {
            return Err(SearchError::Validation);
        }

        let candidates = self.recipes.find_by_ingredient_substring(tokens).await?;
        if candidates.is_empty() {
            return Err(SearchError::NotFound);
        }

        let scored = rank_locally(tokens, candidates);
        tracing::debug!(
            tokens = ?tokens,
            kept = scored.len(),
            best_score = scored.first().map(|c| c.score),
            "Scored search candidates"
        );

        let top: Vec<Recipe> = scored.into_iter().map(|c| c.recipe).collect();

        match self.ranker.rank(tokens, &top).await {
            Ok(ranked_ids) => Ok(assemble(&ranked_ids, top)),
            Err(e) => {
                tracing::warn!(error = %e, "Ranking failed, using local ranking only");
                Ok(top)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Difficulty};
    use chrono::Utc;

    fn recipe(title: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            title: title.to_string(),
            image: String::new(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            steps: vec![],
            category: Category::Dinner,
            difficulty: Difficulty::Easy,
            description: String::new(),
            estimated_time: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tokens(raw: &str) -> Vec<String> {
        normalize_query(Some(raw)).unwrap()
    }

    #[test]
    fn test_normalize_trims_lowercases_and_drops_empty() {
        assert_eq!(tokens(" Tomato ,, Basil"), vec!["tomato", "basil"]);
    }

    #[test]
    fn test_normalize_keeps_duplicates_in_order() {
        assert_eq!(tokens("egg, Milk, EGG"), vec!["egg", "milk", "egg"]);
    }

    #[test]
    fn test_normalize_rejects_missing_and_blank() {
        assert!(matches!(normalize_query(None), Err(SearchError::Validation)));
        assert!(matches!(
            normalize_query(Some("")),
            Err(SearchError::Validation)
        ));
        assert!(matches!(
            normalize_query(Some("   ")),
            Err(SearchError::Validation)
        ));
        assert!(matches!(
            normalize_query(Some(" , ,, ")),
            Err(SearchError::Validation)
        ));
    }

    #[test]
    fn test_score_counts_substring_matches() {
        let r = recipe("Pancakes", &["Egg", "whole milk", "flour"]);
        let c = score_candidate(&tokens("egg,milk"), r);
        assert_eq!(c.match_count, 2);
        assert_eq!(c.missing_count, 1);
        assert_eq!(c.score, 1.5);
    }

    #[test]
    fn test_score_missing_count_is_ingredient_count_minus_matches() {
        let r = recipe("Sweet eggs", &["egg", "sugar"]);
        let c = score_candidate(&tokens("egg,milk"), r);
        assert_eq!(c.match_count, 1);
        assert_eq!(c.missing_count, 1);
        assert_eq!(c.score, 0.5);
    }

    #[test]
    fn test_score_is_not_negative_guarded() {
        let r = recipe("Big stew", &["beef", "carrot", "onion", "celery", "stock"]);
        let c = score_candidate(&tokens("beef"), r);
        assert_eq!(c.missing_count, 4);
        assert_eq!(c.score, -1.0);
    }

    #[test]
    fn test_missing_count_can_go_negative() {
        // Both tokens land on the single ingredient.
        let r = recipe("Eggs", &["eggs"]);
        let c = score_candidate(&tokens("egg,eggs"), r);
        assert_eq!(c.match_count, 2);
        assert_eq!(c.missing_count, -1);
        assert_eq!(c.score, 2.5);
    }

    #[test]
    fn test_rank_locally_is_stable_for_ties() {
        let a = recipe("A", &["egg", "salt"]);
        let b = recipe("B", &["egg", "pepper"]);
        let c = recipe("C", &["egg", "milk"]);
        let ranked = rank_locally(&tokens("egg,milk"), vec![a.clone(), b.clone(), c.clone()]);

        let titles: Vec<&str> = ranked.iter().map(|c| c.recipe.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_rank_locally_truncates_to_top_k() {
        let candidates: Vec<Recipe> = (0..40)
            .map(|i| recipe(&format!("R{i}"), &["egg"]))
            .collect();
        let ranked = rank_locally(&tokens("egg"), candidates);
        assert_eq!(ranked.len(), TOP_K);
        assert_eq!(ranked[0].recipe.title, "R0");
        assert_eq!(ranked[TOP_K - 1].recipe.title, "R14");
    }

    #[test]
    fn test_assemble_ranked_first_then_omitted() {
        let r1 = recipe("R1", &[]);
        let r2 = recipe("R2", &[]);
        let r3 = recipe("R3", &[]);
        let out = assemble(
            &[r3.id.to_string(), r1.id.to_string()],
            vec![r1.clone(), r2.clone(), r3.clone()],
        );
        assert_eq!(out, vec![r3, r1, r2]);
    }

    #[test]
    fn test_assemble_drops_foreign_and_duplicate_ids() {
        let r1 = recipe("R1", &[]);
        let r2 = recipe("R2", &[]);
        let out = assemble(
            &[
                Uuid::new_v4().to_string(),
                "not-a-uuid".to_string(),
                r2.id.to_string(),
                r2.id.to_string(),
            ],
            vec![r1.clone(), r2.clone()],
        );
        assert_eq!(out, vec![r2, r1]);
    }

    #[test]
    fn test_assemble_accepts_uppercase_ids() {
        let r1 = recipe("R1", &[]);
        let r2 = recipe("R2", &[]);
        let out = assemble(
            &[r2.id.to_string().to_uppercase()],
            vec![r1.clone(), r2.clone()],
        );
        assert_eq!(out, vec![r2, r1]);
    }

    #[test]
    fn test_assemble_with_empty_ranking_is_local_order() {
        let r1 = recipe("R1", &[]);
        let r2 = recipe("R2", &[]);
        assert_eq!(
            assemble(&[], vec![r1.clone(), r2.clone()]),
            vec![r1, r2]
        );
    }
}
