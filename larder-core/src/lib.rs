pub mod error;
pub mod llm;
pub mod prompts;
pub mod ranking;
pub mod repository;
pub mod search;
pub mod types;

pub use error::RepositoryError;
pub use ranking::{extract_ranked_ids, LlmRanker, Ranker, RankingError};
pub use repository::{InMemoryRecipeRepository, RecipeRepository};
pub use search::{
    assemble, normalize_query, rank_locally, score_candidate, ScoredCandidate, SearchEngine,
    SearchError, TOP_K,
};
pub use types::{Category, Difficulty, ParseEnumError, Recipe};
