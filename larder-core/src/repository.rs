//! Read access to the recipe catalog.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::types::{Category, Recipe};

/// Read-side contract of the recipe store.
///
/// The search engine only needs [`find_by_ingredient_substring`]; the other
/// lookups back the browse endpoints.
///
/// [`find_by_ingredient_substring`]: RecipeRepository::find_by_ingredient_substring
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Every recipe with at least one stored ingredient that contains at least
    /// one of `tokens` as a case-insensitive substring. Order is unspecified.
    async fn find_by_ingredient_substring(
        &self,
        tokens: &[String],
    ) -> Result<Vec<Recipe>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RepositoryError>;

    /// Newest first.
    async fn find_all(&self) -> Result<Vec<Recipe>, RepositoryError>;

    /// Newest first. `None` means every category.
    async fn find_by_category(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Recipe>, RepositoryError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Recipe>, RepositoryError>;
}

/// Repository over a fixed list of recipes, in insertion order.
///
/// Matching mirrors the Postgres implementation: case-insensitive substring,
/// token text taken literally. Every call is counted so tests can assert that
/// a request never reached the store.
#[derive(Debug, Default)]
pub struct InMemoryRecipeRepository {
    recipes: Vec<Recipe>,
    calls: AtomicUsize,
    fail: bool,
}

impl InMemoryRecipeRepository {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            ..Self::default()
        }
    }

    /// A repository whose every call fails, as if the database were down.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of lookups served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RepositoryError::Connection(
                "in-memory repository configured to fail".to_string(),
            ));
        }
        Ok(())
    }

    fn newest_first<'a>(&self, recipes: impl Iterator<Item = &'a Recipe>) -> Vec<Recipe> {
        let mut out: Vec<Recipe> = recipes.cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

#[async_trait]
impl RecipeRepository for InMemoryRecipeRepository {
    async fn find_by_ingredient_substring(
        &self,
        tokens: &[String],
    ) -> Result<Vec<Recipe>, RepositoryError> {
        self.begin()?;
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        Ok(self
            .recipes
            .iter()
            .filter(|r| {
                r.ingredients.iter().any(|i| {
                    let i = i.to_lowercase();
                    tokens.iter().any(|t| i.contains(t.as_str()))
                })
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RepositoryError> {
        self.begin()?;
        Ok(self.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Recipe>, RepositoryError> {
        self.begin()?;
        Ok(self.newest_first(self.recipes.iter()))
    }

    async fn find_by_category(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Recipe>, RepositoryError> {
        self.begin()?;
        Ok(self.newest_first(
            self.recipes
                .iter()
                .filter(|r| category.map_or(true, |c| r.category == c)),
        ))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Recipe>, RepositoryError> {
        self.begin()?;
        Ok(self
            .recipes
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }
}
