//! Postgres-backed [`RecipeRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use larder_core::{Category, Recipe, RecipeRepository, RepositoryError};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::DbPool;
use crate::ingredient_matches_any;
use crate::models::RecipeRow;
use crate::raw_sql::contains_pattern;
use crate::schema::recipes;

pub struct PgRecipeRepository {
    pool: Arc<DbPool>,
}

impl PgRecipeRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, RepositoryError> {
        self.pool
            .get()
            .map_err(|e| RepositoryError::Connection(e.to_string()))
    }
}

fn into_recipes(rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, RepositoryError> {
    rows.into_iter().map(RecipeRow::into_recipe).collect()
}

fn query_error(e: diesel::result::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    async fn find_by_ingredient_substring(
        &self,
        tokens: &[String],
    ) -> Result<Vec<Recipe>, RepositoryError> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        let patterns: Vec<String> = tokens.iter().map(|t| contains_pattern(t)).collect();
        let mut conn = self.conn()?;

        // Oldest first, so ties in the local score keep catalog order.
        let rows: Vec<RecipeRow> = recipes::table
            .filter(ingredient_matches_any!(patterns))
            .order((recipes::created_at.asc(), recipes::id.asc()))
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .map_err(query_error)?;

        into_recipes(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, RepositoryError> {
        let mut conn = self.conn()?;
        let row: Option<RecipeRow> = recipes::table
            .find(id)
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(query_error)?;

        row.map(RecipeRow::into_recipe).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Recipe>, RepositoryError> {
        self.find_by_category(None).await
    }

    async fn find_by_category(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Recipe>, RepositoryError> {
        let mut conn = self.conn()?;
        let mut query = recipes::table.select(RecipeRow::as_select()).into_boxed();
        if let Some(category) = category {
            query = query.filter(recipes::category.eq(category.as_str()));
        }

        let rows: Vec<RecipeRow> = query
            .order(recipes::created_at.desc())
            .load(&mut conn)
            .map_err(query_error)?;

        into_recipes(rows)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Recipe>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn()?;
        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::id.eq_any(ids.to_vec()))
            .order(recipes::created_at.desc())
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .map_err(query_error)?;

        into_recipes(rows)
    }
}
