use crate::api::recipes::repository_failure;
use crate::api::RecipeResponse;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeaturedRecipesResponse {
    pub success: bool,
    pub results: Vec<RecipeResponse>,
}

#[utoipa::path(
    get,
    path = "/api/recipe/featured",
    tag = "recipes",
    responses(
        (status = 200, description = "Featured recipes in configured order", body = FeaturedRecipesResponse)
    )
)]
pub async fn featured_recipes(State(state): State<AppState>) -> impl IntoResponse {
    let ids = &state.config.featured_recipe_ids;
    let recipes = if ids.is_empty() {
        Vec::new()
    } else {
        match state.recipes.find_by_ids(ids).await {
            Ok(recipes) => recipes,
            Err(e) => return repository_failure(e, "Failed to fetch featured recipes"),
        }
    };

    // Configured order; ids that no longer exist are skipped.
    let results = ids
        .iter()
        .filter_map(|id| recipes.iter().find(|r| r.id == *id).cloned())
        .map(RecipeResponse::from)
        .collect();

    (
        StatusCode::OK,
        Json(FeaturedRecipesResponse {
            success: true,
            results,
        }),
    )
        .into_response()
}
