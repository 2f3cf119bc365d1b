use crate::api::recipes::repository_failure;
use crate::api::RecipeListResponse;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/api/recipe/all",
    tag = "recipes",
    responses(
        (status = 200, description = "Every recipe, newest first", body = RecipeListResponse)
    )
)]
pub async fn all_recipes(State(state): State<AppState>) -> impl IntoResponse {
    match state.recipes.find_all().await {
        Ok(recipes) => (StatusCode::OK, Json(RecipeListResponse::from(recipes))).into_response(),
        Err(e) => repository_failure(e, "Failed to fetch recipes"),
    }
}
