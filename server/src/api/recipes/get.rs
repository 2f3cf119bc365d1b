use crate::api::recipes::repository_failure;
use crate::api::{error_response, ErrorResponse, RecipeResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeDetailResponse {
    pub results: RecipeResponse,
}

#[utoipa::path(
    get,
    path = "/api/recipe/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeDetailResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.recipes.find_by_id(id).await {
        Ok(Some(recipe)) => (
            StatusCode::OK,
            Json(RecipeDetailResponse {
                results: recipe.into(),
            }),
        )
            .into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => repository_failure(e, "Failed to fetch recipe"),
    }
}
