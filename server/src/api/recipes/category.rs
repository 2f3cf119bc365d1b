use crate::api::recipes::repository_failure;
use crate::api::{error_response, ApiQuery, ErrorResponse, RecipeListResponse};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use larder_core::Category;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct CategoryParams {
    /// Breakfast, Lunch, Dinner or Dessert. Absent or `All` lists everything.
    pub category: Option<String>,
}

/// `None` means every category.
fn parse_category_filter(raw: Option<&str>) -> Result<Option<Category>, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|e| format!("{e}")),
    }
}

#[utoipa::path(
    get,
    path = "/api/recipe/category",
    tag = "recipes",
    params(CategoryParams),
    responses(
        (status = 200, description = "Recipes in the category, newest first", body = RecipeListResponse),
        (status = 400, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn recipes_by_category(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CategoryParams>,
) -> impl IntoResponse {
    let category = match parse_category_filter(params.category.as_deref()) {
        Ok(c) => c,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match state.recipes.find_by_category(category).await {
        Ok(recipes) => (StatusCode::OK, Json(RecipeListResponse::from(recipes))).into_response(),
        Err(e) => repository_failure(e, "Failed to fetch recipes"),
    }
}
