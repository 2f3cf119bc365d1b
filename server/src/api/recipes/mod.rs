pub mod add;
pub mod all;
pub mod category;
pub mod featured;
pub mod get;
pub mod search;
pub mod update;

use crate::api::error_response;
use crate::AppState;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use larder_core::RepositoryError;
use utoipa::OpenApi;

/// Returns the router for /api/recipe endpoints (mounted at /api/recipe)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add::add_recipe))
        .route("/search", get(search::search_recipes))
        .route("/category", get(category::recipes_by_category))
        .route("/all", get(all::all_recipes))
        .route("/featured", get(featured::featured_recipes))
        .route("/{id}", get(get::get_recipe).put(update::update_recipe))
}

/// Log a catalog failure and answer with a generic 500.
pub(crate) fn repository_failure(e: RepositoryError, message: &'static str) -> Response {
    tracing::error!(error = %e, "{}", message);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        add::add_recipe,
        search::search_recipes,
        category::recipes_by_category,
        all::all_recipes,
        featured::featured_recipes,
        get::get_recipe,
        update::update_recipe,
    ),
    components(schemas(
        add::AddRecipeRequest,
        add::AddRecipeResponse,
        featured::FeaturedRecipesResponse,
        get::RecipeDetailResponse,
        update::UpdateRecipeRequest,
        update::UpdateRecipeResponse,
    ))
)]
pub struct ApiDoc;
