pub mod feedback;
pub mod form;
pub mod images;
pub mod public;
pub mod recipes;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use larder_core::Recipe;
use serde::de::DeserializeOwned;
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// `(status, {"error": message})` as a response.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// [`Query`] that rejects with a 400 `{"error": ...}` body instead of axum's
/// plain-text one.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(error_response(
                StatusCode::BAD_REQUEST,
                rejection.body_text(),
            )),
        }
    }
}

/// A recipe as returned by every recipe endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub title: String,
    /// Public URL of the recipe image.
    pub image: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[schema(example = "Dinner")]
    pub category: String,
    #[schema(example = "Easy")]
    pub difficulty: String,
    pub description: String,
    pub estimated_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            image: recipe.image,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            category: recipe.category.to_string(),
            difficulty: recipe.difficulty.to_string(),
            description: recipe.description,
            estimated_time: recipe.estimated_time,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// `{"results": [...]}`, the envelope of the list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeListResponse {
    pub results: Vec<RecipeResponse>,
}

impl From<Vec<Recipe>> for RecipeListResponse {
    fn from(recipes: Vec<Recipe>) -> Self {
        Self {
            results: recipes.into_iter().map(RecipeResponse::from).collect(),
        }
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Larder API", description = "Recipe catalog with ingredient search"),
        components(schemas(ErrorResponse, RecipeResponse, RecipeListResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        feedback::ApiDoc::openapi(),
        images::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
