use crate::api::{error_response, ApiQuery, ErrorResponse, RecipeListResponse};
use crate::auth::MaybeAuthUser;
use crate::guest::{GuestCounter, GUEST_LIMIT_MESSAGE};
use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use larder_core::{normalize_query, SearchError};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Comma-separated ingredients, e.g. `egg, milk`
    pub ingredient: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/recipe/search",
    tag = "recipes",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching recipes, best first", body = RecipeListResponse),
        (status = 400, description = "Ingredient query missing", body = ErrorResponse),
        (status = 403, description = "Guest search limit reached", body = ErrorResponse),
        (status = 404, description = "No recipe uses any of the ingredients", body = ErrorResponse),
        (status = 500, description = "Search failed", body = ErrorResponse)
    ),
    security(
        (),
        ("bearer_auth" = [])
    )
)]
pub async fn search_recipes(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> impl IntoResponse {
    let tokens = match normalize_query(params.ingredient.as_deref()) {
        Ok(tokens) => tokens,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    // Guests spend one search of their quota before the catalog is touched,
    // so a search that finds nothing still counts.
    let mut guest_cookie = None;
    if user.is_none() {
        let config = &state.config;
        let now = Utc::now().timestamp();
        let mut counter = GuestCounter::from_headers(&headers, &config.cookie_secret, now);

        if counter.is_exhausted() {
            tracing::info!(count = counter.count, "Guest search limit reached");
            return error_response(StatusCode::FORBIDDEN, GUEST_LIMIT_MESSAGE);
        }

        counter.record_search();
        match counter.set_cookie(&config.cookie_secret, config.cookie_secure, now) {
            Ok(cookie) => guest_cookie = Some(cookie),
            Err(e) => {
                tracing::error!(error = %e, "Failed to sign guest cookie");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Search failed");
            }
        }
    }

    let response = match state.search.search_tokens(&tokens).await {
        Ok(results) => {
            tracing::info!(tokens = ?tokens, results = results.len(), "Recipe search");
            (StatusCode::OK, Json(RecipeListResponse::from(results))).into_response()
        }
        Err(e @ SearchError::Validation) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e @ SearchError::NotFound) => error_response(StatusCode::NOT_FOUND, e.to_string()),
        Err(SearchError::Repository(e)) => {
            tracing::error!(error = %e, "Recipe search failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Search failed")
        }
    };

    with_cookie(response, guest_cookie)
}

fn with_cookie(mut response: Response, cookie: Option<String>) -> Response {
    if let Some(value) = cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
