use crate::api::ErrorResponse;
use crate::auth::{bearer_or_cookie_token, delete_session, ACCESS_TOKEN_COOKIE};
use crate::cookies::clear_cookie;
use crate::get_conn;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session ended", body = LogoutResponse),
        (status = 500, description = "Database unavailable", body = ErrorResponse)
    )
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = bearer_or_cookie_token(&headers) {
        let mut conn = get_conn!(state.pool);
        if let Err(e) = delete_session(&mut conn, token) {
            tracing::warn!(error = %e, "Failed to delete session");
        }
    }

    let mut response = (
        StatusCode::OK,
        Json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
    )
        .into_response();

    let cookie = clear_cookie(ACCESS_TOKEN_COOKIE, state.config.cookie_secure);
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
