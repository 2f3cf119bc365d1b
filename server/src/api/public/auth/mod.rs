pub mod check_session;
pub mod logout;
pub mod signin;
pub mod signup;

use crate::auth::{ACCESS_TOKEN_COOKIE, SESSION_DAYS};
use crate::cookies::build_cookie;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub token: String,
}

/// Answer with `{user_id, token}` and hand browsers the same token as a cookie.
fn session_response(status: StatusCode, user_id: Uuid, token: String, secure: bool) -> Response {
    let cookie = build_cookie(
        ACCESS_TOKEN_COOKIE,
        &token,
        SESSION_DAYS * 24 * 60 * 60,
        secure,
    );
    let mut response = (status, Json(SessionResponse { user_id, token })).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
