use crate::api::ErrorResponse;
use crate::cookies::get_cookie;
use crate::models::User;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::convert::Infallible;
use std::sync::Arc;

use super::sessions::SessionStore;

/// Cookie set on signup/signin for browser clients.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Session token from `Authorization: Bearer <token>`, falling back to the
/// `access_token` cookie.
pub fn bearer_or_cookie_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    bearer.or_else(|| get_cookie(headers, ACCESS_TOKEN_COOKIE).filter(|t| !t.is_empty()))
}

/// Extractor that validates the session token and provides the authenticated user.
///
/// Use this in any handler that requires authentication:
/// ```ignore
/// async fn my_handler(user: AuthUser) -> impl IntoResponse {
///     // user.0 is the authenticated User
/// }
/// ```
pub struct AuthUser(pub User);

pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing session token",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<dyn SessionStore>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_or_cookie_token(&parts.headers).ok_or(AuthError::MissingToken)?;

        let sessions = Arc::<dyn SessionStore>::from_ref(state);
        let user = sessions
            .user_for_token(token)
            .await
            .ok_or(AuthError::InvalidToken)?;

        Ok(AuthUser(user))
    }
}

/// Like [`AuthUser`], but a missing or invalid token just means "guest".
/// Requests without any token skip the session lookup.
pub struct MaybeAuthUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<dyn SessionStore>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_or_cookie_token(&parts.headers) else {
            return Ok(MaybeAuthUser(None));
        };

        let sessions = Arc::<dyn SessionStore>::from_ref(state);
        Ok(MaybeAuthUser(sessions.user_for_token(token).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=def"));
        assert_eq!(bearer_or_cookie_token(&headers), Some("abc"));
    }

    #[test]
    fn test_cookie_used_without_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=def"));
        assert_eq!(bearer_or_cookie_token(&headers), Some("def"));
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_or_cookie_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token="));
        assert_eq!(bearer_or_cookie_token(&headers), None);
    }
}
