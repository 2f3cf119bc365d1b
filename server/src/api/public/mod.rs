pub mod auth;
pub mod health;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/signup", post(auth::signup::signup))
        .route("/api/auth/signin", post(auth::signin::signin))
        .route("/api/auth/logout", post(auth::logout::logout))
        .route(
            "/api/auth/check-session",
            get(auth::check_session::check_session),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signin::signin,
        auth::signup::signup,
        auth::logout::logout,
        auth::check_session::check_session,
        health::health,
    ),
    components(schemas(
        auth::Credentials,
        auth::SessionResponse,
        auth::logout::LogoutResponse,
        auth::check_session::CheckSessionResponse,
        auth::check_session::SessionUser,
        health::HealthResponse,
    ))
)]
pub struct ApiDoc;
