use super::{session_response, Credentials, SessionResponse};
use crate::api::{error_response, ErrorResponse};
use crate::auth::{create_session, verify_password};
use crate::get_conn;
use crate::models::User;
use crate::schema::users;
use crate::username_matches;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "auth",
    request_body(content = Credentials, example = json!({"username": "user", "password": "password"})),
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let user: User = match users::table
        .filter(username_matches!(req.username.trim()))
        .select(User::as_select())
        .first(&mut conn)
    {
        Ok(u) => u,
        Err(_) => return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    };

    if !verify_password(&req.password, &user.password_hash) {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let token = match create_session(&mut conn, user.id) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create session");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session");
        }
    };

    session_response(StatusCode::OK, user.id, token, state.config.cookie_secure)
}
