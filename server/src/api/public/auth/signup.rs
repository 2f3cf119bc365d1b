use super::{session_response, Credentials, SessionResponse};
use crate::api::{error_response, ErrorResponse};
use crate::auth::{create_session, hash_password};
use crate::get_conn;
use crate::models::{NewUser, User};
use crate::schema::users;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body(content = Credentials, example = json!({"username": "user", "password": "password"})),
    responses(
        (status = 201, description = "User created successfully", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> impl IntoResponse {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
        );
    }

    let password_hash = match hash_password(&req.password) {
        Ok(h) => h,
        Err(_) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to hash password",
            )
        }
    };

    let mut conn = get_conn!(state.pool);

    let new_user = NewUser {
        username,
        password_hash: &password_hash,
    };

    let user: User = match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
    {
        Ok(u) => u,
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => return error_response(StatusCode::CONFLICT, "Username already exists"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create user");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user");
        }
    };

    let token = match create_session(&mut conn, user.id) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create session");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session");
        }
    };

    tracing::info!(user_id = %user.id, "User signed up");
    session_response(StatusCode::CREATED, user.id, token, state.config.cookie_secure)
}
