use crate::auth::MaybeAuthUser;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckSessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

#[utoipa::path(
    get,
    path = "/api/auth/check-session",
    tag = "auth",
    responses(
        (status = 200, description = "Whether the request carries a live session", body = CheckSessionResponse)
    ),
    security(
        (),
        ("bearer_auth" = [])
    )
)]
pub async fn check_session(MaybeAuthUser(user): MaybeAuthUser) -> impl IntoResponse {
    let user = user.map(|u| SessionUser {
        id: u.id,
        username: u.username,
    });

    (
        StatusCode::OK,
        Json(CheckSessionResponse {
            authenticated: user.is_some(),
            user,
        }),
    )
}
