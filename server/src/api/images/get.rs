use crate::api::{error_response, ErrorResponse};
use crate::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/images/{id}",
    tag = "images",
    params(
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
pub async fn get_image(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let object = match state.objects.get(id).await {
        Ok(Some(object)) => object,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Image not found"),
        Err(e) => {
            tracing::error!(error = %e, image_id = %id, "Failed to load image");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load image");
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, object.content_type)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(object.data))
        .unwrap_or_else(|_| error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load image"))
}
