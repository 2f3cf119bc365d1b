use crate::api::feedback::FeedbackResponse;
use crate::api::form::{store_image, FormData};
use crate::api::{error_response, ErrorResponse};
use crate::get_conn;
use crate::models::{Feedback, NewFeedback};
use crate::schema::feedback;
use crate::storage::Bucket;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

const DEFAULT_NAME: &str = "Anonymous";

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreateFeedbackRequest {
    pub name: Option<String>,
    #[schema(example = "5")]
    pub rate: String,
    pub feedback: String,
    pub exp: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateFeedbackResponse {
    pub success: bool,
    pub message: String,
    pub data: FeedbackResponse,
}

#[derive(Debug, PartialEq)]
struct FeedbackInput {
    name: String,
    rate: i32,
    feedback: String,
    exp: String,
}

fn parse_feedback_input(form: &FormData) -> Result<FeedbackInput, String> {
    let (Some(rate), Some(text)) = (form.text("rate"), form.text("feedback")) else {
        return Err("Rating and feedback are required.".to_string());
    };

    let rate = match rate.parse::<i32>() {
        Ok(r) if (1..=5).contains(&r) => r,
        _ => return Err("Rating must be a whole number from 1 to 5.".to_string()),
    };

    Ok(FeedbackInput {
        name: form.text("name").unwrap_or(DEFAULT_NAME).to_string(),
        rate,
        feedback: text.to_string(),
        exp: form.text("exp").unwrap_or_default().to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/api/feedback/create",
    tag = "feedback",
    request_body(content_type = "multipart/form-data", content = CreateFeedbackRequest),
    responses(
        (status = 201, description = "Feedback stored", body = CreateFeedbackResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut form = match FormData::read(&mut multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let input = match parse_feedback_input(&form) {
        Ok(input) => input,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let image_url = match form.take_file("image") {
        Some(image) => match store_image(
            state.objects.as_ref(),
            &state.config.public_base_url,
            Bucket::Feedback,
            &image,
        )
        .await
        {
            Ok(url) => url,
            Err(response) => return response,
        },
        None => String::new(),
    };

    let mut conn = get_conn!(state.pool);

    let new_feedback = NewFeedback {
        name: &input.name,
        rate: input.rate,
        feedback: &input.feedback,
        exp: &input.exp,
        image: &image_url,
    };

    let saved: Feedback = match diesel::insert_into(feedback::table)
        .values(&new_feedback)
        .returning(Feedback::as_returning())
        .get_result(&mut conn)
    {
        Ok(f) => f,
        Err(e) => {
            tracing::error!(error = %e, "Failed to insert feedback");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save feedback");
        }
    };

    tracing::info!(feedback_id = %saved.id, rate = saved.rate, "Feedback received");

    (
        StatusCode::CREATED,
        Json(CreateFeedbackResponse {
            success: true,
            message: "Feedback submitted successfully".to_string(),
            data: saved.into(),
        }),
    )
        .into_response()
}
