pub mod create;
pub mod list;

use crate::models::Feedback;
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/feedback endpoints (mounted at /api/feedback)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create::create_feedback))
        .route("/all", get(list::list_feedback))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub name: String,
    /// Star rating, 1 to 5
    pub rate: i32,
    pub feedback: String,
    /// Free-text account of the visitor's experience
    pub exp: String,
    /// Public URL of the attached image, empty when none
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id,
            name: f.name,
            rate: f.rate,
            feedback: f.feedback,
            exp: f.exp,
            image: f.image,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(create::create_feedback, list::list_feedback),
    components(schemas(
        FeedbackResponse,
        create::CreateFeedbackRequest,
        create::CreateFeedbackResponse,
        list::FeedbackSort,
        list::FeedbackListResponse,
    ))
)]
pub struct ApiDoc;
