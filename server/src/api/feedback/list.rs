use crate::api::feedback::FeedbackResponse;
use crate::api::{error_response, ApiQuery, ErrorResponse};
use crate::get_conn;
use crate::models::Feedback;
use crate::schema::feedback;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LIMIT: i64 = 6;
const MAX_LIMIT: i64 = 50;

/// Sort order for the feedback list. Ties are broken newest first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSort {
    #[default]
    Newest,
    StarsDesc,
    StarsAsc,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListFeedbackParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Items per page (default: 6, max: 50)
    pub limit: Option<i64>,
    /// Sort order (default: newest)
    #[serde(default)]
    pub sort: FeedbackSort,
}

impl ListFeedbackParams {
    /// `(limit, offset)` after defaults and clamping.
    fn window(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let page = self.page.unwrap_or(1).max(1);
        (limit, (page - 1).saturating_mul(limit))
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeedbackListResponse {
    pub results: Vec<FeedbackResponse>,
}

#[utoipa::path(
    get,
    path = "/api/feedback/all",
    tag = "feedback",
    params(ListFeedbackParams),
    responses(
        (status = 200, description = "One page of feedback", body = FeedbackListResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse)
    )
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListFeedbackParams>,
) -> impl IntoResponse {
    let (limit, offset) = params.window();
    let mut conn = get_conn!(state.pool);

    let query = feedback::table.select(Feedback::as_select()).into_boxed();
    let query = match params.sort {
        FeedbackSort::Newest => query.order(feedback::created_at.desc()),
        FeedbackSort::StarsDesc => {
            query.order((feedback::rate.desc(), feedback::created_at.desc()))
        }
        FeedbackSort::StarsAsc => query.order((feedback::rate.asc(), feedback::created_at.desc())),
    };

    let rows: Vec<Feedback> = match query.limit(limit).offset(offset).load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list feedback");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch feedback");
        }
    };

    (
        StatusCode::OK,
        Json(FeedbackListResponse {
            results: rows.into_iter().map(FeedbackResponse::from).collect(),
        }),
    )
        .into_response()
}
