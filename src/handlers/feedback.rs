use axum::{
    extract::{rejection::JsonRejection, Json},
    response::Json as ResponseJson,
};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{FeedbackRequest, FeedbackResponse};

pub const FEEDBACK_THANKS: &str = "Thanks! We'll use this to improve.";

/// Accepts a usefulness rating. Feedback is logged, never stored.
pub async fn feedback_handler(
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> AppResult<ResponseJson<FeedbackResponse>> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Unreadable feedback body");
        AppError::validation(rejection.body_text())
    })?;

    payload.validate().map_err(AppError::validation)?;

    let comment_length = payload.comments.as_deref().map(str::len).unwrap_or(0);
    info!(
        rating = payload.rating,
        comment_length = comment_length,
        "Feedback received"
    );

    Ok(ResponseJson(FeedbackResponse {
        success: true,
        message: FEEDBACK_THANKS.to_string(),
    }))
}
