use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::reviewdtos::{RatingStatusDto, ReviewResponseDto, SubmitReviewDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn reviews_handler() -> Router {
    Router::new()
        .route("/:job_id/reviews", post(submit_review))
        .route("/:job_id/reviews/status", get(get_rating_status))
}

pub async fn submit_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<SubmitReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let review = app_state
        .review_service
        .submit_review(job_id, &auth.user, body.reviewee_id, body.rating, body.feedback)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(ReviewResponseDto {
        status: "success".to_string(),
        data: review,
    }))
}

/// Whether the caller still owes their counterpart a rating for this job.
/// Drives the rating prompt vs. the "already rated" confirmation.
pub async fn get_rating_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let collaboration = app_state
        .collaboration
        .resolve(job_id, &auth.user)
        .await
        .map_err(HttpError::from)?;

    let has_rated = app_state
        .review_service
        .has_rated(job_id, auth.user.id, collaboration.counterpart.id)
        .await
        .map_err(HttpError::from)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": RatingStatusDto {
            has_rated,
            counterpart_id: collaboration.counterpart.id,
        }
    })))
}
