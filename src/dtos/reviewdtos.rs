use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::reviewmodel::Review;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReviewDto {
    pub reviewee_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 5000, message = "Feedback is too long"))]
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponseDto {
    pub status: String,
    pub data: Review,
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponseDto {
    pub status: String,
    pub data: Vec<Review>,
    pub results: usize,
}

/// Whether the requester has already rated their counterpart for a job.
#[derive(Debug, Serialize)]
pub struct RatingStatusDto {
    pub has_rated: bool,
    pub counterpart_id: Uuid,
}
