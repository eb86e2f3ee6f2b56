use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::jobmodel::{Bid, Job};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1-200 characters"))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 10000,
        message = "Description must be between 1-10000 characters"
    ))]
    pub description: String,

    #[validate(range(min = 0.0, message = "Minimum budget cannot be negative"))]
    pub budget_min: Option<f64>,

    #[validate(range(min = 0.0, message = "Maximum budget cannot be negative"))]
    pub budget_max: Option<f64>,

    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SubmitBidDto {
    #[validate(length(
        min = 10,
        max = 5000,
        message = "Proposal must be between 10-5000 characters"
    ))]
    pub proposal: String,

    #[validate(range(min = 0.0, message = "Bid amount cannot be negative"))]
    pub bid_amount: f64,

    #[validate(range(min = 1, message = "Estimated completion time must be at least 1 day"))]
    pub estimated_completion_time: Option<i32>,

    #[validate(length(max = 5000, message = "Cover letter is too long"))]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct JobResponseDto {
    pub status: String,
    pub data: Job,
}

#[derive(Debug, Serialize)]
pub struct JobListResponseDto {
    pub status: String,
    pub data: Vec<Job>,
    pub results: usize,
}

#[derive(Debug, Serialize)]
pub struct BidResponseDto {
    pub status: String,
    pub data: Bid,
}

#[derive(Debug, Serialize)]
pub struct BidListResponseDto {
    pub status: String,
    pub data: Vec<Bid>,
    pub results: usize,
}
