use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::HttpError,
    models::{
        jobmodel::{BidStatus, JobStatus},
        taskmodel::TaskStatus,
    },
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Bid {0} not found")]
    BidNotFound(Uuid),

    #[error("Task {0} not found")]
    TaskNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Job {0} is not open for bidding (status: {1:?})")]
    JobNotOpen(Uuid, JobStatus),

    #[error("Job {0} is not completed yet (status: {1:?})")]
    JobNotCompleted(Uuid, JobStatus),

    #[error("Job {0} is not in progress (status: {1:?})")]
    JobNotInProgress(Uuid, JobStatus),

    #[error("Bid {0} is not pending (status: {1:?})")]
    BidNotPending(Uuid, BidStatus),

    #[error("Freelancer {freelancer_id} already has a bid on job {job_id}")]
    DuplicateBid { job_id: Uuid, freelancer_id: Uuid },

    #[error("A review for this job and reviewee already exists")]
    DuplicateReview {
        job_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
    },

    #[error("Task cannot move from {from:?} to {to:?}")]
    InvalidTaskTransition { from: TaskStatus, to: TaskStatus },

    #[error("Job {0} has no accepted bid, so no freelancer is assigned")]
    NoAssignee(Uuid),

    #[error("User {user_id} is not a collaborator on job {job_id}")]
    CollaborationDenied { job_id: Uuid, user_id: Uuid },

    #[error("User {user_id} is not the poster of job {job_id}")]
    NotJobPoster { job_id: Uuid, user_id: Uuid },

    #[error("User {user_id} may not act on task {task_id}")]
    NotTaskParticipant { task_id: Uuid, user_id: Uuid },

    #[error("Only freelancers can submit bids")]
    NotFreelancer,

    #[error("Message content cannot be empty")]
    EmptyContent,

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),

    #[error("Reviewee {0} is not the counterpart for this job")]
    InvalidReviewee(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    /// Whether the caller may retry the same call and hope for a different
    /// outcome. Only transient store failures qualify; invariant violations
    /// and denials are terminal for the call.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Database(err) => !matches!(
                err,
                sqlx::Error::RowNotFound
                    | sqlx::Error::Database(_)
                    | sqlx::Error::ColumnNotFound(_)
                    | sqlx::Error::TypeNotFound { .. }
            ),
            _ => false,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::JobNotFound(_)
            | ServiceError::BidNotFound(_)
            | ServiceError::TaskNotFound(_)
            | ServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::JobNotOpen(_, _)
            | ServiceError::JobNotCompleted(_, _)
            | ServiceError::JobNotInProgress(_, _)
            | ServiceError::BidNotPending(_, _)
            | ServiceError::InvalidTaskTransition { .. }
            | ServiceError::NoAssignee(_)
            | ServiceError::EmptyContent
            | ServiceError::InvalidRating(_)
            | ServiceError::InvalidReviewee(_)
            | ServiceError::NotFreelancer => StatusCode::BAD_REQUEST,

            ServiceError::DuplicateBid { .. } | ServiceError::DuplicateReview { .. } => {
                StatusCode::CONFLICT
            }

            ServiceError::CollaborationDenied { .. }
            | ServiceError::NotJobPoster { .. }
            | ServiceError::NotTaskParticipant { .. } => StatusCode::FORBIDDEN,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Store details stay in the logs, not in the response body.
            "A storage error occurred, please retry".to_string()
        } else {
            error.to_string()
        };
        HttpError::new(message, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_map_to_conflict() {
        let err = ServiceError::DuplicateBid {
            job_id: Uuid::new_v4(),
            freelancer_id: Uuid::new_v4(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(!err.is_retryable());
    }

    #[test]
    fn denial_maps_to_forbidden_and_is_terminal() {
        let err = ServiceError::CollaborationDenied {
            job_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(!err.is_retryable());
    }

    #[test]
    fn pool_timeout_is_retryable_but_constraint_violation_is_not() {
        assert!(ServiceError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!ServiceError::Database(sqlx::Error::RowNotFound).is_retryable());
    }

    #[test]
    fn invalid_transition_maps_to_bad_request() {
        let err = ServiceError::InvalidTaskTransition {
            from: TaskStatus::Completed,
            to: TaskStatus::Pending,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
