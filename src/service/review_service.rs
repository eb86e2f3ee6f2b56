//! Completion rating gate: once a job is completed, each collaborator rates
//! the other exactly once; the reviewee's aggregate is recomputed in full.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{biddb::BidExt, db::DBClient, jobdb::JobExt, reviewdb::ReviewExt, userdb::UserExt},
    models::{
        jobmodel::JobStatus,
        reviewmodel::Review,
        usermodel::User,
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct ReviewService {
    db_client: Arc<DBClient>,
}

impl ReviewService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn has_rated(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
    ) -> Result<bool, ServiceError> {
        Ok(self
            .db_client
            .has_rated(job_id, reviewer_id, reviewee_id)
            .await?)
    }

    /// Submit one side of the mutual rating. The gate only opens for a
    /// completed job with an accepted bid, and the reviewer/reviewee must be
    /// the collaborator pair. The two directions are independent.
    pub async fn submit_review(
        &self,
        job_id: Uuid,
        reviewer: &User,
        reviewee_id: Uuid,
        rating: i32,
        feedback: Option<String>,
    ) -> Result<Review, ServiceError> {
        if !(1..=5).contains(&rating) {
            return Err(ServiceError::InvalidRating(rating));
        }

        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.status != JobStatus::Completed {
            return Err(ServiceError::JobNotCompleted(job_id, job.status));
        }

        let accepted_bid = self
            .db_client
            .get_accepted_bid(job_id)
            .await?
            .ok_or(ServiceError::NoAssignee(job_id))?;

        // The pair is (poster, accepted freelancer); the reviewer must be one
        // of them and the reviewee the other.
        let expected_reviewee = if reviewer.id == job.admin_id {
            accepted_bid.freelancer_id
        } else if reviewer.id == accepted_bid.freelancer_id {
            job.admin_id
        } else {
            return Err(ServiceError::CollaborationDenied {
                job_id,
                user_id: reviewer.id,
            });
        };

        if reviewee_id != expected_reviewee {
            return Err(ServiceError::InvalidReviewee(reviewee_id));
        }

        if self
            .db_client
            .has_rated(job_id, reviewer.id, reviewee_id)
            .await?
        {
            return Err(ServiceError::DuplicateReview {
                job_id,
                reviewer_id: reviewer.id,
                reviewee_id,
            });
        }

        let review = self
            .db_client
            .create_review(job_id, reviewer.id, reviewee_id, rating, feedback)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ServiceError::DuplicateReview {
                        job_id,
                        reviewer_id: reviewer.id,
                        reviewee_id,
                    }
                } else {
                    ServiceError::Database(e)
                }
            })?;

        // The review is already durable. The recompute is a full, idempotent
        // rewrite of the aggregate, so a failure here only delays it until
        // the next recompute; it must not fail the submission.
        if let Err(e) = self.db_client.recompute_user_rating(reviewee_id).await {
            tracing::warn!(
                reviewee_id = %reviewee_id,
                error = %e,
                "rating aggregate recompute failed; will self-correct on next review"
            );
        }

        tracing::info!(
            job_id = %job_id,
            reviewer_id = %reviewer.id,
            reviewee_id = %reviewee_id,
            rating,
            "review submitted"
        );

        Ok(review)
    }

    pub async fn list_reviews_for_user(
        &self,
        reviewee_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, ServiceError> {
        Ok(self
            .db_client
            .get_reviews_for_user(reviewee_id, limit, offset)
            .await?)
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Mean of all ratings, rounded to two decimals; what the SQL recompute
/// produces. Kept here so the rounding contract is testable without a store.
#[allow(dead_code)]
pub(crate) fn aggregate_rating(ratings: &[i32]) -> (f64, i32) {
    if ratings.is_empty() {
        return (0.0, 0);
    }
    let sum: i32 = ratings.iter().sum();
    let mean = sum as f64 / ratings.len() as f64;
    ((mean * 100.0).round() / 100.0, ratings.len() as i32)
}

#[cfg(test)]
mod tests {
    use super::aggregate_rating;

    #[test]
    fn empty_history_is_zero() {
        assert_eq!(aggregate_rating(&[]), (0.0, 0));
    }

    #[test]
    fn mean_rounds_to_two_decimals() {
        // 5, 4, 4 -> 4.333... -> 4.33
        assert_eq!(aggregate_rating(&[5, 4, 4]), (4.33, 3));
        // 5, 4 -> 4.5
        assert_eq!(aggregate_rating(&[5, 4]), (4.5, 2));
    }

    #[test]
    fn single_five_star_review() {
        assert_eq!(aggregate_rating(&[5]), (5.0, 1));
    }

    #[test]
    fn recompute_is_idempotent() {
        let ratings = [3, 5, 4, 2];
        assert_eq!(aggregate_rating(&ratings), aggregate_rating(&ratings));
    }
}
