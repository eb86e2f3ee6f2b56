use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::reviewmodel::Review;

#[async_trait]
pub trait ReviewExt {
    async fn create_review(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        rating: i32,
        feedback: Option<String>,
    ) -> Result<Review, Error>;

    async fn has_rated(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
    ) -> Result<bool, Error>;

    async fn get_reviews_for_user(
        &self,
        reviewee_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, Error>;
}

const REVIEW_COLUMNS: &str =
    r#"id, job_id, reviewer_id, reviewee_id, rating, feedback, created_at"#;

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        rating: i32,
        feedback: Option<String>,
    ) -> Result<Review, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (job_id, reviewer_id, reviewee_id, rating, feedback)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(reviewer_id)
        .bind(reviewee_id)
        .bind(rating)
        .bind(feedback)
        .fetch_one(&self.pool)
        .await
    }

    async fn has_rated(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
    ) -> Result<bool, Error> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM reviews
            WHERE job_id = $1 AND reviewer_id = $2 AND reviewee_id = $3
            "#,
        )
        .bind(job_id)
        .bind(reviewer_id)
        .bind(reviewee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn get_reviews_for_user(
        &self,
        reviewee_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS} FROM reviews
            WHERE reviewee_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(reviewee_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }
}
