use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Bid, Job};

#[async_trait]
pub trait BidExt {
    async fn create_bid(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
        proposal: String,
        bid_amount: f64,
        estimated_completion_time: Option<i32>,
        cover_letter: Option<String>,
    ) -> Result<Bid, Error>;

    async fn get_bid_by_id(&self, bid_id: Uuid) -> Result<Option<Bid>, Error>;

    async fn get_job_bids(&self, job_id: Uuid) -> Result<Vec<Bid>, Error>;

    /// The single accepted bid for a job, if any.
    async fn get_accepted_bid(&self, job_id: Uuid) -> Result<Option<Bid>, Error>;

    /// A freelancer's own bid for a job. Unique per (job, freelancer).
    async fn get_freelancer_bid(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
    ) -> Result<Option<Bid>, Error>;

    /// Accept one pending bid and, in the same transaction, reject every
    /// sibling pending bid and move the job to in_progress. The job row is
    /// locked first so two concurrent accepts serialize; the second one finds
    /// the bid no longer pending and gets RowNotFound.
    async fn accept_bid(&self, job_id: Uuid, bid_id: Uuid) -> Result<(Job, Bid), Error>;

    async fn reject_bid(&self, bid_id: Uuid) -> Result<Bid, Error>;
}

const BID_COLUMNS: &str = r#"id, job_id, freelancer_id, proposal, bid_amount,
       estimated_completion_time, cover_letter, status, created_at, updated_at"#;

#[async_trait]
impl BidExt for DBClient {
    async fn create_bid(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
        proposal: String,
        bid_amount: f64,
        estimated_completion_time: Option<i32>,
        cover_letter: Option<String>,
    ) -> Result<Bid, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            INSERT INTO bids (job_id, freelancer_id, proposal, bid_amount,
                              estimated_completion_time, cover_letter)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BID_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(freelancer_id)
        .bind(proposal)
        .bind(bid_amount)
        .bind(estimated_completion_time)
        .bind(cover_letter)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_bid_by_id(&self, bid_id: Uuid) -> Result<Option<Bid>, Error> {
        sqlx::query_as::<_, Bid>(&format!("SELECT {BID_COLUMNS} FROM bids WHERE id = $1"))
            .bind(bid_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_job_bids(&self, job_id: Uuid) -> Result<Vec<Bid>, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            SELECT {BID_COLUMNS} FROM bids
            WHERE job_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_accepted_bid(&self, job_id: Uuid) -> Result<Option<Bid>, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            SELECT {BID_COLUMNS} FROM bids
            WHERE job_id = $1 AND status = 'accepted'::bid_status
            "#
        ))
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_freelancer_bid(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
    ) -> Result<Option<Bid>, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            SELECT {BID_COLUMNS} FROM bids
            WHERE job_id = $1 AND freelancer_id = $2
            "#
        ))
        .bind(job_id)
        .bind(freelancer_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn accept_bid(&self, job_id: Uuid, bid_id: Uuid) -> Result<(Job, Bid), Error> {
        let mut tx = self.pool.begin().await?;

        // Lock the job row first; every accept for this job serializes here.
        sqlx::query_as::<_, Job>(
            r#"
            SELECT id, admin_id, title, description, budget_min, budget_max,
                   deadline, status, created_at, updated_at
            FROM jobs
            WHERE id = $1 AND status = 'open'::job_status
            FOR UPDATE
            "#,
        )
        .bind(job_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(Error::RowNotFound)?;

        let accepted = sqlx::query_as::<_, Bid>(&format!(
            r#"
            UPDATE bids
            SET status = 'accepted'::bid_status, updated_at = NOW()
            WHERE id = $1 AND job_id = $2 AND status = 'pending'::bid_status
            RETURNING {BID_COLUMNS}
            "#
        ))
        .bind(bid_id)
        .bind(job_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(Error::RowNotFound)?;

        sqlx::query(
            r#"
            UPDATE bids
            SET status = 'rejected'::bid_status, updated_at = NOW()
            WHERE job_id = $1 AND id != $2 AND status = 'pending'::bid_status
            "#,
        )
        .bind(job_id)
        .bind(bid_id)
        .execute(&mut *tx)
        .await?;

        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = 'in_progress'::job_status, updated_at = NOW()
            WHERE id = $1
            RETURNING id, admin_id, title, description, budget_min, budget_max,
                      deadline, status, created_at, updated_at
            "#,
        )
        .bind(job_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((job, accepted))
    }

    async fn reject_bid(&self, bid_id: Uuid) -> Result<Bid, Error> {
        sqlx::query_as::<_, Bid>(&format!(
            r#"
            UPDATE bids
            SET status = 'rejected'::bid_status, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'::bid_status
            RETURNING {BID_COLUMNS}
            "#
        ))
        .bind(bid_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::RowNotFound)
    }
}
