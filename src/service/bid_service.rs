//! Bid ledger rules: one bid per (job, freelancer), one accepted bid per job,
//! acceptance atomically rejects siblings and moves the job in progress.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{biddb::BidExt, db::DBClient, jobdb::JobExt},
    models::{
        jobmodel::{Bid, BidStatus, Job, JobStatus},
        usermodel::{User, UserRole},
    },
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct BidService {
    db_client: Arc<DBClient>,
}

impl BidService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn submit_bid(
        &self,
        job_id: Uuid,
        freelancer: &User,
        proposal: String,
        bid_amount: f64,
        estimated_completion_time: Option<i32>,
        cover_letter: Option<String>,
    ) -> Result<Bid, ServiceError> {
        if freelancer.role != UserRole::Freelancer {
            return Err(ServiceError::NotFreelancer);
        }

        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.status != JobStatus::Open {
            return Err(ServiceError::JobNotOpen(job_id, job.status));
        }

        if self
            .db_client
            .get_freelancer_bid(job_id, freelancer.id)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateBid {
                job_id,
                freelancer_id: freelancer.id,
            });
        }

        let bid = self
            .db_client
            .create_bid(
                job_id,
                freelancer.id,
                proposal,
                bid_amount,
                estimated_completion_time,
                cover_letter,
            )
            .await
            .map_err(|e| {
                // The unique index backstops the pre-check under races.
                if is_unique_violation(&e) {
                    ServiceError::DuplicateBid {
                        job_id,
                        freelancer_id: freelancer.id,
                    }
                } else {
                    ServiceError::Database(e)
                }
            })?;

        tracing::info!(
            job_id = %job_id,
            freelancer_id = %freelancer.id,
            amount = bid_amount,
            "bid submitted"
        );

        Ok(bid)
    }

    /// Accept a pending bid on the caller's own open job. The ledger update
    /// (accept + sibling rejection + job status) is one transaction; no
    /// half-updated state is ever visible.
    pub async fn accept_bid(&self, bid_id: Uuid, poster: &User) -> Result<(Job, Bid), ServiceError> {
        let bid = self
            .db_client
            .get_bid_by_id(bid_id)
            .await?
            .ok_or(ServiceError::BidNotFound(bid_id))?;

        let job = self
            .db_client
            .get_job_by_id(bid.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(bid.job_id))?;

        if job.admin_id != poster.id {
            return Err(ServiceError::NotJobPoster {
                job_id: job.id,
                user_id: poster.id,
            });
        }

        if bid.status != BidStatus::Pending {
            return Err(ServiceError::BidNotPending(bid_id, bid.status));
        }

        let (job, accepted) = self
            .db_client
            .accept_bid(bid.job_id, bid_id)
            .await
            .map_err(|e| match e {
                // Lost the race: someone accepted first or the job closed.
                sqlx::Error::RowNotFound => ServiceError::BidNotPending(bid_id, bid.status),
                other => ServiceError::Database(other),
            })?;

        tracing::info!(
            job_id = %job.id,
            bid_id = %accepted.id,
            freelancer_id = %accepted.freelancer_id,
            "bid accepted, job moved to in_progress"
        );

        Ok((job, accepted))
    }

    pub async fn reject_bid(&self, bid_id: Uuid, poster: &User) -> Result<Bid, ServiceError> {
        let bid = self
            .db_client
            .get_bid_by_id(bid_id)
            .await?
            .ok_or(ServiceError::BidNotFound(bid_id))?;

        let job = self
            .db_client
            .get_job_by_id(bid.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(bid.job_id))?;

        if job.admin_id != poster.id {
            return Err(ServiceError::NotJobPoster {
                job_id: job.id,
                user_id: poster.id,
            });
        }

        if bid.status != BidStatus::Pending {
            return Err(ServiceError::BidNotPending(bid_id, bid.status));
        }

        let rejected = self
            .db_client
            .reject_bid(bid_id)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => ServiceError::BidNotPending(bid_id, bid.status),
                other => ServiceError::Database(other),
            })?;

        Ok(rejected)
    }

    /// All bids on a job; only its poster may list them.
    pub async fn list_job_bids(&self, job_id: Uuid, poster: &User) -> Result<Vec<Bid>, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.admin_id != poster.id {
            return Err(ServiceError::NotJobPoster {
                job_id,
                user_id: poster.id,
            });
        }

        Ok(self.db_client.get_job_bids(job_id).await?)
    }

    pub async fn get_own_bid(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
    ) -> Result<Option<Bid>, ServiceError> {
        Ok(self
            .db_client
            .get_freelancer_bid(job_id, freelancer_id)
            .await?)
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
