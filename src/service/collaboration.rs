//! Decides, for a (job, requester) pair, whether the requester may use the
//! job's message channel and workroom, and who sits on the other side.
//!
//! The decision is recomputed from current bid/job state on every access.
//! A grant is never cached: bid state is the sole authorization token and it
//! can change underneath any previously issued answer.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{biddb::BidExt, db::DBClient, jobdb::JobExt, userdb::UserExt},
    models::{
        jobmodel::{Bid, BidStatus, Job},
        usermodel::{User, UserRole},
    },
    service::error::ServiceError,
};

/// A granted collaboration: the job plus the requester's counterpart.
#[derive(Debug, Clone)]
pub struct Collaboration {
    pub job: Job,
    pub counterpart: User,
    pub accepted_bid: Bid,
}

#[derive(Debug, Clone)]
pub struct CollaborationService {
    db_client: Arc<DBClient>,
}

/// Pure decision core: given the job, the requester, and the relevant bid
/// rows, return the counterpart's user id when access is granted.
pub(crate) fn decide_counterpart(
    job: &Job,
    requester_id: Uuid,
    requester_role: UserRole,
    accepted_bid: Option<&Bid>,
) -> Option<Uuid> {
    let accepted = accepted_bid.filter(|bid| bid.status == BidStatus::Accepted)?;

    match requester_role {
        UserRole::Admin if job.admin_id == requester_id => Some(accepted.freelancer_id),
        UserRole::Freelancer if accepted.freelancer_id == requester_id => Some(job.admin_id),
        _ => None,
    }
}

impl CollaborationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Resolve access for the requester on a job. Reads the current ledger
    /// state; denial is terminal for the call, not retryable.
    pub async fn resolve(&self, job_id: Uuid, requester: &User) -> Result<Collaboration, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let denied = ServiceError::CollaborationDenied {
            job_id,
            user_id: requester.id,
        };

        let accepted_bid = match self.db_client.get_accepted_bid(job_id).await? {
            Some(bid) => bid,
            None => return Err(denied),
        };

        let counterpart_id =
            decide_counterpart(&job, requester.id, requester.role, Some(&accepted_bid))
                .ok_or(denied)?;

        let counterpart = self
            .db_client
            .get_user(Some(counterpart_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(counterpart_id))?;

        Ok(Collaboration {
            job,
            counterpart,
            accepted_bid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::jobmodel::JobStatus;
    use chrono::Utc;

    fn job(admin_id: Uuid, status: JobStatus) -> Job {
        Job {
            id: Uuid::new_v4(),
            admin_id,
            title: "Landing page redesign".to_string(),
            description: "Rework the marketing site".to_string(),
            budget_min: Some(500.0),
            budget_max: Some(900.0),
            deadline: None,
            status,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn bid(job_id: Uuid, freelancer_id: Uuid, status: BidStatus) -> Bid {
        Bid {
            id: Uuid::new_v4(),
            job_id,
            freelancer_id,
            proposal: "I can do this".to_string(),
            bid_amount: 500.0,
            estimated_completion_time: Some(14),
            cover_letter: None,
            status,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    #[test]
    fn poster_with_accepted_bid_sees_the_freelancer() {
        let admin = Uuid::new_v4();
        let freelancer = Uuid::new_v4();
        let job = job(admin, JobStatus::InProgress);
        let accepted = bid(job.id, freelancer, BidStatus::Accepted);

        let counterpart = decide_counterpart(&job, admin, UserRole::Admin, Some(&accepted));
        assert_eq!(counterpart, Some(freelancer));
    }

    #[test]
    fn accepted_freelancer_sees_the_poster() {
        let admin = Uuid::new_v4();
        let freelancer = Uuid::new_v4();
        let job = job(admin, JobStatus::InProgress);
        let accepted = bid(job.id, freelancer, BidStatus::Accepted);

        let counterpart =
            decide_counterpart(&job, freelancer, UserRole::Freelancer, Some(&accepted));
        assert_eq!(counterpart, Some(admin));
    }

    #[test]
    fn rejected_freelancer_is_denied() {
        let admin = Uuid::new_v4();
        let winner = Uuid::new_v4();
        let loser = Uuid::new_v4();
        let job = job(admin, JobStatus::InProgress);
        let accepted = bid(job.id, winner, BidStatus::Accepted);

        assert_eq!(
            decide_counterpart(&job, loser, UserRole::Freelancer, Some(&accepted)),
            None
        );
    }

    #[test]
    fn no_accepted_bid_denies_everyone() {
        let admin = Uuid::new_v4();
        let job = job(admin, JobStatus::Open);

        assert_eq!(decide_counterpart(&job, admin, UserRole::Admin, None), None);
        assert_eq!(
            decide_counterpart(&job, Uuid::new_v4(), UserRole::Freelancer, None),
            None
        );
    }

    #[test]
    fn poster_of_a_different_job_is_denied() {
        let admin = Uuid::new_v4();
        let other_admin = Uuid::new_v4();
        let freelancer = Uuid::new_v4();
        let job = job(admin, JobStatus::InProgress);
        let accepted = bid(job.id, freelancer, BidStatus::Accepted);

        assert_eq!(
            decide_counterpart(&job, other_admin, UserRole::Admin, Some(&accepted)),
            None
        );
    }
}
