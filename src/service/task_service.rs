//! Workroom task board: poster creates tasks for the accepted freelancer;
//! either side moves them through the pending/in_progress/completed machine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::{biddb::BidExt, db::DBClient, jobdb::JobExt, taskdb::TaskExt},
    models::{
        jobmodel::{Job, JobStatus},
        taskmodel::{Task, TaskStatus},
        usermodel::User,
    },
    service::{collaboration::CollaborationService, error::ServiceError},
};

#[derive(Debug, Clone)]
pub struct TaskService {
    db_client: Arc<DBClient>,
    collaboration: CollaborationService,
}

impl TaskService {
    pub fn new(db_client: Arc<DBClient>, collaboration: CollaborationService) -> Self {
        Self {
            db_client,
            collaboration,
        }
    }

    /// Poster-only. The task is assigned to the job's accepted freelancer;
    /// without an accepted bid there is nobody to assign to.
    pub async fn create_task(
        &self,
        job_id: Uuid,
        poster: &User,
        title: String,
        description: Option<String>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task, ServiceError> {
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

        let accepted_bid = self
            .db_client
            .get_accepted_bid(job_id)
            .await?
            .ok_or(ServiceError::NoAssignee(job_id))?;

        let task = self
            .db_client
            .create_task(job_id, accepted_bid.freelancer_id, title, description, due_date)
            .await?;

        tracing::info!(
            job_id = %job_id,
            task_id = %task.id,
            assignee = %task.freelancer_id,
            "task created"
        );

        Ok(task)
    }

    /// Move a task to a new status. Only the job's poster or the assigned
    /// freelancer may transition, and only along the state machine's edges.
    pub async fn transition(
        &self,
        task_id: Uuid,
        actor: &User,
        new_status: TaskStatus,
    ) -> Result<Task, ServiceError> {
        let task = self
            .db_client
            .get_task_by_id(task_id)
            .await?
            .ok_or(ServiceError::TaskNotFound(task_id))?;

        let job = self
            .db_client
            .get_job_by_id(task.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(task.job_id))?;

        let is_poster = job.admin_id == actor.id;
        let is_assignee = task.freelancer_id == actor.id;
        if !is_poster && !is_assignee {
            return Err(ServiceError::NotTaskParticipant {
                task_id,
                user_id: actor.id,
            });
        }

        if !task.status.can_transition(new_status) {
            return Err(ServiceError::InvalidTaskTransition {
                from: task.status,
                to: new_status,
            });
        }

        let updated = self.db_client.update_task_status(task_id, new_status).await?;

        tracing::info!(
            task_id = %task_id,
            from = task.status.to_str(),
            to = new_status.to_str(),
            actor = %actor.id,
            "task transitioned"
        );

        Ok(updated)
    }

    /// Workroom listing for either collaborator.
    pub async fn list_tasks(&self, job_id: Uuid, requester: &User) -> Result<Vec<Task>, ServiceError> {
        self.collaboration.resolve(job_id, requester).await?;
        Ok(self.db_client.get_job_tasks(job_id).await?)
    }

    /// Poster marks an in-progress job completed, activating the rating
    /// gate. Guarded at the store level so concurrent completes cannot
    /// double-fire.
    pub async fn complete_job(&self, job_id: Uuid, poster: &User) -> Result<Job, ServiceError> {
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

        if job.status != JobStatus::InProgress {
            return Err(ServiceError::JobNotInProgress(job_id, job.status));
        }

        let completed = self
            .db_client
            .update_job_status(job_id, JobStatus::InProgress, JobStatus::Completed)
            .await?
            .ok_or(ServiceError::JobNotInProgress(job_id, job.status))?;

        tracing::info!(job_id = %job_id, "job marked completed");

        Ok(completed)
    }
}
