use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Job, JobStatus};

#[async_trait]
pub trait JobExt {
    async fn create_job(
        &self,
        admin_id: Uuid,
        title: String,
        description: String,
        budget_min: Option<f64>,
        budget_max: Option<f64>,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Job, Error>;

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    async fn get_open_jobs(&self, limit: i64, offset: i64) -> Result<Vec<Job>, Error>;

    async fn get_jobs_by_admin(&self, admin_id: Uuid, limit: i64, offset: i64)
        -> Result<Vec<Job>, Error>;

    /// Guarded status write: only succeeds when the job currently holds
    /// `expected`, so concurrent writers cannot race past each other.
    async fn update_job_status(
        &self,
        job_id: Uuid,
        expected: JobStatus,
        new_status: JobStatus,
    ) -> Result<Option<Job>, Error>;
}

const JOB_COLUMNS: &str = r#"id, admin_id, title, description, budget_min, budget_max,
       deadline, status, created_at, updated_at"#;

#[async_trait]
impl JobExt for DBClient {
    async fn create_job(
        &self,
        admin_id: Uuid,
        title: String,
        description: String,
        budget_min: Option<f64>,
        budget_max: Option<f64>,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (admin_id, title, description, budget_min, budget_max, deadline)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(admin_id)
        .bind(title)
        .bind(description)
        .bind(budget_min)
        .bind(budget_max)
        .bind(deadline)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_open_jobs(&self, limit: i64, offset: i64) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE status = 'open'::job_status
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_jobs_by_admin(
        &self,
        admin_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE admin_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(admin_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_job_status(
        &self,
        job_id: Uuid,
        expected: JobStatus,
        new_status: JobStatus,
    ) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(expected)
        .bind(new_status)
        .fetch_optional(&self.pool)
        .await
    }
}
