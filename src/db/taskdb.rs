use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::taskmodel::{Task, TaskStatus};

#[async_trait]
pub trait TaskExt {
    async fn create_task(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
        title: String,
        description: Option<String>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task, Error>;

    async fn get_task_by_id(&self, task_id: Uuid) -> Result<Option<Task>, Error>;

    async fn get_job_tasks(&self, job_id: Uuid) -> Result<Vec<Task>, Error>;

    /// Write a new status. `completed_at` is set exactly when the task enters
    /// completed and cleared on every other status.
    async fn update_task_status(&self, task_id: Uuid, status: TaskStatus) -> Result<Task, Error>;
}

const TASK_COLUMNS: &str = r#"id, job_id, freelancer_id, title, description, status,
       due_date, completed_at, created_at, updated_at"#;

#[async_trait]
impl TaskExt for DBClient {
    async fn create_task(
        &self,
        job_id: Uuid,
        freelancer_id: Uuid,
        title: String,
        description: Option<String>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task, Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (job_id, freelancer_id, title, description, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(freelancer_id)
        .bind(title)
        .bind(description)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_task_by_id(&self, task_id: Uuid) -> Result<Option<Task>, Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_job_tasks(&self, job_id: Uuid) -> Result<Vec<Task>, Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS} FROM tasks
            WHERE job_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_task_status(&self, task_id: Uuid, status: TaskStatus) -> Result<Task, Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = $2,
                completed_at = CASE WHEN $2 = 'completed'::task_status THEN NOW() ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }
}
