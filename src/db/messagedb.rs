use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::messagemodel::{Message, MessageType};

#[async_trait]
pub trait MessageExt {
    /// Append one message. `created_at` comes from the database clock so the
    /// channel's ordering authority is server time, never the client's.
    async fn create_message(
        &self,
        job_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        message_type: MessageType,
        content: String,
    ) -> Result<Message, Error>;

    /// Full ordered history for a job, oldest first.
    async fn get_job_messages(&self, job_id: Uuid) -> Result<Vec<Message>, Error>;

    async fn mark_messages_as_read(&self, job_id: Uuid, reader_id: Uuid) -> Result<u64, Error>;

    async fn get_unread_count(&self, job_id: Uuid, reader_id: Uuid) -> Result<i64, Error>;
}

const MESSAGE_COLUMNS: &str =
    r#"id, job_id, sender_id, receiver_id, content, message_type, is_read, created_at"#;

#[async_trait]
impl MessageExt for DBClient {
    async fn create_message(
        &self,
        job_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        message_type: MessageType,
        content: String,
    ) -> Result<Message, Error> {
        sqlx::query_as::<_, Message>(&format!(
            r#"
            INSERT INTO messages (job_id, sender_id, receiver_id, message_type, content, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(message_type)
        .bind(content)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_messages(&self, job_id: Uuid) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE job_id = $1
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_messages_as_read(&self, job_id: Uuid, reader_id: Uuid) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = true
            WHERE job_id = $1 AND receiver_id = $2 AND is_read = false
            "#,
        )
        .bind(job_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn get_unread_count(&self, job_id: Uuid, reader_id: Uuid) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM messages
            WHERE job_id = $1 AND receiver_id = $2 AND is_read = false
            "#,
        )
        .bind(job_id)
        .bind(reader_id)
        .fetch_one(&self.pool)
        .await
    }
}
