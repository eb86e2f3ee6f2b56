//! Durable ordered message log per job plus live fan-out to subscribers.
//! Every operation re-resolves collaboration before touching the log.

use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, messagedb::MessageExt},
    events::ChatHub,
    models::{
        messagemodel::{Message, MessageType},
        usermodel::User,
    },
    service::{
        collaboration::CollaborationService,
        error::ServiceError,
    },
};

#[derive(Debug, Clone)]
pub struct MessageService {
    db_client: Arc<DBClient>,
    collaboration: CollaborationService,
    hub: Arc<ChatHub>,
}

impl MessageService {
    pub fn new(
        db_client: Arc<DBClient>,
        collaboration: CollaborationService,
        hub: Arc<ChatHub>,
    ) -> Self {
        Self {
            db_client,
            collaboration,
            hub,
        }
    }

    pub fn hub(&self) -> &Arc<ChatHub> {
        &self.hub
    }

    /// Append a message to the job's channel and push it to live
    /// subscribers. The receiver is always the resolved counterpart; a
    /// client-supplied receiver is never trusted.
    pub async fn post_message(
        &self,
        job_id: Uuid,
        sender: &User,
        content: &str,
    ) -> Result<Message, ServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ServiceError::EmptyContent);
        }

        let collaboration = self.collaboration.resolve(job_id, sender).await?;

        let clean = ammonia::clean(content);

        let message = self
            .db_client
            .create_message(
                job_id,
                sender.id,
                collaboration.counterpart.id,
                MessageType::Text,
                clean,
            )
            .await?;

        // The insert is durable; fan-out happens after commit so every
        // subscriber either sees the message live or finds it in history.
        let delivered = self.hub.publish(message.clone()).await;
        tracing::debug!(
            job_id = %job_id,
            message_id = %message.id,
            subscribers = delivered,
            "message published"
        );

        Ok(message)
    }

    /// Ordered history, oldest first, for a collaborator.
    pub async fn get_history(&self, job_id: Uuid, requester: &User) -> Result<Vec<Message>, ServiceError> {
        self.collaboration.resolve(job_id, requester).await?;
        Ok(self.db_client.get_job_messages(job_id).await?)
    }

    /// Open a live feed: the broadcast receiver is registered before history
    /// is read, so nothing inserted in between can be missed. A message
    /// committed in that window may arrive twice; subscribers deduplicate by
    /// message id.
    pub async fn subscribe(
        &self,
        job_id: Uuid,
        requester: &User,
    ) -> Result<(Vec<Message>, broadcast::Receiver<Message>), ServiceError> {
        self.collaboration.resolve(job_id, requester).await?;

        let receiver = self.hub.subscribe(job_id).await;
        let history = self.db_client.get_job_messages(job_id).await?;

        Ok((history, receiver))
    }

    pub async fn mark_read(&self, job_id: Uuid, requester: &User) -> Result<u64, ServiceError> {
        self.collaboration.resolve(job_id, requester).await?;
        Ok(self
            .db_client
            .mark_messages_as_read(job_id, requester.id)
            .await?)
    }

    pub async fn unread_count(&self, job_id: Uuid, requester: &User) -> Result<i64, ServiceError> {
        self.collaboration.resolve(job_id, requester).await?;
        Ok(self.db_client.get_unread_count(job_id, requester.id).await?)
    }
}
