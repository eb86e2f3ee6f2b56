//! Live fan-out for job message channels.
//!
//! Each job with at least one connected subscriber owns a broadcast channel.
//! Subscribers hold a `broadcast::Receiver`; dropping it is unsubscription —
//! no further deliveries reach a dropped receiver, and once a job's channel
//! has no receivers left it is pruned on the next publish.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::models::messagemodel::Message;

/// Messages buffered per job channel before slow subscribers start lagging.
const CHANNEL_BUFFER: usize = 256;

#[derive(Debug, Default)]
pub struct ChatHub {
    channels: RwLock<HashMap<Uuid, broadcast::Sender<Message>>>,
}

impl ChatHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            channels: RwLock::new(HashMap::new()),
        })
    }

    /// Open a live feed for one job. The receiver only sees messages
    /// published after this call; history is the caller's concern.
    pub async fn subscribe(&self, job_id: Uuid) -> broadcast::Receiver<Message> {
        let mut channels = self.channels.write().await;
        let sender = channels
            .entry(job_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_BUFFER).0);
        sender.subscribe()
    }

    /// Push a message to every current subscriber of the job's channel.
    /// Returns how many subscribers were reachable. A channel with no
    /// subscribers delivers nothing and is removed.
    pub async fn publish(&self, message: Message) -> usize {
        let job_id = message.job_id;
        let mut channels = self.channels.write().await;

        let delivered = match channels.get(&job_id) {
            Some(sender) => sender.send(message).unwrap_or(0),
            None => 0,
        };

        if delivered == 0 {
            channels.remove(&job_id);
            debug!(%job_id, "pruned empty message channel");
        }

        delivered
    }

    /// Number of live subscribers for a job channel.
    pub async fn subscriber_count(&self, job_id: Uuid) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(&job_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::messagemodel::MessageType;
    use chrono::Utc;

    fn message(job_id: Uuid, content: &str) -> Message {
        Message {
            id: Uuid::new_v4(),
            job_id,
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            content: content.to_string(),
            message_type: MessageType::Text,
            is_read: false,
            created_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_message() {
        let hub = ChatHub::new();
        let job_id = Uuid::new_v4();

        let mut rx = hub.subscribe(job_id).await;
        let delivered = hub.publish(message(job_id, "hello")).await;

        assert_eq!(delivered, 1);
        let received = rx.recv().await.unwrap();
        assert_eq!(received.content, "hello");
    }

    #[tokio::test]
    async fn messages_arrive_in_publish_order() {
        let hub = ChatHub::new();
        let job_id = Uuid::new_v4();

        let mut rx = hub.subscribe(job_id).await;
        for i in 0..5 {
            hub.publish(message(job_id, &format!("msg-{i}"))).await;
        }

        for i in 0..5 {
            assert_eq!(rx.recv().await.unwrap().content, format!("msg-{i}"));
        }
    }

    #[tokio::test]
    async fn unsubscribed_receiver_gets_nothing_more() {
        let hub = ChatHub::new();
        let job_id = Uuid::new_v4();

        let rx = hub.subscribe(job_id).await;
        drop(rx);

        let delivered = hub.publish(message(job_id, "after unsubscribe")).await;
        assert_eq!(delivered, 0);
        assert_eq!(hub.subscriber_count(job_id).await, 0);
    }

    #[tokio::test]
    async fn remaining_subscriber_still_served_after_one_leaves() {
        let hub = ChatHub::new();
        let job_id = Uuid::new_v4();

        let rx_gone = hub.subscribe(job_id).await;
        let mut rx_stays = hub.subscribe(job_id).await;
        drop(rx_gone);

        let delivered = hub.publish(message(job_id, "still here")).await;
        assert_eq!(delivered, 1);
        assert_eq!(rx_stays.recv().await.unwrap().content, "still here");
    }

    #[tokio::test]
    async fn channels_are_scoped_per_job() {
        let hub = ChatHub::new();
        let job_a = Uuid::new_v4();
        let job_b = Uuid::new_v4();

        let mut rx_a = hub.subscribe(job_a).await;
        let _rx_b = hub.subscribe(job_b).await;

        hub.publish(message(job_b, "for b only")).await;
        hub.publish(message(job_a, "for a only")).await;

        assert_eq!(rx_a.recv().await.unwrap().content, "for a only");
        assert!(rx_a.try_recv().is_err());
    }
}
