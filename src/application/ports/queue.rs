use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Payload of an object-finalized event, matching the storage notification
/// format (`name` is the object key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioEvent {
    #[serde(rename = "name")]
    pub object_key: String,
    pub bucket: String,
}

#[async_trait]
pub trait AudioEventQueue: Send + Sync {
    /// Publish an event, returning the broker-assigned message id.
    async fn publish(&self, event: &AudioEvent) -> Result<String, QueueError>;
}

/// One delivered message. Exactly one of `ack`/`nack` must be called;
/// nacking makes the broker redeliver or dead-letter the message.
#[async_trait]
pub trait QueueMessage: Send {
    fn id(&self) -> &str;

    fn delivery_attempt(&self) -> u32;

    fn payload(&self) -> &[u8];

    async fn ack(self: Box<Self>);

    async fn nack(self: Box<Self>);
}

#[async_trait]
pub trait QueueSubscriber: Send {
    /// Next delivery, or `None` once the subscription is shut down.
    async fn next(&mut self) -> Option<Box<dyn QueueMessage>>;
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("publish failed: {0}")]
    PublishFailed(String),
    #[error("subscription closed")]
    Closed,
}
