use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::application::ports::{
    AudioEvent, AudioEventQueue, QueueError, QueueMessage, QueueSubscriber,
};

/// In-process queue with the broker semantics the worker depends on:
/// at-least-once delivery, per-message delivery attempts, nack-driven
/// redelivery, and dead-letter routing once attempts are exhausted. Used for
/// local runs and tests; a managed broker owns these duties in production.
pub struct ChannelAudioQueue {
    tx: mpsc::UnboundedSender<Envelope>,
    next_id: AtomicU64,
}

impl ChannelAudioQueue {
    pub fn new(max_delivery_attempts: u32) -> (Self, ChannelSubscriber, DeadLetterSink) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (dead_letter_tx, dead_letter_rx) = mpsc::unbounded_channel();
        let queue = Self {
            tx: tx.clone(),
            next_id: AtomicU64::new(1),
        };
        let subscriber = ChannelSubscriber {
            rx,
            redeliver_tx: tx,
            dead_letter_tx,
            max_delivery_attempts,
        };
        let sink = DeadLetterSink { rx: dead_letter_rx };
        (queue, subscriber, sink)
    }

    /// Stop the subscription. In-flight messages finish; `next` then
    /// returns `None`.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Envelope::Shutdown);
    }
}

#[async_trait]
impl AudioEventQueue for ChannelAudioQueue {
    async fn publish(&self, event: &AudioEvent) -> Result<String, QueueError> {
        let payload = Bytes::from(
            serde_json::to_vec(event).map_err(|e| QueueError::PublishFailed(e.to_string()))?,
        );
        let id = format!("local-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let message = StoredMessage {
            id: id.clone(),
            attempt: 1,
            payload,
        };
        self.tx
            .send(Envelope::Message(message))
            .map_err(|_| QueueError::Closed)?;
        Ok(id)
    }
}

pub struct ChannelSubscriber {
    rx: mpsc::UnboundedReceiver<Envelope>,
    redeliver_tx: mpsc::UnboundedSender<Envelope>,
    dead_letter_tx: mpsc::UnboundedSender<StoredMessage>,
    max_delivery_attempts: u32,
}

#[async_trait]
impl QueueSubscriber for ChannelSubscriber {
    async fn next(&mut self) -> Option<Box<dyn QueueMessage>> {
        match self.rx.recv().await? {
            Envelope::Shutdown => None,
            Envelope::Message(inner) => Some(Box::new(ChannelMessage {
                inner,
                redeliver_tx: self.redeliver_tx.clone(),
                dead_letter_tx: self.dead_letter_tx.clone(),
                max_delivery_attempts: self.max_delivery_attempts,
            })),
        }
    }
}

/// Dead-lettered message, kept for operator inspection.
#[derive(Debug)]
pub struct DeadLetter {
    pub message_id: String,
    pub delivery_attempt: u32,
    pub payload: Bytes,
}

pub struct DeadLetterSink {
    rx: mpsc::UnboundedReceiver<StoredMessage>,
}

impl DeadLetterSink {
    pub async fn recv(&mut self) -> Option<DeadLetter> {
        self.rx.recv().await.map(|m| DeadLetter {
            message_id: m.id,
            delivery_attempt: m.attempt,
            payload: m.payload,
        })
    }

    pub fn try_recv(&mut self) -> Option<DeadLetter> {
        self.rx.try_recv().ok().map(|m| DeadLetter {
            message_id: m.id,
            delivery_attempt: m.attempt,
            payload: m.payload,
        })
    }
}

enum Envelope {
    Message(StoredMessage),
    Shutdown,
}

struct StoredMessage {
    id: String,
    attempt: u32,
    payload: Bytes,
}

struct ChannelMessage {
    inner: StoredMessage,
    redeliver_tx: mpsc::UnboundedSender<Envelope>,
    dead_letter_tx: mpsc::UnboundedSender<StoredMessage>,
    max_delivery_attempts: u32,
}

#[async_trait]
impl QueueMessage for ChannelMessage {
    fn id(&self) -> &str {
        &self.inner.id
    }

    fn delivery_attempt(&self) -> u32 {
        self.inner.attempt
    }

    fn payload(&self) -> &[u8] {
        &self.inner.payload
    }

    async fn ack(self: Box<Self>) {}

    async fn nack(self: Box<Self>) {
        let mut message = self.inner;
        if message.attempt >= self.max_delivery_attempts {
            tracing::error!(
                message_id = %message.id,
                delivery_attempt = message.attempt,
                "Delivery attempts exhausted, routing message to dead-letter sink"
            );
            let _ = self.dead_letter_tx.send(message);
        } else {
            message.attempt += 1;
            let _ = self.redeliver_tx.send(Envelope::Message(message));
        }
    }
}
