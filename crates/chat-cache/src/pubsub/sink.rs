use async_trait::async_trait;
use chat_core::BroadcastEvent;

use crate::pool::RedisPoolError;

/// Errors raised while delivering a broadcast
///
/// These are logged by the dispatcher and never reach the request that
/// produced the event.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] RedisPoolError),

    #[error("Broadcast queue is full")]
    QueueFull,

    #[error("Broadcast dispatcher is not running")]
    Closed,
}

impl From<redis::RedisError> for PublishError {
    fn from(e: redis::RedisError) -> Self {
        Self::Redis(RedisPoolError::Redis(e))
    }
}

/// Destination for broadcast events
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Deliver one event to every recipient this sink knows about
    async fn deliver(&self, event: &BroadcastEvent) -> Result<(), PublishError>;
}
