//! Redis Pub/Sub sink for multi-instance fan-out.

use async_trait::async_trait;
use chat_core::BroadcastEvent;
use redis::AsyncCommands;

use super::channels::PubSubChannel;
use super::sink::{EventSink, PublishError};
use crate::pool::RedisPool;

/// Publishes each event's JSON envelope to `channel:<id>`
#[derive(Debug, Clone)]
pub struct RedisSink {
    pool: RedisPool,
}

impl RedisSink {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventSink for RedisSink {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn deliver(&self, event: &BroadcastEvent) -> Result<(), PublishError> {
        let channel = PubSubChannel::channel(event.channel_id);
        let payload = event.to_json()?;

        let mut conn = self.pool.get().await?;
        let receivers: u32 = conn.publish(channel.name(), payload).await?;

        tracing::debug!(
            channel = %channel,
            event_type = %event.event_type,
            receivers,
            "Published event"
        );

        Ok(())
    }
}
