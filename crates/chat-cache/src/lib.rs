//! # chat-cache
//!
//! Caching and realtime fan-out.
//!
//! ## Features
//!
//! - **Cache Layer**: generation-guarded in-process read-through caches
//! - **Publisher**: non-blocking broadcast queue drained by one dispatcher task
//! - **Sinks**: in-process subscriber hub and Redis Pub/Sub for other instances
//!
//! ## Example
//!
//! ```ignore
//! use chat_cache::{LocalHub, Publisher, PublisherConfig, RedisPool, RedisSink};
//!
//! let hub = LocalHub::new_shared(64);
//! let redis = RedisSink::new(RedisPool::new(Default::default())?);
//! let publisher = Publisher::start(vec![hub.clone(), Arc::new(redis)], &PublisherConfig::default());
//!
//! let mut subscription = hub.subscribe(channel_id);
//! publisher.publish(BroadcastEvent::new(EventType::ReactionAdded, channel_id));
//! ```

pub mod layer;
pub mod pool;
pub mod pubsub;

pub use layer::{CacheConfig, CacheLayer, CacheStats, ReadToken};
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use pubsub::{
    EventSink, LocalHub, PubSubChannel, PublishError, Publisher, PublisherConfig, RedisSink,
    Subscription, CHANNEL_PREFIX,
};
