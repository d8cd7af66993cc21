//! Realtime broadcast fan-out.
//!
//! `Publisher::publish` hands events to a single dispatcher task without
//! waiting; the dispatcher delivers each event to every configured sink.

mod channels;
mod hub;
mod publisher;
mod redis_sink;
mod sink;

pub use channels::{PubSubChannel, CHANNEL_PREFIX};
pub use hub::{LocalHub, Subscription};
pub use publisher::{Publisher, PublisherConfig};
pub use redis_sink::RedisSink;
pub use sink::{EventSink, PublishError};
