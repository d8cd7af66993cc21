//! In-process subscriber registry

use std::sync::Arc;

use async_trait::async_trait;
use chat_core::{BroadcastEvent, Id};
use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use super::sink::{EventSink, PublishError};

/// Connection registry keyed by conversation
///
/// Each subscriber owns a bounded queue. Delivery never waits: a subscriber
/// whose queue is full misses the event, and one that has gone away is
/// removed on the next delivery to its channel.
pub struct LocalHub {
    subscribers: DashMap<Id, Vec<mpsc::Sender<Arc<BroadcastEvent>>>>,
    buffer: usize,
}

/// Receiving end of one subscription
#[derive(Debug)]
pub struct Subscription {
    channel_id: Id,
    rx: mpsc::Receiver<Arc<BroadcastEvent>>,
}

impl Subscription {
    pub fn channel_id(&self) -> Id {
        self.channel_id
    }

    /// Wait for the next event; `None` once the hub is gone
    pub async fn recv(&mut self) -> Option<Arc<BroadcastEvent>> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Arc<BroadcastEvent>> {
        self.rx.try_recv().ok()
    }
}

impl LocalHub {
    pub fn new(buffer: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            buffer: buffer.max(1),
        }
    }

    pub fn new_shared(buffer: usize) -> Arc<Self> {
        Arc::new(Self::new(buffer))
    }

    /// Register a new subscriber for a conversation
    pub fn subscribe(&self, channel_id: Id) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        self.subscribers.entry(channel_id).or_default().push(tx);
        debug!(channel_id = %channel_id, "subscriber added");
        Subscription { channel_id, rx }
    }

    /// Live subscribers of a conversation
    pub fn subscriber_count(&self, channel_id: Id) -> usize {
        self.subscribers
            .get(&channel_id)
            .map_or(0, |senders| senders.iter().filter(|tx| !tx.is_closed()).count())
    }

    fn fan_out(&self, event: &Arc<BroadcastEvent>) -> usize {
        let Some(mut senders) = self.subscribers.get_mut(&event.channel_id) else {
            return 0;
        };

        let mut delivered = 0;
        senders.retain(|tx| match tx.try_send(Arc::clone(event)) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!(
                    channel_id = %event.channel_id,
                    event_type = %event.event_type,
                    "subscriber queue full, event dropped"
                );
                true
            }
            Err(TrySendError::Closed(_)) => false,
        });
        let now_empty = senders.is_empty();
        drop(senders);

        if now_empty {
            self.subscribers
                .remove_if(&event.channel_id, |_, senders| senders.is_empty());
        }
        delivered
    }
}

impl std::fmt::Debug for LocalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalHub")
            .field("channels", &self.subscribers.len())
            .field("buffer", &self.buffer)
            .finish()
    }
}

#[async_trait]
impl EventSink for LocalHub {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn deliver(&self, event: &BroadcastEvent) -> Result<(), PublishError> {
        let delivered = self.fan_out(&Arc::new(event.clone()));
        debug!(
            channel_id = %event.channel_id,
            event_type = %event.event_type,
            delivered,
            "delivered locally"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::EventType;

    fn event(channel_id: Id) -> BroadcastEvent {
        BroadcastEvent::new(EventType::ReactionAdded, channel_id)
    }

    #[tokio::test]
    async fn test_delivers_to_channel_subscribers_only() {
        let hub = LocalHub::new(8);
        let channel = Id::generate();
        let mut a = hub.subscribe(channel);
        let mut b = hub.subscribe(channel);
        let mut other = hub.subscribe(Id::generate());

        hub.deliver(&event(channel)).await.unwrap();

        assert_eq!(a.recv().await.unwrap().channel_id, channel);
        assert_eq!(b.recv().await.unwrap().channel_id, channel);
        assert!(other.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_no_subscribers_is_noop() {
        let hub = LocalHub::new(8);
        hub.deliver(&event(Id::generate())).await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_subscribers_are_pruned() {
        let hub = LocalHub::new(8);
        let channel = Id::generate();
        let sub = hub.subscribe(channel);
        assert_eq!(hub.subscriber_count(channel), 1);

        drop(sub);
        hub.deliver(&event(channel)).await.unwrap();
        assert_eq!(hub.subscriber_count(channel), 0);
        assert_eq!(hub.subscribers.len(), 0);
    }

    #[tokio::test]
    async fn test_full_subscriber_misses_event() {
        let hub = LocalHub::new(1);
        let channel = Id::generate();
        let mut sub = hub.subscribe(channel);

        hub.deliver(&event(channel)).await.unwrap();
        hub.deliver(&event(channel)).await.unwrap();

        assert!(sub.try_recv().is_some());
        assert!(sub.try_recv().is_none());
        assert_eq!(hub.subscriber_count(channel), 1);
    }
}
