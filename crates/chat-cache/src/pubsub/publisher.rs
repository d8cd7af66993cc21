//! Non-blocking broadcast publisher.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chat_core::BroadcastEvent;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use super::sink::{EventSink, PublishError};

/// Publisher configuration
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Events buffered between callers and the dispatcher, and again per sink
    pub queue_capacity: usize,
    /// Longest a sink may take over one event before it is skipped
    pub delivery_timeout: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            delivery_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&chat_common::BroadcastConfig> for PublisherConfig {
    fn from(config: &chat_common::BroadcastConfig) -> Self {
        Self {
            queue_capacity: config.queue_capacity,
            delivery_timeout: Duration::from_millis(config.delivery_timeout_ms),
        }
    }
}

/// Broadcast publisher
///
/// Cloning is cheap; every clone feeds the same dispatcher, so events
/// published through one handle reach each sink in publish order. Every sink
/// drains its own queue on its own task, so a sink that hangs only loses its
/// own events.
#[derive(Clone)]
pub struct Publisher {
    tx: mpsc::Sender<BroadcastEvent>,
    dropped: Arc<AtomicU64>,
}

/// Queue feeding one sink's delivery task
struct Lane {
    sink: &'static str,
    tx: mpsc::Sender<BroadcastEvent>,
}

impl Publisher {
    /// Start the dispatcher and one delivery task per sink on the current runtime
    ///
    /// Without a runtime the publisher still works but drops every event.
    pub fn start(sinks: Vec<Arc<dyn EventSink>>, config: &PublisherConfig) -> Self {
        let capacity = config.queue_capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        let dropped = Arc::new(AtomicU64::new(0));

        match Handle::try_current() {
            Ok(handle) => {
                info!(
                    sinks = sinks.len(),
                    queue_capacity = config.queue_capacity,
                    delivery_timeout_ms = config.delivery_timeout.as_millis() as u64,
                    "Broadcast dispatcher started"
                );
                let lanes = sinks
                    .into_iter()
                    .map(|sink| {
                        let (lane_tx, lane_rx) = mpsc::channel(capacity);
                        let name = sink.name();
                        handle.spawn(deliver(lane_rx, sink, config.delivery_timeout));
                        Lane { sink: name, tx: lane_tx }
                    })
                    .collect();
                handle.spawn(dispatch(rx, lanes, dropped.clone()));
            }
            Err(_) => {
                error!("No async runtime; broadcasts will be dropped");
            }
        }

        Self { tx, dropped }
    }

    /// Enqueue an event for delivery without waiting
    ///
    /// Failures are logged and counted, never returned: a broadcast that
    /// cannot be queued must not fail the request that produced it.
    pub fn publish(&self, event: BroadcastEvent) {
        if let Err(e) = self.try_publish(event) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(error = %e, "Broadcast dropped");
        }
    }

    fn try_publish(&self, event: BroadcastEvent) -> Result<(), PublishError> {
        self.tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => PublishError::QueueFull,
            TrySendError::Closed(_) => PublishError::Closed,
        })
    }

    /// Events dropped, counted once per sink that missed them, plus those
    /// refused before reaching the dispatcher
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("capacity", &self.tx.capacity())
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// Dispatcher loop: hands each event to every sink's queue without waiting
async fn dispatch(
    mut rx: mpsc::Receiver<BroadcastEvent>,
    lanes: Vec<Lane>,
    dropped: Arc<AtomicU64>,
) {
    while let Some(event) = rx.recv().await {
        for lane in &lanes {
            if let Err(e) = lane.tx.try_send(event.clone()) {
                dropped.fetch_add(1, Ordering::Relaxed);
                let reason = match e {
                    TrySendError::Full(_) => PublishError::QueueFull,
                    TrySendError::Closed(_) => PublishError::Closed,
                };
                warn!(
                    sink = lane.sink,
                    channel_id = %event.channel_id,
                    event_type = %event.event_type,
                    error = %reason,
                    "Broadcast dropped for sink"
                );
            }
        }
    }

    info!("Broadcast dispatcher stopped");
}

/// Delivery loop for one sink
async fn deliver(
    mut rx: mpsc::Receiver<BroadcastEvent>,
    sink: Arc<dyn EventSink>,
    delivery_timeout: Duration,
) {
    while let Some(event) = rx.recv().await {
        match tokio::time::timeout(delivery_timeout, sink.deliver(&event)).await {
            Ok(Ok(())) => debug!(
                sink = sink.name(),
                channel_id = %event.channel_id,
                event_type = %event.event_type,
                "Broadcast delivered"
            ),
            Ok(Err(e)) => warn!(
                sink = sink.name(),
                channel_id = %event.channel_id,
                event_type = %event.event_type,
                error = %e,
                "Broadcast delivery failed"
            ),
            Err(_) => warn!(
                sink = sink.name(),
                channel_id = %event.channel_id,
                event_type = %event.event_type,
                timeout_ms = delivery_timeout.as_millis() as u64,
                "Broadcast delivery timed out"
            ),
        }
    }

    debug!(sink = sink.name(), "Broadcast sink stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubsub::LocalHub;
    use async_trait::async_trait;
    use chat_core::{EventType, Id};
    use tokio::sync::Notify;

    /// Sink that blocks until released
    struct GateSink {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl EventSink for GateSink {
        fn name(&self) -> &'static str {
            "gate"
        }

        async fn deliver(&self, _event: &BroadcastEvent) -> Result<(), PublishError> {
            self.gate.notified().await;
            Ok(())
        }
    }

    /// Sink that never finishes a delivery
    struct HungSink;

    #[async_trait]
    impl EventSink for HungSink {
        fn name(&self) -> &'static str {
            "hung"
        }

        async fn deliver(&self, _event: &BroadcastEvent) -> Result<(), PublishError> {
            std::future::pending().await
        }
    }

    /// Sink that hangs on reaction events and forwards everything else
    struct SelectiveSink {
        forwarded: mpsc::UnboundedSender<EventType>,
    }

    #[async_trait]
    impl EventSink for SelectiveSink {
        fn name(&self) -> &'static str {
            "selective"
        }

        async fn deliver(&self, event: &BroadcastEvent) -> Result<(), PublishError> {
            if event.event_type == EventType::ReactionAdded {
                std::future::pending::<()>().await;
            }
            self.forwarded
                .send(event.event_type)
                .map_err(|_| PublishError::Closed)
        }
    }

    struct FailingSink;

    #[async_trait]
    impl EventSink for FailingSink {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn deliver(&self, _event: &BroadcastEvent) -> Result<(), PublishError> {
            Err(PublishError::Closed)
        }
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let hub = LocalHub::new_shared(16);
        let channel = Id::generate();
        let mut sub = hub.subscribe(channel);
        let sinks: Vec<Arc<dyn EventSink>> = vec![hub.clone()];
        let publisher = Publisher::start(sinks, &PublisherConfig::default());

        publisher.publish(BroadcastEvent::new(EventType::ReactionAdded, channel));
        publisher.publish(BroadcastEvent::new(EventType::PostEdited, channel));

        assert_eq!(sub.recv().await.unwrap().event_type, EventType::ReactionAdded);
        assert_eq!(sub.recv().await.unwrap().event_type, EventType::PostEdited);
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_stop_others() {
        let hub = LocalHub::new_shared(16);
        let channel = Id::generate();
        let mut sub = hub.subscribe(channel);
        let sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(FailingSink), hub.clone()];
        let publisher = Publisher::start(sinks, &PublisherConfig::default());

        publisher.publish(BroadcastEvent::new(EventType::ReactionRemoved, channel));

        let received = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.event_type, EventType::ReactionRemoved);
    }

    #[tokio::test]
    async fn test_blocked_sink_never_blocks_publish() {
        let gate = Arc::new(Notify::new());
        let sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(GateSink { gate: gate.clone() })];
        let config = PublisherConfig {
            queue_capacity: 2,
            ..PublisherConfig::default()
        };
        let publisher = Publisher::start(sinks, &config);
        let channel = Id::generate();

        // One event blocks in the sink and two wait in its queue; the rest
        // are dropped either at publish or by the dispatcher
        for _ in 0..10 {
            publisher.publish(BroadcastEvent::new(EventType::ReactionAdded, channel));
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(publisher.dropped() >= 7);
        gate.notify_waiters();
    }

    #[tokio::test]
    async fn test_hung_sink_does_not_block_local_delivery() {
        let hub = LocalHub::new_shared(16);
        let first = Id::generate();
        let second = Id::generate();
        let mut first_sub = hub.subscribe(first);
        let mut second_sub = hub.subscribe(second);
        let sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(HungSink), hub.clone()];
        let publisher = Publisher::start(sinks, &PublisherConfig::default());

        publisher.publish(BroadcastEvent::new(EventType::ReactionAdded, first));
        publisher.publish(BroadcastEvent::new(EventType::ReactionAdded, second));
        publisher.publish(BroadcastEvent::new(EventType::PostEdited, second));

        let received = tokio::time::timeout(Duration::from_secs(1), first_sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.channel_id, first);

        for expected in [EventType::ReactionAdded, EventType::PostEdited] {
            let received = tokio::time::timeout(Duration::from_secs(1), second_sub.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(received.event_type, expected);
        }
    }

    #[tokio::test]
    async fn test_timed_out_delivery_moves_on() {
        let (forwarded_tx, mut forwarded) = mpsc::unbounded_channel();
        let sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(SelectiveSink {
            forwarded: forwarded_tx,
        })];
        let config = PublisherConfig {
            delivery_timeout: Duration::from_millis(20),
            ..PublisherConfig::default()
        };
        let publisher = Publisher::start(sinks, &config);
        let channel = Id::generate();

        publisher.publish(BroadcastEvent::new(EventType::ReactionAdded, channel));
        publisher.publish(BroadcastEvent::new(EventType::PostEdited, channel));

        let next = tokio::time::timeout(Duration::from_secs(1), forwarded.recv())
            .await
            .unwrap();
        assert_eq!(next, Some(EventType::PostEdited));
    }

    #[test]
    fn test_without_runtime_events_are_dropped() {
        let config = PublisherConfig {
            queue_capacity: 1,
            ..PublisherConfig::default()
        };
        let publisher = Publisher::start(Vec::new(), &config);
        let channel = Id::generate();

        // The receiver was dropped with the unspawned dispatcher
        publisher.publish(BroadcastEvent::new(EventType::ReactionAdded, channel));
        assert_eq!(publisher.dropped(), 1);
    }
}
