//! Realtime events broadcast to conversation subscribers

mod broadcast_event;

pub use broadcast_event::{BroadcastEvent, EventType};
