//! Broadcast event envelope
//!
//! Ephemeral: never persisted, delivered at most once.
//!
//! Wire shape:
//! `{"type": "reaction_added", "channel_id": "...", "data": {"reaction": "<json>"}}`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value_objects::Id;

/// Kind of realtime event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ReactionAdded,
    ReactionRemoved,
    PostEdited,
}

impl EventType {
    /// Wire name of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReactionAdded => "reaction_added",
            Self::ReactionRemoved => "reaction_removed",
            Self::PostEdited => "post_edited",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event addressed to every subscriber of one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub channel_id: Id,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl BroadcastEvent {
    /// Create an event with an empty payload
    #[must_use]
    pub fn new(event_type: EventType, channel_id: Id) -> Self {
        Self {
            event_type,
            channel_id,
            data: Map::new(),
        }
    }

    /// Attach a payload entry
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(EventType::ReactionAdded.as_str(), "reaction_added");
        assert_eq!(EventType::ReactionRemoved.as_str(), "reaction_removed");
        assert_eq!(EventType::PostEdited.as_str(), "post_edited");
    }

    #[test]
    fn test_envelope_shape() {
        let channel_id = Id::generate();
        let event = BroadcastEvent::new(EventType::ReactionAdded, channel_id)
            .with("reaction", "{\"emoji_name\":\"smile\"}");

        let value: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "reaction_added");
        assert_eq!(value["channel_id"], channel_id.as_str());
        assert_eq!(value["data"]["reaction"], "{\"emoji_name\":\"smile\"}");
    }
}
