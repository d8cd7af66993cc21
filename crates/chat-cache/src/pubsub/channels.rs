//! Pub/Sub channel naming for Redis fan-out.

use chat_core::Id;

/// Channel prefix for conversation events
pub const CHANNEL_PREFIX: &str = "channel:";

/// Redis channel carrying the events of one conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PubSubChannel(Id);

impl PubSubChannel {
    #[must_use]
    pub fn channel(channel_id: Id) -> Self {
        Self(channel_id)
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        format!("{CHANNEL_PREFIX}{}", self.0)
    }

    /// Parse a Redis channel name back into a conversation channel
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        name.strip_prefix(CHANNEL_PREFIX)
            .and_then(|id| Id::parse(id).ok())
            .map(Self)
    }

    #[must_use]
    pub fn channel_id(&self) -> Id {
        self.0
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{CHANNEL_PREFIX}{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name() {
        let id = Id::generate();
        let channel = PubSubChannel::channel(id);
        assert_eq!(channel.name(), format!("channel:{id}"));
        assert_eq!(channel.to_string(), channel.name());
    }

    #[test]
    fn test_parse() {
        let id = Id::generate();
        assert_eq!(
            PubSubChannel::parse(&format!("channel:{id}")),
            Some(PubSubChannel::channel(id))
        );
        assert_eq!(PubSubChannel::parse(&format!("user:{id}")), None);
        assert_eq!(PubSubChannel::parse("channel:short"), None);
    }
}
