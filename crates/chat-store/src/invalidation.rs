//! Explicit record of the cache state a write made stale

use std::fmt;

use chat_core::Id;

/// One cached entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Reaction list of a post
    PostReactions(Id),
    /// Recent post list of a channel
    ChannelPosts(Id),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostReactions(id) => write!(f, "reactions:{id}"),
            Self::ChannelPosts(id) => write!(f, "channel_posts:{id}"),
        }
    }
}

/// A whole cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScope {
    Reactions,
    ChannelPosts,
}

/// What a write invalidated before its future resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    None,
    Key(CacheKey),
    All(CacheScope),
}

impl Invalidation {
    /// Whether a read of `key` is guaranteed to miss after this invalidation
    pub fn covers(&self, key: CacheKey) -> bool {
        match (self, key) {
            (Self::None, _) => false,
            (Self::Key(k), key) => *k == key,
            (Self::All(CacheScope::Reactions), CacheKey::PostReactions(_))
            | (Self::All(CacheScope::ChannelPosts), CacheKey::ChannelPosts(_)) => true,
            (Self::All(_), _) => false,
        }
    }
}

/// Payload of a successful write together with its invalidation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<T> {
    pub value: T,
    pub invalidated: Invalidation,
    /// `update_at` the write left on the reacted post, if it touched one
    pub post_update_at: Option<i64>,
}

impl<T> Committed<T> {
    pub fn new(value: T, invalidated: Invalidation) -> Self {
        Self {
            value,
            invalidated,
            post_update_at: None,
        }
    }

    pub fn with_post_update_at(mut self, post_update_at: Option<i64>) -> Self {
        self.post_update_at = post_update_at;
        self
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
