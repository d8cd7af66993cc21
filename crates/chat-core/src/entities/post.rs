//! Post entity - the subset of a post this layer reads and touches

use crate::value_objects::Id;

/// Post entity
///
/// Posts are owned by the messaging subsystem. Reaction mutations only
/// ever change `has_reactions` and `update_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Id,
    pub channel_id: Id,
    pub user_id: Id,
    pub message: String,
    /// Sticky: only reset by an explicit recompute
    pub has_reactions: bool,
    pub create_at: i64,
    /// Monotonic milliseconds, bumped on any visible mutation
    pub update_at: i64,
}

impl Post {
    /// Create a new Post
    pub fn new(id: Id, channel_id: Id, user_id: Id, message: impl Into<String>, now: i64) -> Self {
        Self {
            id,
            channel_id,
            user_id,
            message: message.into(),
            has_reactions: false,
            create_at: now,
            update_at: now,
        }
    }

    /// Check whether the post lives in the given channel
    #[inline]
    pub fn belongs_to(&self, channel_id: Id) -> bool {
        self.channel_id == channel_id
    }

    /// Next `update_at` value: never earlier than `now`, always later than the current one
    #[inline]
    pub fn next_update_at(&self, now: i64) -> i64 {
        now.max(self.update_at.saturating_add(1))
    }

    /// Copy of this post as it looks after any reaction change
    pub fn touched_by_reaction(&self, now: i64) -> Post {
        self.touched_at(self.next_update_at(now))
    }

    /// Copy of this post after a reaction change stamped `update_at` by the durable layer
    pub fn touched_at(&self, update_at: i64) -> Post {
        Post {
            has_reactions: true,
            update_at,
            ..self.clone()
        }
    }
}
