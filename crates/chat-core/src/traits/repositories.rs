//! Repository traits (ports) - the durable layer's interface
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! Implementations live in `chat-db`; the caching, future-returning entity
//! stores in `chat-store` wrap them.

use async_trait::async_trait;

use crate::entities::{Post, Reaction};
use crate::error::DomainError;
use crate::value_objects::Id;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Outcome of a reaction write together with the post row it touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionWrite<T> {
    pub value: T,
    /// The post's `update_at` as written in the same transaction; `None`
    /// when the post row does not exist
    pub post_update_at: Option<i64>,
}

impl<T> ReactionWrite<T> {
    pub fn new(value: T, post_update_at: Option<i64>) -> Self {
        Self {
            value,
            post_update_at,
        }
    }
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Persist a reaction, returning the stored row
    ///
    /// Re-saving an existing natural key returns the existing row unchanged.
    /// Marks the post as having reactions and bumps its `update_at` in the
    /// same transaction.
    async fn save(&self, reaction: &Reaction) -> RepoResult<ReactionWrite<Reaction>>;

    /// Remove a reaction; absent rows are not an error
    ///
    /// Bumps the post's `update_at` and recomputes `has_reactions`.
    async fn delete(&self, reaction: &Reaction) -> RepoResult<ReactionWrite<()>>;

    /// Remove every reaction with the given emoji name across all posts
    async fn delete_all_with_emoji_name(&self, emoji_name: &str) -> RepoResult<u64>;

    /// All reactions for a post ordered by `create_at`
    async fn find_by_post(&self, post_id: Id) -> RepoResult<Vec<Reaction>>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Post>>;

    /// Most recent posts of a channel, newest first
    async fn find_by_channel(&self, channel_id: Id, limit: i64) -> RepoResult<Vec<Post>>;
}

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Check whether a user is a member of a channel
    async fn is_member(&self, channel_id: Id, user_id: Id) -> RepoResult<bool>;
}
