//! Store facade

use std::sync::Arc;

use chat_cache::CacheConfig;
use chat_core::{ChannelRepository, PostRepository, ReactionRepository};

use crate::channel::ChannelStore;
use crate::post::PostStore;
use crate::reaction::ReactionStore;

/// Entry point to every entity store
///
/// Built once at startup and handed to whoever needs data access; clones
/// share the same caches.
#[derive(Clone, Debug)]
pub struct Store {
    reaction: ReactionStore,
    post: PostStore,
    channel: ChannelStore,
}

impl Store {
    pub fn new(
        reactions: Arc<dyn ReactionRepository>,
        posts: Arc<dyn PostRepository>,
        channels: Arc<dyn ChannelRepository>,
        cache: CacheConfig,
    ) -> Self {
        Self {
            reaction: ReactionStore::new(reactions, cache),
            post: PostStore::new(posts, cache),
            channel: ChannelStore::new(channels),
        }
    }

    /// Build every store over one backend implementing all repositories
    pub fn from_backend<B>(backend: B, cache: CacheConfig) -> Self
    where
        B: ReactionRepository + PostRepository + ChannelRepository + Clone + 'static,
    {
        Self::new(
            Arc::new(backend.clone()),
            Arc::new(backend.clone()),
            Arc::new(backend),
            cache,
        )
    }

    pub fn reaction(&self) -> &ReactionStore {
        &self.reaction
    }

    pub fn post(&self) -> &PostStore {
        &self.post
    }

    pub fn channel(&self) -> &ChannelStore {
        &self.channel
    }
}
