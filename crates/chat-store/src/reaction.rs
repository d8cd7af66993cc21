//! Reaction store

use std::sync::Arc;

use chat_cache::{CacheConfig, CacheLayer, CacheStats};
use chat_core::{Id, Reaction, ReactionRepository};
use tracing::{debug, info, instrument};

use crate::future::StoreFuture;
use crate::invalidation::{CacheKey, CacheScope, Committed, Invalidation};

/// Reaction operations with a per-post read-through cache
///
/// Every write invalidates the affected cache entries before its future
/// resolves, whether or not the durable write succeeded.
#[derive(Clone)]
pub struct ReactionStore {
    repo: Arc<dyn ReactionRepository>,
    cache: Arc<CacheLayer<Id, Vec<Reaction>>>,
}

impl ReactionStore {
    pub fn new(repo: Arc<dyn ReactionRepository>, cache: CacheConfig) -> Self {
        Self {
            repo,
            cache: Arc::new(CacheLayer::new("reactions", cache)),
        }
    }

    /// Persist a reaction; re-saving an existing key returns the stored row
    #[instrument(skip(self), fields(post_id = %reaction.post_id, emoji = %reaction.emoji_name))]
    pub fn save(&self, reaction: Reaction) -> StoreFuture<Committed<Reaction>> {
        let store = self.clone();
        StoreFuture::issue(async move {
            let result = store.repo.save(&reaction).await;
            let invalidated = store.invalidate_post(reaction.post_id);
            let write = result?;
            let saved = write.value;

            info!(
                post_id = %saved.post_id,
                user_id = %saved.user_id,
                emoji = %saved.emoji_name,
                "Reaction saved"
            );
            Ok(Committed::new(saved, invalidated).with_post_update_at(write.post_update_at))
        })
    }

    /// Remove a reaction; removing an absent one succeeds
    #[instrument(skip(self), fields(post_id = %reaction.post_id, emoji = %reaction.emoji_name))]
    pub fn delete(&self, reaction: Reaction) -> StoreFuture<Committed<()>> {
        let store = self.clone();
        StoreFuture::issue(async move {
            let result = store.repo.delete(&reaction).await;
            let invalidated = store.invalidate_post(reaction.post_id);
            let write = result?;

            info!(
                post_id = %reaction.post_id,
                user_id = %reaction.user_id,
                emoji = %reaction.emoji_name,
                "Reaction deleted"
            );
            Ok(Committed::new((), invalidated).with_post_update_at(write.post_update_at))
        })
    }

    /// Remove every reaction using an emoji, on every post
    ///
    /// The affected posts are not known up front, so the whole cache goes.
    #[instrument(skip(self))]
    pub fn delete_all_with_emoji_name(&self, emoji_name: &str) -> StoreFuture<Committed<u64>> {
        let store = self.clone();
        let emoji_name = emoji_name.to_string();
        StoreFuture::issue(async move {
            let result = store.repo.delete_all_with_emoji_name(&emoji_name).await;
            store.invalidate_cache();
            let removed = result?;

            info!(emoji = %emoji_name, removed, "Reactions purged");
            Ok(Committed::new(removed, Invalidation::All(CacheScope::Reactions)))
        })
    }

    /// Reactions on a post ordered by creation time
    #[instrument(skip(self))]
    pub fn get_for_post(&self, post_id: Id, allow_cache_hit: bool) -> StoreFuture<Vec<Reaction>> {
        let store = self.clone();
        StoreFuture::issue(async move {
            if allow_cache_hit {
                if let Some(cached) = store.cache.get(&post_id) {
                    return Ok(cached);
                }
            }

            let token = store.cache.read_token(&post_id);
            let reactions = store.repo.find_by_post(post_id).await?;
            if store.cache.populate(post_id, reactions.clone(), token) {
                debug!(post_id = %post_id, count = reactions.len(), "Reaction cache populated");
            }
            Ok(reactions)
        })
    }

    pub fn invalidate_cache_for_post(&self, post_id: Id) {
        self.invalidate_post(post_id);
    }

    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn invalidate_post(&self, post_id: Id) -> Invalidation {
        self.cache.invalidate(&post_id);
        Invalidation::Key(CacheKey::PostReactions(post_id))
    }
}

impl std::fmt::Debug for ReactionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactionStore")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
