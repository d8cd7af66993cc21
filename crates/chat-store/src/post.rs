//! Post store

use std::sync::Arc;

use chat_cache::{CacheConfig, CacheLayer, CacheStats};
use chat_core::{DomainError, Id, Post, PostRepository};
use tracing::{debug, instrument};

use crate::future::StoreFuture;

/// Recent posts of a channel and the limit they were read with
#[derive(Clone)]
struct RecentPosts {
    limit: usize,
    posts: Arc<Vec<Post>>,
}

/// Post lookups with a per-channel cache of recent posts
#[derive(Clone)]
pub struct PostStore {
    repo: Arc<dyn PostRepository>,
    channel_posts: Arc<CacheLayer<Id, RecentPosts>>,
}

impl PostStore {
    pub fn new(repo: Arc<dyn PostRepository>, cache: CacheConfig) -> Self {
        Self {
            repo,
            channel_posts: Arc::new(CacheLayer::new("channel_posts", cache)),
        }
    }

    /// Fetch one post; always read from the durable layer
    #[instrument(skip(self))]
    pub fn get(&self, post_id: Id) -> StoreFuture<Post> {
        let repo = Arc::clone(&self.repo);
        StoreFuture::issue(async move {
            repo.find_by_id(post_id)
                .await?
                .ok_or(DomainError::PostNotFound(post_id))
        })
    }

    /// Most recent posts of a channel, newest first
    #[instrument(skip(self))]
    pub fn get_for_channel(
        &self,
        channel_id: Id,
        limit: i64,
        allow_cache_hit: bool,
    ) -> StoreFuture<Arc<Vec<Post>>> {
        let store = self.clone();
        StoreFuture::issue(async move {
            let wanted = usize::try_from(limit).unwrap_or(0);
            if allow_cache_hit {
                if let Some(cached) = store.channel_posts.get(&channel_id) {
                    if cached.limit == wanted {
                        return Ok(cached.posts);
                    }
                    if cached.limit > wanted {
                        return Ok(Arc::new(cached.posts.iter().take(wanted).cloned().collect()));
                    }
                }
            }

            let token = store.channel_posts.read_token(&channel_id);
            let posts = Arc::new(store.repo.find_by_channel(channel_id, limit).await?);
            let entry = RecentPosts {
                limit: wanted,
                posts: Arc::clone(&posts),
            };
            if store.channel_posts.populate(channel_id, entry, token) {
                debug!(channel_id = %channel_id, count = posts.len(), "Channel post cache populated");
            }
            Ok(posts)
        })
    }

    pub fn invalidate_cache_for_channel_posts(&self, channel_id: Id) {
        self.channel_posts.invalidate(&channel_id);
    }

    pub fn invalidate_cache(&self) {
        self.channel_posts.invalidate_all();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.channel_posts.stats()
    }
}

impl std::fmt::Debug for PostStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostStore")
            .field("channel_posts", &self.channel_posts)
            .finish_non_exhaustive()
    }
}
