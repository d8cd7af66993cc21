use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, instrument};

use chat_core::{
    now_millis, ChannelMember, ChannelRepository, DomainError, Id, Post, PostRepository,
    Reaction, ReactionRepository, ReactionWrite, RepoResult,
};

/// Natural key of a reaction row
type ReactionKey = (Id, Id, String);

#[derive(Default)]
struct Tables {
    posts: RwLock<HashMap<Id, Post>>,
    reactions: Mutex<BTreeMap<ReactionKey, Reaction>>,
    members: RwLock<HashSet<(Id, Id)>>,
}

#[derive(Default)]
struct Inner {
    tables: Tables,
    calls: AtomicU64,
    failing: AtomicBool,
}

/// Shared in-memory backend; clones share the same tables
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repository calls made so far
    pub fn calls(&self) -> u64 {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.inner.calls.store(0, Ordering::SeqCst);
    }

    /// Make every subsequent repository call fail with a database error
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Seed a post; not counted as a repository call
    pub fn insert_post(&self, post: Post) {
        self.inner.tables.posts.write().insert(post.id, post);
    }

    /// Seed a membership row; not counted as a repository call
    pub fn add_member(&self, member: ChannelMember) {
        self.inner
            .tables
            .members
            .write()
            .insert((member.channel_id, member.user_id));
    }

    /// Inspect a post without counting a call
    pub fn post(&self, id: Id) -> Option<Post> {
        self.inner.tables.posts.read().get(&id).cloned()
    }

    /// Inspect the stored reactions for a post without counting a call
    pub fn reactions_for(&self, post_id: Id) -> Vec<Reaction> {
        let mut rows: Vec<Reaction> = self
            .inner
            .tables
            .reactions
            .lock()
            .values()
            .filter(|r| r.post_id == post_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.create_at);
        rows
    }

    fn enter(&self, op: &'static str) -> RepoResult<()> {
        let n = self.inner.calls.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(op, calls = n, "memory backend call");
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError(format!(
                "injected failure in {op}"
            )));
        }
        Ok(())
    }

    /// Bump `update_at` and recompute `has_reactions` for one post
    fn refresh_post(
        &self,
        reactions: &BTreeMap<ReactionKey, Reaction>,
        post_id: Id,
        now: i64,
    ) -> Option<i64> {
        let mut posts = self.inner.tables.posts.write();
        let post = posts.get_mut(&post_id)?;
        post.update_at = post.next_update_at(now);
        post.has_reactions = reactions.values().any(|r| r.post_id == post_id);
        Some(post.update_at)
    }
}

fn key_of(reaction: &Reaction) -> ReactionKey {
    (reaction.post_id, reaction.user_id, reaction.emoji_name.clone())
}

#[async_trait]
impl ReactionRepository for MemoryBackend {
    #[instrument(skip(self))]
    async fn save(&self, reaction: &Reaction) -> RepoResult<ReactionWrite<Reaction>> {
        self.enter("reaction.save")?;

        let mut reactions = self.inner.tables.reactions.lock();
        let stored = reactions
            .entry(key_of(reaction))
            .or_insert_with(|| {
                let mut fresh = reaction.clone();
                fresh.pre_save();
                fresh
            })
            .clone();

        let mut posts = self.inner.tables.posts.write();
        let post_update_at = posts.get_mut(&reaction.post_id).map(|post| {
            post.has_reactions = true;
            post.update_at = post.next_update_at(now_millis());
            post.update_at
        });

        Ok(ReactionWrite::new(stored, post_update_at))
    }

    #[instrument(skip(self))]
    async fn delete(&self, reaction: &Reaction) -> RepoResult<ReactionWrite<()>> {
        self.enter("reaction.delete")?;

        let mut reactions = self.inner.tables.reactions.lock();
        reactions.remove(&key_of(reaction));
        let post_update_at = self.refresh_post(&reactions, reaction.post_id, now_millis());

        Ok(ReactionWrite::new((), post_update_at))
    }

    #[instrument(skip(self))]
    async fn delete_all_with_emoji_name(&self, emoji_name: &str) -> RepoResult<u64> {
        self.enter("reaction.delete_all_with_emoji_name")?;

        let mut reactions = self.inner.tables.reactions.lock();
        let mut affected = HashSet::new();
        let mut removed = 0u64;
        reactions.retain(|_, r| {
            if r.emoji_name == emoji_name {
                affected.insert(r.post_id);
                removed += 1;
                false
            } else {
                true
            }
        });

        let now = now_millis();
        for post_id in affected {
            self.refresh_post(&reactions, post_id, now);
        }

        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn find_by_post(&self, post_id: Id) -> RepoResult<Vec<Reaction>> {
        self.enter("reaction.find_by_post")?;
        Ok(self.reactions_for(post_id))
    }
}

#[async_trait]
impl PostRepository for MemoryBackend {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<Post>> {
        self.enter("post.find_by_id")?;
        Ok(self.post(id))
    }

    #[instrument(skip(self))]
    async fn find_by_channel(&self, channel_id: Id, limit: i64) -> RepoResult<Vec<Post>> {
        self.enter("post.find_by_channel")?;

        let mut posts: Vec<Post> = self
            .inner
            .tables
            .posts
            .read()
            .values()
            .filter(|p| p.belongs_to(channel_id))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.create_at.cmp(&a.create_at));
        posts.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));

        Ok(posts)
    }
}

#[async_trait]
impl ChannelRepository for MemoryBackend {
    #[instrument(skip(self))]
    async fn is_member(&self, channel_id: Id, user_id: Id) -> RepoResult<bool> {
        self.enter("channel.is_member")?;
        Ok(self
            .inner
            .tables
            .members
            .read()
            .contains(&(channel_id, user_id)))
    }
}
