//! Store behaviour over the in-memory durable backend

use chat_cache::CacheConfig;
use chat_core::{ChannelMember, DomainError, Id, Post, Reaction};
use chat_db::MemoryBackend;
use chat_store::{CacheKey, CacheScope, Invalidation, Store};

struct Fixture {
    backend: MemoryBackend,
    store: Store,
    post: Post,
}

fn fixture() -> Fixture {
    let backend = MemoryBackend::new();
    let post = Post::new(Id::generate(), Id::generate(), Id::generate(), "hello", 1_000);
    backend.insert_post(post.clone());
    let store = Store::from_backend(backend.clone(), CacheConfig::default());
    Fixture {
        backend,
        store,
        post,
    }
}

#[tokio::test]
async fn test_save_invalidates_before_resolving() {
    let f = fixture();
    let reactions = f.store.reaction();

    // Warm the cache with the empty list
    assert!(reactions.get_for_post(f.post.id, true).await.unwrap().is_empty());
    assert!(reactions.get_for_post(f.post.id, true).await.unwrap().is_empty());
    assert_eq!(reactions.cache_stats().hits, 1);

    let committed = reactions
        .save(Reaction::new(Id::generate(), f.post.id, "smile"))
        .await
        .unwrap();
    assert_eq!(
        committed.invalidated,
        Invalidation::Key(CacheKey::PostReactions(f.post.id))
    );
    assert!(committed.invalidated.covers(CacheKey::PostReactions(f.post.id)));
    assert_eq!(
        committed.post_update_at,
        f.backend.post(f.post.id).map(|p| p.update_at)
    );

    let listed = reactions.get_for_post(f.post.id, true).await.unwrap();
    assert_eq!(listed, vec![committed.value]);
}

#[tokio::test]
async fn test_resave_returns_original_row() {
    let f = fixture();
    let user = Id::generate();

    let first = f
        .store
        .reaction()
        .save(Reaction::new(user, f.post.id, "tada"))
        .await
        .unwrap()
        .into_value();
    let second = f
        .store
        .reaction()
        .save(Reaction::new(user, f.post.id, "tada"))
        .await
        .unwrap()
        .into_value();

    assert_eq!(first.create_at, second.create_at);
    assert_eq!(
        f.store.reaction().get_for_post(f.post.id, true).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_delete_then_list() {
    let f = fixture();
    let reactions = f.store.reaction();
    let saved = reactions
        .save(Reaction::new(Id::generate(), f.post.id, "smile"))
        .await
        .unwrap()
        .into_value();
    assert_eq!(reactions.get_for_post(f.post.id, true).await.unwrap().len(), 1);

    let committed = reactions.delete(saved.clone()).await.unwrap();
    assert_eq!(
        committed.invalidated,
        Invalidation::Key(CacheKey::PostReactions(f.post.id))
    );
    assert_eq!(
        committed.post_update_at,
        f.backend.post(f.post.id).map(|p| p.update_at)
    );
    assert!(reactions.get_for_post(f.post.id, true).await.unwrap().is_empty());

    // Deleting again is not an error
    reactions.delete(saved).await.unwrap();
}

#[tokio::test]
async fn test_bulk_delete_misses_exactly_once() {
    let f = fixture();
    let reactions = f.store.reaction();
    let other = Post::new(Id::generate(), f.post.channel_id, Id::generate(), "", 2_000);
    f.backend.insert_post(other.clone());

    reactions
        .save(Reaction::new(Id::generate(), f.post.id, "party"))
        .await
        .unwrap();
    reactions
        .save(Reaction::new(Id::generate(), other.id, "smile"))
        .await
        .unwrap();
    reactions.get_for_post(f.post.id, true).await.unwrap();
    reactions.get_for_post(other.id, true).await.unwrap();

    let committed = reactions.delete_all_with_emoji_name("party").await.unwrap();
    assert_eq!(committed.value, 1);
    assert_eq!(committed.invalidated, Invalidation::All(CacheScope::Reactions));

    // Unrelated post is invalidated too: one durable read, then cached
    f.backend.reset_calls();
    let misses = reactions.cache_stats().misses;
    assert_eq!(reactions.get_for_post(other.id, true).await.unwrap().len(), 1);
    assert_eq!(reactions.get_for_post(other.id, true).await.unwrap().len(), 1);
    assert_eq!(f.backend.calls(), 1);
    assert_eq!(reactions.cache_stats().misses, misses + 1);

    assert!(reactions.get_for_post(f.post.id, true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_invalidation_is_idempotent() {
    let f = fixture();
    let reactions = f.store.reaction();
    reactions.get_for_post(f.post.id, true).await.unwrap();

    reactions.invalidate_cache_for_post(f.post.id);
    reactions.invalidate_cache_for_post(f.post.id);
    reactions.invalidate_cache_for_post(Id::generate());

    f.backend.reset_calls();
    reactions.get_for_post(f.post.id, true).await.unwrap();
    reactions.get_for_post(f.post.id, true).await.unwrap();
    assert_eq!(f.backend.calls(), 1);
}

#[tokio::test]
async fn test_bypassing_cache_always_reads() {
    let f = fixture();
    let reactions = f.store.reaction();

    reactions.get_for_post(f.post.id, false).await.unwrap();
    reactions.get_for_post(f.post.id, false).await.unwrap();
    assert_eq!(f.backend.calls(), 2);
}

#[tokio::test]
async fn test_failed_write_still_invalidates() {
    let f = fixture();
    let reactions = f.store.reaction();
    reactions
        .save(Reaction::new(Id::generate(), f.post.id, "smile"))
        .await
        .unwrap();
    reactions.get_for_post(f.post.id, true).await.unwrap();

    f.backend.set_failing(true);
    let err = reactions
        .save(Reaction::new(Id::generate(), f.post.id, "smile"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DatabaseError(_)));

    // Cache entry is gone, so the read goes to the (failing) backend
    assert!(reactions.get_for_post(f.post.id, true).await.is_err());
}

#[tokio::test]
async fn test_post_lookup() {
    let f = fixture();

    let found = f.store.post().get(f.post.id).await.unwrap();
    assert_eq!(found, f.post);

    let missing = Id::generate();
    assert_eq!(
        f.store.post().get(missing).await,
        Err(DomainError::PostNotFound(missing))
    );
}

#[tokio::test]
async fn test_channel_posts_cached_until_invalidated() {
    let f = fixture();
    let posts = f.store.post();

    let first = posts.get_for_channel(f.post.channel_id, 60, true).await.unwrap();
    assert_eq!(first.len(), 1);
    posts.get_for_channel(f.post.channel_id, 60, true).await.unwrap();
    assert_eq!(f.backend.calls(), 1);

    let newer = Post::new(Id::generate(), f.post.channel_id, Id::generate(), "", 3_000);
    f.backend.insert_post(newer.clone());
    posts.invalidate_cache_for_channel_posts(f.post.channel_id);

    let refreshed = posts.get_for_channel(f.post.channel_id, 60, true).await.unwrap();
    assert_eq!(refreshed[0].id, newer.id);
    assert_eq!(f.backend.calls(), 2);

    posts.invalidate_cache();
    posts.get_for_channel(f.post.channel_id, 60, true).await.unwrap();
    assert_eq!(f.backend.calls(), 3);
}

#[tokio::test]
async fn test_channel_membership() {
    let f = fixture();
    let user = Id::generate();
    f.backend.add_member(ChannelMember::new(f.post.channel_id, user));

    assert!(f.store.channel().has_member(f.post.channel_id, user).await.unwrap());
    assert!(!f
        .store
        .channel()
        .has_member(f.post.channel_id, Id::generate())
        .await
        .unwrap());
}

#[tokio::test]
async fn test_independent_futures_overlap() {
    let f = fixture();
    let user = Id::generate();
    f.backend.add_member(ChannelMember::new(f.post.channel_id, user));

    let mut post = f.store.post().get(f.post.id);
    let member = f.store.channel().has_member(f.post.channel_id, user);

    assert!(member.await.unwrap());
    assert_eq!(post.wait().await.unwrap().id, f.post.id);
    assert_eq!(post.wait().await.unwrap().id, f.post.id);
}

#[tokio::test]
async fn test_concurrent_saves_on_one_post() {
    let f = fixture();
    let pending: Vec<_> = (0..16)
        .map(|_| {
            f.store
                .reaction()
                .save(Reaction::new(Id::generate(), f.post.id, "thumbsup"))
        })
        .collect();

    for fut in pending {
        fut.await.unwrap();
    }

    let listed = f.store.reaction().get_for_post(f.post.id, true).await.unwrap();
    assert_eq!(listed.len(), 16);
    assert!(listed.windows(2).all(|w| w[0].create_at <= w[1].create_at));
}

#[tokio::test]
async fn test_disabled_cache_reads_through() {
    let backend = MemoryBackend::new();
    let post = Post::new(Id::generate(), Id::generate(), Id::generate(), "", 1);
    backend.insert_post(post.clone());
    let store = Store::from_backend(backend.clone(), CacheConfig { enabled: false });

    store.reaction().get_for_post(post.id, true).await.unwrap();
    store.reaction().get_for_post(post.id, true).await.unwrap();
    assert_eq!(backend.calls(), 2);
}
