//! # chat-store
//!
//! Future-returning entity stores layered over the durable repositories and
//! the in-process caches.
//!
//! Every operation is issued immediately on its own task and returns a
//! [`StoreFuture`]. Writes resolve to [`Committed`], which names the cache
//! entries that were invalidated before the future resolved, so a caller
//! that awaits a write and then reads is guaranteed not to see stale cache
//! content.
//!
//! ```rust,ignore
//! let store = Store::from_backend(MemoryBackend::new(), CacheConfig::default());
//!
//! let pending = store.post().get(post_id);
//! let saved = store.reaction().save(reaction).await?;
//! let post = pending.await?;
//! ```

pub mod channel;
pub mod future;
pub mod invalidation;
pub mod post;
pub mod reaction;
pub mod store;

pub use channel::ChannelStore;
pub use future::{StoreFuture, StoreResult};
pub use invalidation::{CacheKey, CacheScope, Committed, Invalidation};
pub use post::PostStore;
pub use reaction::ReactionStore;
pub use store::Store;
