//! In-process read-through cache
//!
//! Entries are only ever written from authoritative reads. Each population
//! carries a `ReadToken` taken before the durable read, so a read that
//! raced with an invalidation can never overwrite the newer state.

mod cache_layer;

pub use cache_layer::{CacheConfig, CacheLayer, CacheStats, ReadToken};
