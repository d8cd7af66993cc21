use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

/// Cache configuration
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// When false every lookup misses and populations are discarded
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl From<&chat_common::CacheSettings> for CacheConfig {
    fn from(settings: &chat_common::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
        }
    }
}

/// Invalidation counters shared by all keys hashing to the same stripe
const STRIPES: usize = 64;

/// Snapshot of the invalidation state of one key
///
/// Taken before a durable read and handed back to `populate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadToken {
    stripe: usize,
    sequence: u64,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Sequence-guarded key/value cache shared across requests
///
/// Only keys holding a value occupy the map. Stale populations are caught
/// by per-stripe invalidation sequences instead of per-key tombstones, so an
/// invalidation of another key in the same stripe may also turn a
/// concurrent population away; the next read simply misses.
pub struct CacheLayer<K, V> {
    name: &'static str,
    config: CacheConfig,
    hasher: RandomState,
    sequences: Box<[AtomicU64]>,
    values: DashMap<K, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> CacheLayer<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(name: &'static str, config: CacheConfig) -> Self {
        Self {
            name,
            config,
            hasher: RandomState::new(),
            sequences: (0..STRIPES).map(|_| AtomicU64::new(0)).collect(),
            values: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Look up a cached value, counting the hit or miss
    pub fn get(&self, key: &K) -> Option<V> {
        let value = if self.config.enabled {
            self.values.get(key).map(|entry| entry.value().clone())
        } else {
            None
        };

        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(cache = self.name, ?key, "cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(cache = self.name, ?key, "cache miss");
        }
        value
    }

    /// Snapshot the state a later `populate` must still observe
    pub fn read_token(&self, key: &K) -> ReadToken {
        let stripe = self.stripe_of(key);
        ReadToken {
            stripe,
            sequence: self.sequences[stripe].load(Ordering::SeqCst),
        }
    }

    /// Store the result of an authoritative read
    ///
    /// Returns false, leaving the cache untouched, if the key's stripe was
    /// invalidated after `token` was taken.
    pub fn populate(&self, key: K, value: V, token: ReadToken) -> bool {
        if !self.config.enabled {
            return false;
        }
        if self.stripe_of(&key) != token.stripe {
            debug!(cache = self.name, ?key, "token belongs to another key");
            return false;
        }

        // The sequence is checked while the key's shard is locked; invalidate
        // bumps it before removing, so a value stored here is either seen by
        // that removal or rejected
        let stored = match self.values.entry(key) {
            Entry::Occupied(mut occupied) => {
                let fresh = self.sequences[token.stripe].load(Ordering::SeqCst) == token.sequence;
                if fresh {
                    occupied.insert(value);
                }
                fresh
            }
            Entry::Vacant(vacant) => {
                let fresh = self.sequences[token.stripe].load(Ordering::SeqCst) == token.sequence;
                if fresh {
                    vacant.insert(value);
                }
                fresh
            }
        };

        if !stored {
            debug!(cache = self.name, "stale population discarded");
        }
        stored
    }

    /// Drop the cached value for one key; safe to repeat
    pub fn invalidate(&self, key: &K) {
        self.sequences[self.stripe_of(key)].fetch_add(1, Ordering::SeqCst);
        self.values.remove(key);
        debug!(cache = self.name, ?key, "invalidated");
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        for sequence in self.sequences.iter() {
            sequence.fetch_add(1, Ordering::SeqCst);
        }
        self.values.clear();
        debug!(cache = self.name, "invalidated all");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of keys currently holding a value
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn stripe_of(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % STRIPES as u64) as usize
    }
}

impl<K: Eq + Hash, V> std::fmt::Debug for CacheLayer<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("name", &self.name)
            .field("enabled", &self.config.enabled)
            .field("len", &self.values.len())
            .finish_non_exhaustive()
    }
}
