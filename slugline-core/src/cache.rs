//! Bounded memoization of pipeline results
//!
//! A [`SlugCache`] belongs to one process. It is shared between the threads
//! of a batch through an `Arc` and is never global: whoever runs a batch
//! creates the cache and passes it in.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default number of cached slugs
pub const DEFAULT_CACHE_SIZE: usize = 2048;

/// Normalized input plus the fingerprint of the config that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    fingerprint: Arc<str>,
    text: String,
}

impl CacheKey {
    /// Build a key from a config fingerprint and normalized text
    pub fn new(fingerprint: Arc<str>, text: String) -> Self {
        Self { fingerprint, text }
    }

    /// Normalized input text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Config fingerprint
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found a slug
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, 0.0 when nothing was looked up
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe LRU cache of slugs
///
/// A capacity of zero disables storage: lookups always miss and inserts
/// are dropped.
pub struct SlugCache {
    entries: Option<Mutex<LruCache<CacheKey, String>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SlugCache {
    /// Create a cache holding at most `capacity` slugs
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Whether this cache can store entries
    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Look up a slug, marking it most recently used
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let found = self
            .entries
            .as_ref()
            .and_then(|entries| entries.lock().get(key).cloned());

        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store a slug, evicting the least recently used entry when full
    pub fn put(&self, key: CacheKey, slug: String) {
        if let Some(entries) = &self.entries {
            entries.lock().put(key, slug);
        }
    }

    /// Number of stored slugs
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.lock().len())
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of stored slugs
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().clear();
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Current hit and miss counts
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for SlugCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl std::fmt::Debug for SlugCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlugCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
