//! Process-wide caches for read-mostly data
//!
//! Two shapes of cache cover what the pipeline needs:
//! - [`Registry`]: unbounded, load-once tables (font tables per style and orientation)
//! - [`DocumentCache`]: bounded LRU of finished documents keyed by request hash
//!
//! Both are safe to share across threads. A value is always inserted as one
//! complete `Arc`, never patched in place.

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hit and miss counters for one cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Lazily populated, never-mutated map of shared values
///
/// Loading happens outside the lock. Two threads racing on the same key may
/// both load; the first complete value inserted wins and both get it.
pub struct Registry<K: Hash + Eq + Clone, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Hash + Eq + Clone, V> Registry<K, V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached value for `key`, if any
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.read().get(key).cloned()
    }

    /// Return the cached value or build it with `load`
    ///
    /// Errors from `load` are returned as-is and nothing is cached, so a
    /// later call retries.
    pub fn get_or_load<E>(&self, key: K, load: impl FnOnce() -> Result<V, E>) -> Result<Arc<V>, E> {
        if let Some(value) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let loaded = Arc::new(load()?);

        let mut entries = self.entries.write();
        Ok(Arc::clone(entries.entry(key).or_insert(loaded)))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every cached value; outstanding `Arc`s stay valid
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<K: Hash + Eq + Clone, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Default number of finished documents kept around
const DEFAULT_DOCUMENT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(v) => v,
    None => unreachable!(),
};

/// Bounded LRU of rendered outputs
pub struct DocumentCache<V: Clone> {
    entries: Mutex<LruCache<u64, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> DocumentCache<V> {
    /// Capacity 0 falls back to the default
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_DOCUMENT_CAPACITY);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: u64) -> Option<V> {
        let found = self.entries.lock().get(&key).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, key: u64, value: V) {
        self.entries.lock().put(key, value);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.lock().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<V: Clone> Default for DocumentCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT_CAPACITY.get())
    }
}

/// Stable-within-process hash used as a cache key
pub fn hash_key<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
