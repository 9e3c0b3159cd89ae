//! Shared Cache Module
//!
//! A cloneable, thread-safe handle around [`LruHash`].
//!
//! Every read promotes an entry, so reads mutate too and the whole cache sits
//! behind a single mutex. The recency list's relinking is multi-step and is
//! never exposed to finer-grained locking.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{CacheStats, LruHash};
use crate::config::CacheConfig;

// == Shared LRU Hash ==
/// Thread-safe LRU cache handle. Clones share the same cache.
#[derive(Debug)]
pub struct SharedLruHash<K, V> {
    inner: Arc<Mutex<LruHash<K, V>>>,
}

impl<K, V> Clone for SharedLruHash<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedLruHash<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Wraps an existing cache.
    pub fn new(cache: LruHash<K, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Creates an empty shared cache sized from `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(LruHash::from_config(config))
    }

    /// Returns a copy of the value for `key`, promoting it.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Stores `value` under `key`. Returns `false` if it was discarded
    /// because the capacity is 0.
    pub fn set(&self, key: K, value: V) -> bool {
        self.inner.lock().set(key, value).is_some()
    }

    /// Non-promoting read with a fallback; see [`LruHash::fetch`].
    pub fn fetch<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().fetch(key, default)
    }

    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().delete(key)
    }

    pub fn set_capacity(&self, capacity: usize) {
        self.inner.lock().set_capacity(capacity);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    /// Runs `f` with exclusive access to the cache.
    ///
    /// Use this for compound operations and for iteration, which must not
    /// interleave with writes from other threads.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LruHash<K, V>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}
