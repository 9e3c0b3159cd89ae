//! Cache Store Module
//!
//! Main cache engine combining a hash index with the recency list.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::iter::Rev;

use tracing::{debug, trace};

use crate::cache::entry::Handle;
use crate::cache::iter::{IntoIter, Iter};
use crate::cache::list::RecencyList;
use crate::cache::{CacheStats, DEFAULT_CAPACITY};
use crate::config::CacheConfig;

// == LRU Hash ==
/// A hash map bounded to `capacity` entries with least-recently-used eviction.
///
/// Reads through [`get`](Self::get) and writes through [`set`](Self::set)
/// promote the touched entry to most recently used. When a new key would
/// push the size past the capacity, the least recently used entry is evicted
/// first. Lookups never fail: a miss is `None`.
///
/// Not thread-safe on its own; wrap it in
/// [`SharedLruHash`](crate::SharedLruHash) to share it between threads.
///
/// ```
/// use lruhash::LruHash;
///
/// let mut cache = LruHash::new(2);
/// cache.set("1", 1);
/// cache.set("2", 2);
/// cache.get("1");
/// cache.set("3", 3);
///
/// assert_eq!(cache.get("1"), Some(&1));
/// assert_eq!(cache.get("2"), None);
/// assert_eq!(cache.get("3"), Some(&3));
/// ```
#[derive(Debug)]
pub struct LruHash<K, V> {
    /// Key to position in `order`
    index: HashMap<K, Handle>,
    /// Entries from least (head) to most (tail) recently used
    order: RecencyList<K, V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> LruHash<K, V> {
    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the maximum number of entries the cache will hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Iteration ==
    /// Iterates `(key, value)` pairs from least to most recently used.
    ///
    /// Iteration does not promote. The returned iterator borrows the cache,
    /// so the cache cannot be modified until it is dropped.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.order)
    }

    /// Iterates `(key, value)` pairs from most to least recently used.
    pub fn iter_mru(&self) -> Rev<Iter<'_, K, V>> {
        self.iter().rev()
    }

    /// Returns the entry that would be evicted next, without promoting it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Returns the most recently used entry, without promoting it.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.iter().next_back()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.order.len());
        stats
    }
}

impl<K, V> LruHash<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 is allowed: every insert is discarded immediately.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::new(),
            order: RecencyList::new(),
            stats: CacheStats::new(),
            capacity,
        }
    }

    /// Creates a cache sized from `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Creates a cache pre-seeded with `entries`.
    ///
    /// Entries are written in iteration order, so when there are more than
    /// `capacity` distinct keys only the last ones written survive.
    pub fn with_entries<I>(capacity: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut cache = Self::new(capacity);
        cache.extend(entries);
        cache
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    ///
    /// A miss leaves the cache untouched apart from the miss counter.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).map(|value| &*value)
    }

    /// Like [`get`](Self::get), returning a mutable reference.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };
        self.stats.record_hit();
        self.order.move_to_tail(handle);
        self.order.get_mut(handle).map(|entry| &mut entry.value)
    }

    // == Peek ==
    /// Returns the value for `key` without promoting it.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.index.get(key)?;
        self.order.get(handle).map(|entry| &entry.value)
    }

    /// Returns `true` if `key` is present. Does not promote.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Fetch ==
    /// Returns a copy of the value for `key`, or `default` if it is absent.
    ///
    /// Neither path changes the cache: a hit is not promoted and the default
    /// is not stored.
    pub fn fetch<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.peek(key).cloned().unwrap_or(default)
    }

    /// Like [`fetch`](Self::fetch), computing the default from the missing
    /// key only on a miss.
    pub fn fetch_with<Q, F>(&self, key: &Q, default: F) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
        F: FnOnce(&Q) -> V,
    {
        self.peek(key).cloned().unwrap_or_else(|| default(key))
    }

    // == Set ==
    /// Stores `value` under `key` and marks it most recently used.
    ///
    /// An existing key is updated in place. A new key first evicts the least
    /// recently used entry if the cache is full. Returns the stored value, or
    /// `None` when the capacity is 0 and the value was discarded.
    pub fn set(&mut self, key: K, value: V) -> Option<&V> {
        if let Some(&handle) = self.index.get(&key) {
            self.order.move_to_tail(handle);
            let entry = self.order.get_mut(handle)?;
            entry.value = value;
            trace!(len = self.index.len(), "updated existing entry");
            return Some(&entry.value);
        }

        while self.order.len() >= self.capacity {
            if self.evict_lru().is_none() {
                break;
            }
        }

        self.stats.record_insert();
        if self.capacity == 0 {
            self.stats.record_eviction();
            debug!("capacity is 0, discarded new entry");
            return None;
        }

        let handle = self.order.append_tail(key.clone(), value);
        self.index.insert(key, handle);
        trace!(len = self.index.len(), "inserted new entry");
        self.order.get(handle).map(|entry| &entry.value)
    }

    /// Alias of [`set`](Self::set).
    pub fn store(&mut self, key: K, value: V) -> Option<&V> {
        self.set(key, value)
    }

    // == Delete ==
    /// Removes `key` and returns its value. Absent keys return `None`.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.index.remove(key)?;
        let entry = self.order.unlink(handle)?;
        trace!(len = self.index.len(), "deleted entry");
        Some(entry.value)
    }

    // == Pop LRU ==
    /// Removes and returns the least recently used entry.
    ///
    /// An explicit pop is not counted as an eviction.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.order.pop_head()?;
        self.index.remove(&entry.key);
        Some(entry.into_pair())
    }

    // == Set Capacity ==
    /// Changes the capacity, evicting least recently used entries until the
    /// cache fits. Shrinking to 0 empties the cache.
    ///
    /// Storage already allocated for evicted entries is kept for reuse; call
    /// [`clear`](Self::clear) to release it.
    pub fn set_capacity(&mut self, capacity: usize) {
        let before = self.order.len();
        self.capacity = capacity;
        while self.order.len() > self.capacity {
            if self.evict_lru().is_none() {
                break;
            }
        }
        debug!(
            capacity,
            evicted = before - self.order.len(),
            "cache capacity changed"
        );
    }

    // == Clear ==
    /// Drops every entry and releases the memory they used. Capacity and
    /// counters are kept.
    pub fn clear(&mut self) {
        self.index = HashMap::new();
        self.order.clear();
    }

    fn evict_lru(&mut self) -> Option<(K, V)> {
        let evicted = self.pop_lru()?;
        self.stats.record_eviction();
        debug!(
            capacity = self.capacity,
            len = self.order.len(),
            "evicted least recently used entry"
        );
        Some(evicted)
    }

    /// Panics unless the index and the recency list describe the same entries.
    #[cfg(test)]
    pub(crate) fn validate_invariants(&self) {
        self.order.validate_invariants();
        assert_eq!(self.index.len(), self.order.len(), "index/list size mismatch");
        assert!(
            self.order.len() <= self.capacity,
            "size {} exceeds capacity {}",
            self.order.len(),
            self.capacity
        );
        for (key, &handle) in &self.index {
            let entry = self.order.get(handle).expect("index points at a free slot");
            assert!(entry.key == *key, "index points at the wrong entry");
        }
    }
}

impl<K, V> Default for LruHash<K, V>
where
    K: Hash + Eq + Clone,
{
    /// A cache holding up to 256 entries.
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> Extend<(K, V)> for LruHash<K, V>
where
    K: Hash + Eq + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a LruHash<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for LruHash<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self.order }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys<K: Clone, V>(cache: &LruHash<K, V>) -> Vec<K> {
        cache.iter().map(|(k, _)| k.clone()).collect()
    }

    fn seeded(capacity: usize, n: u32) -> LruHash<u32, u32> {
        LruHash::with_entries(capacity, (1..=n).map(|i| (i, i * 10)))
    }

    #[test]
    fn test_store_new() {
        let cache: LruHash<String, String> = LruHash::new(100);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 100);
        cache.validate_invariants();
    }

    #[test]
    fn test_default_capacity() {
        let cache: LruHash<String, u8> = LruHash::default();
        assert_eq!(cache.capacity(), 256);
    }

    #[test]
    fn test_from_config() {
        let cache: LruHash<String, u8> = LruHash::from_config(&CacheConfig::new(7));
        assert_eq!(cache.capacity(), 7);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut cache = LruHash::new(100);

        let stored = cache.set("key1".to_string(), "value1".to_string()).cloned();
        assert_eq!(stored.as_deref(), Some("value1"));
        assert_eq!(cache.get("key1"), Some(&"value1".to_string()));
        assert_eq!(cache.len(), 1);
        cache.validate_invariants();
    }

    #[test]
    fn test_store_get_nonexistent_does_not_mutate() {
        let mut cache = seeded(3, 3);

        assert_eq!(cache.get(&99), None);
        assert_eq!(keys(&cache), vec![1, 2, 3]);
        assert_eq!(cache.len(), 3);
        cache.validate_invariants();
    }

    #[test]
    fn test_store_overwrite_updates_in_place_and_promotes() {
        let mut cache = seeded(3, 3);

        cache.set(1, 100);
        assert_eq!(keys(&cache), vec![2, 3, 1]);
        assert_eq!(cache.peek(&1), Some(&100));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 0);
        cache.validate_invariants();
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut cache = seeded(3, 3);

        cache.set(4, 40);

        assert_eq!(cache.len(), 3);
        assert_eq!(keys(&cache), vec![2, 3, 4]);
        assert!(!cache.contains_key(&1));
        cache.validate_invariants();
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut cache = seeded(3, 3);

        cache.get(&1);
        cache.set(4, 40);

        assert!(cache.contains_key(&1));
        assert!(!cache.contains_key(&2));
        cache.validate_invariants();
    }

    #[test]
    fn test_get_mut_promotes_and_updates() {
        let mut cache = seeded(3, 3);

        if let Some(value) = cache.get_mut(&1) {
            *value += 1;
        }
        assert_eq!(keys(&cache), vec![2, 3, 1]);
        assert_eq!(cache.peek(&1), Some(&11));
    }

    #[test]
    fn test_peek_and_contains_do_not_promote() {
        let cache = seeded(3, 3);

        assert_eq!(cache.peek(&1), Some(&10));
        assert!(cache.contains_key(&1));
        assert_eq!(keys(&cache), vec![1, 2, 3]);
    }

    #[test]
    fn test_fetch_hit_does_not_promote() {
        let mut cache = seeded(2, 2);

        assert_eq!(cache.fetch(&1, 0), 10);
        cache.set(3, 30);

        assert!(!cache.contains_key(&1));
        assert!(cache.contains_key(&2));
    }

    #[test]
    fn test_fetch_miss_does_not_store() {
        let mut cache: LruHash<String, i32> = LruHash::new(2);

        assert_eq!(cache.fetch("missing", 42), 42);
        assert_eq!(cache.fetch_with("missing", |_| 42), 42);
        assert_eq!(cache.get("missing"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fetch_with_only_calls_default_on_miss() {
        let cache = seeded(2, 2);

        let value = cache.fetch_with(&1, |_| panic!("default evaluated on a hit"));
        assert_eq!(value, 10);
    }

    #[test]
    fn test_store_delete() {
        let mut cache = seeded(3, 3);

        assert_eq!(cache.delete(&2), Some(20));
        assert_eq!(keys(&cache), vec![1, 3]);
        assert_eq!(cache.get(&2), None);
        cache.validate_invariants();
    }

    #[test]
    fn test_store_delete_nonexistent_is_idempotent() {
        let mut cache = seeded(3, 2);

        assert_eq!(cache.delete(&9), None);
        assert_eq!(cache.delete(&9), None);
        assert_eq!(cache.len(), 2);
        cache.validate_invariants();
    }

    #[test]
    fn test_delete_last_entry_then_reinsert() {
        let mut cache = seeded(3, 1);

        cache.delete(&1);
        assert!(cache.is_empty());
        assert!(cache.peek_lru().is_none());
        assert!(cache.peek_mru().is_none());

        cache.set(5, 50);
        assert_eq!(cache.peek_lru(), Some((&5, &50)));
        assert_eq!(cache.peek_mru(), Some((&5, &50)));
        cache.validate_invariants();
    }

    #[test]
    fn test_pop_lru() {
        let mut cache = seeded(3, 3);

        assert_eq!(cache.pop_lru(), Some((1, 10)));
        assert_eq!(cache.pop_lru(), Some((2, 20)));
        assert_eq!(cache.pop_lru(), Some((3, 30)));
        assert_eq!(cache.pop_lru(), None);
        assert_eq!(cache.stats().evictions, 0);
        cache.validate_invariants();
    }

    #[test]
    fn test_set_capacity_shrinks_from_head() {
        let mut cache = seeded(5, 5);

        cache.set_capacity(2);

        assert_eq!(keys(&cache), vec![4, 5]);
        assert_eq!(cache.capacity(), 2);
        assert_eq!(cache.stats().evictions, 3);
        cache.validate_invariants();
    }

    #[test]
    fn test_set_capacity_to_zero_empties() {
        let mut cache = seeded(5, 5);

        cache.set_capacity(0);

        assert!(cache.is_empty());
        cache.validate_invariants();
    }

    #[test]
    fn test_set_capacity_grow_keeps_entries() {
        let mut cache = seeded(2, 2);

        cache.set_capacity(4);
        cache.set(3, 30);
        cache.set(4, 40);

        assert_eq!(keys(&cache), vec![1, 2, 3, 4]);
        cache.validate_invariants();
    }

    #[test]
    fn test_zero_capacity_discards_every_insert() {
        let mut cache = LruHash::new(0);

        assert_eq!(cache.set("a", 1), None);
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());

        let stats = cache.stats();
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.evictions, 1);
        cache.validate_invariants();
    }

    #[test]
    fn test_with_entries_keeps_last_written() {
        let cache = seeded(3, 6);

        assert_eq!(keys(&cache), vec![4, 5, 6]);
        assert_eq!(cache.stats().evictions, 3);
    }

    #[test]
    fn test_clear() {
        let mut cache = seeded(3, 3);

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.peek_lru().is_none());
        assert_eq!(cache.capacity(), 3);
        cache.set(1, 1);
        assert_eq!(keys(&cache), vec![1]);
        cache.validate_invariants();
    }

    #[test]
    fn test_clear_after_shrink_releases_index() {
        let mut cache = seeded(10_000, 10_000);

        cache.set_capacity(1);
        assert!(cache.index.capacity() >= 10_000);

        cache.clear();
        assert_eq!(cache.index.capacity(), 0);

        cache.set(1, 1);
        assert_eq!(cache.len(), 1);
        cache.validate_invariants();
    }

    #[test]
    fn test_iter_mru_is_reverse_of_iter() {
        let mut cache = seeded(4, 4);
        cache.get(&2);

        let lru: Vec<(u32, u32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
        let mut mru: Vec<(u32, u32)> = cache.iter_mru().map(|(k, v)| (*k, *v)).collect();
        mru.reverse();

        assert_eq!(lru, vec![(1, 10), (3, 30), (4, 40), (2, 20)]);
        assert_eq!(lru, mru);
    }

    #[test]
    fn test_iteration_does_not_promote() {
        let mut cache = seeded(2, 2);

        for _ in &cache {}
        cache.set(3, 30);

        assert_eq!(keys(&cache), vec![2, 3]);
    }

    #[test]
    fn test_into_iter_lru_order() {
        let mut cache = seeded(3, 3);
        cache.get(&1);

        let pairs: Vec<(u32, u32)> = cache.into_iter().collect();
        assert_eq!(pairs, vec![(2, 20), (3, 30), (1, 10)]);
    }

    #[test]
    fn test_store_stats() {
        let mut cache = LruHash::new(100);

        cache.set("key1", 1);
        cache.get("key1");
        cache.get("nonexistent");
        cache.fetch("nonexistent", 0);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
