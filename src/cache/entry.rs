//! Cache Entry Module
//!
//! Defines a single stored association and the handle used to address it.

// == Handle ==
/// Stable position of an [`Entry`] inside the recency list's arena.
///
/// The index stores handles rather than references, so the list keeps sole
/// ownership of its entries. A handle is only meaningful while the entry it
/// was issued for is alive; its slot is recycled after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub(crate) usize);

// == Cache Entry ==
/// One key/value pair plus its neighbours in recency order.
#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    /// The key, duplicated from the index so eviction can find it
    pub key: K,
    /// The stored value
    pub value: V,
    /// Less recently used neighbour, None at the head
    pub(crate) prev: Option<Handle>,
    /// More recently used neighbour, None at the tail
    pub(crate) next: Option<Handle>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }

    /// Splits the entry into its key and value.
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
