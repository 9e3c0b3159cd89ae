//! Iterators over cache entries in recency order.
//!
//! Borrowing iterators hold a shared borrow of the cache, so the borrow
//! checker rules out mutation while one is alive. Iteration never promotes.

use std::iter::FusedIterator;

use crate::cache::entry::Handle;
use crate::cache::list::RecencyList;

// == Borrowing Iterator ==
/// Iterator over `(&K, &V)` from least to most recently used.
///
/// Reverse it (or use [`LruHash::iter_mru`](crate::LruHash::iter_mru)) to walk
/// from most to least recently used.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(list: &'a RecencyList<K, V>) -> Self {
        Self {
            list,
            front: list.head(),
            back: list.tail(),
            remaining: list.len(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.get(self.front?)?;
        self.front = entry.next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.get(self.back?)?;
        self.back = entry.prev;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

// == Owning Iterator ==
/// Consuming iterator yielding `(K, V)` from least to most recently used.
#[derive(Debug)]
pub struct IntoIter<K, V> {
    pub(crate) list: RecencyList<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_head().map(|entry| entry.into_pair())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
