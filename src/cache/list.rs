//! Recency List Module
//!
//! Doubly linked list of entries ordered from least recently used (head) to
//! most recently used (tail).
//!
//! Entries live in a slot arena and link to each other by [`Handle`], so the
//! list is the only owner and the index can hold plain `Copy` handles.
//!
//! ```text
//!   head (LRU) ─► [h1] ◄──► [h2] ◄──► [h3] ◄── tail (MRU)
//! ```
//!
//! Every operation except iteration is O(1).

use crate::cache::entry::{Entry, Handle};

// == Recency List ==
#[derive(Debug)]
pub struct RecencyList<K, V> {
    /// Arena slots, None when free
    slots: Vec<Option<Entry<K, V>>>,
    /// Freed slots available for reuse
    free: Vec<usize>,
    /// Least recently used entry
    head: Option<Handle>,
    /// Most recently used entry
    tail: Option<Handle>,
    /// Number of live entries
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the least recently used entry.
    pub fn head(&self) -> Option<Handle> {
        self.head
    }

    /// Handle of the most recently used entry.
    pub fn tail(&self) -> Option<Handle> {
        self.tail
    }

    pub fn get(&self, handle: Handle) -> Option<&Entry<K, V>> {
        self.slots.get(handle.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(handle.0).and_then(|slot| slot.as_mut())
    }

    // == Append Tail ==
    /// Inserts a brand-new entry as the most recently used one.
    pub fn append_tail(&mut self, key: K, value: V) -> Handle {
        let entry = Entry::new(key, value);
        let handle = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                Handle(idx)
            }
            None => {
                self.slots.push(Some(entry));
                Handle(self.slots.len() - 1)
            }
        };
        self.len += 1;
        self.attach_tail(handle);
        handle
    }

    // == Move To Tail ==
    /// Relinks an existing entry as the most recently used one.
    ///
    /// Returns `false` if `handle` is not live.
    pub fn move_to_tail(&mut self, handle: Handle) -> bool {
        if self.get(handle).is_none() {
            return false;
        }
        if self.tail == Some(handle) {
            return true;
        }
        self.detach(handle);
        self.attach_tail(handle);
        true
    }

    // == Unlink ==
    /// Removes the entry at `handle` from any position and frees its slot.
    pub fn unlink(&mut self, handle: Handle) -> Option<Entry<K, V>> {
        self.get(handle)?;
        self.detach(handle);
        let mut entry = self.slots[handle.0].take()?;
        entry.prev = None;
        entry.next = None;
        self.free.push(handle.0);
        self.len -= 1;
        Some(entry)
    }

    // == Pop Head ==
    /// Removes and returns the least recently used entry.
    pub fn pop_head(&mut self) -> Option<Entry<K, V>> {
        let head = self.head?;
        self.unlink(head)
    }

    // == Clear ==
    /// Drops every entry and releases arena storage.
    pub fn clear(&mut self) {
        self.slots = Vec::new();
        self.free = Vec::new();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn detach(&mut self, handle: Handle) {
        let (prev, next) = match self.get(handle) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(prev) => {
                if let Some(entry) = self.get_mut(prev) {
                    entry.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next) => {
                if let Some(entry) = self.get_mut(next) {
                    entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn attach_tail(&mut self, handle: Handle) {
        let old_tail = self.tail;
        if let Some(entry) = self.get_mut(handle) {
            entry.prev = old_tail;
            entry.next = None;
        }
        match old_tail {
            Some(old_tail) => {
                if let Some(entry) = self.get_mut(old_tail) {
                    entry.next = Some(handle);
                }
            }
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
    }

    /// Panics if the links, head/tail pointers or length disagree.
    #[cfg(test)]
    pub fn validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none(), "head set on empty list");
            assert!(self.tail.is_none(), "tail set on empty list");
            assert_eq!(self.len, 0);
            return;
        }

        let mut seen = std::collections::HashSet::new();
        let mut prev = None;
        let mut current = self.head;
        while let Some(handle) = current {
            assert!(seen.insert(handle), "cycle at {:?}", handle);
            let entry = self.get(handle).expect("dangling link");
            assert_eq!(entry.prev, prev, "broken back link at {:?}", handle);
            prev = Some(handle);
            current = entry.next;
        }

        assert_eq!(self.tail, prev);
        assert_eq!(seen.len(), self.len);
        assert_eq!(self.slots.len() - self.free.len(), self.len);
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
