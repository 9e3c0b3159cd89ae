//! lruhash - A bounded hash map with LRU eviction
//!
//! Behaves like an ordinary map but never holds more than its capacity:
//! inserting a new key into a full cache first discards the least recently
//! used entry. Meant to be embedded as an in-process cache layer.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, LruHash, SharedLruHash, DEFAULT_CAPACITY};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
