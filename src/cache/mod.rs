//! Cache Module
//!
//! Bounded hash map with least-recently-used eviction.

mod entry;
mod iter;
mod list;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{Entry, Handle};
pub use iter::{IntoIter, Iter};
pub use list::RecencyList;
pub use shared::SharedLruHash;
pub use stats::CacheStats;
pub use store::LruHash;

// == Public Constants ==
/// Capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 256;
