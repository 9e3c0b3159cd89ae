//! Error types for the cache
//!
//! Cache operations never fail: a missing key is an empty `Option`. The only
//! fallible path is loading configuration from outside the process.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A configuration value could not be parsed
    #[error("Invalid configuration: {var}={value:?} is not an integer")]
    InvalidConfig {
        /// Name of the offending variable
        var: String,
        /// The raw value that was rejected
        value: String,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
