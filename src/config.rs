//! Configuration Module
//!
//! Handles loading cache configuration from environment variables or from a
//! host application's own configuration file.

use std::env;

use serde::Deserialize;
use tracing::warn;

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{CacheError, Result};

/// Environment variable holding the cache capacity.
pub const CAPACITY_ENV: &str = "LRUHASH_CAPACITY";

/// Cache configuration parameters.
///
/// Deserializable so it can be nested inside a larger configuration struct;
/// missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
}

impl CacheConfig {
    /// Creates a config with an explicit capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Creates a CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRUHASH_CAPACITY` - Maximum cache entries (default: 256)
    ///
    /// A negative capacity is clamped to 0. A value that is not an integer
    /// is rejected with [`CacheError::InvalidConfig`].
    pub fn from_env() -> Result<Self> {
        let capacity = parse_capacity(env::var(CAPACITY_ENV).ok().as_deref())?;
        Ok(Self { capacity })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

fn parse_capacity(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_CAPACITY);
    };

    let parsed: i128 = raw.trim().parse().map_err(|_| CacheError::InvalidConfig {
        var: CAPACITY_ENV.to_string(),
        value: raw.to_string(),
    })?;

    if parsed < 0 {
        warn!(
            capacity = %parsed,
            "negative cache capacity clamped to 0; every insert will be evicted"
        );
        return Ok(0);
    }

    usize::try_from(parsed).map_err(|_| CacheError::InvalidConfig {
        var: CAPACITY_ENV.to_string(),
        value: raw.to_string(),
    })
}
