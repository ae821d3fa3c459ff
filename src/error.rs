//! Error types for the tricache library.
//!
//! The caches themselves never fail at runtime — misses are booleans and a
//! zero-capacity cache is a silent no-op. The only fallible surface is
//! *construction*: [`ConfigError`] is returned by `try_`-prefixed
//! constructors and [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build)
//! when a configuration parameter is out of range.
//!
//! ```
//! use tricache::policy::lfu::LfuCache;
//!
//! // A decay threshold of 0 would re-trigger aging on every access.
//! let bad = LfuCache::<u64, u64>::try_new(100, 0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

/// Error returned when cache configuration parameters are invalid.
///
/// Carries a human-readable description of which parameter failed
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}
