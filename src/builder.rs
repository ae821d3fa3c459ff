//! Unified cache builder across all eviction policies.
//!
//! Produces any policy behind one wrapper type implementing
//! [`CachePolicy`], so driver code can iterate heterogeneous policies
//! without generics gymnastics — the shape a hit-rate harness wants.
//!
//! ```
//! use tricache::builder::{CacheBuilder, PolicyKind};
//! use tricache::traits::CachePolicy;
//!
//! let caches: Vec<_> = [PolicyKind::Lru, PolicyKind::Lfu { max_avg_freq: 10 }]
//!     .into_iter()
//!     .map(|kind| CacheBuilder::new(50).build::<u64, String>(kind))
//!     .collect();
//!
//! for cache in &caches {
//!     cache.put(1, "warm".to_string());
//!     assert_eq!(cache.get_or_default(&1), "warm");
//! }
//! ```

use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::arc::ArcCache;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::policy::lru_k::LruKCache;
use crate::policy::sharded::{HashLfuCache, HashLruCache};
use crate::traits::CachePolicy;

/// Which replacement policy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Least Recently Used.
    Lru,
    /// Least Frequently Used with average-frequency decay.
    Lfu { max_avg_freq: u64 },
    /// LRU with a K-observation admission gate.
    LruK { k: u64, history_capacity: usize },
    /// Two-part adaptive cache (recency + frequency halves).
    Arc { transform_threshold: u64 },
    /// Sharded LRU (0 shards = host parallelism).
    ShardedLru { shards: usize },
    /// Sharded LFU (0 shards = host parallelism).
    ShardedLfu { shards: usize, max_avg_freq: u64 },
}

impl PolicyKind {
    /// Short human-readable policy name for reports.
    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::Lru => "lru",
            PolicyKind::Lfu { .. } => "lfu",
            PolicyKind::LruK { .. } => "lru-k",
            PolicyKind::Arc { .. } => "arc",
            PolicyKind::ShardedLru { .. } => "sharded-lru",
            PolicyKind::ShardedLfu { .. } => "sharded-lfu",
        }
    }
}

/// Policy-erased cache produced by [`CacheBuilder`].
pub struct Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: CacheInner<K, V>,
    name: &'static str,
}

enum CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    Lru(LruCache<K, V>),
    Lfu(LfuCache<K, V>),
    LruK(LruKCache<K, V>),
    Arc(ArcCache<K, V>),
    ShardedLru(HashLruCache<K, V>),
    ShardedLfu(HashLfuCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// The policy name this cache was built with.
    pub fn policy_name(&self) -> &'static str {
        self.name
    }

    /// Looks up `key`, returning a clone of the value.
    pub fn get(&self, key: &K) -> Option<V> {
        match &self.inner {
            CacheInner::Lru(cache) => cache.get(key),
            CacheInner::Lfu(cache) => cache.get(key),
            CacheInner::LruK(cache) => cache.get(key),
            CacheInner::Arc(cache) => cache.get(key),
            CacheInner::ShardedLru(cache) => cache.get(key),
            CacheInner::ShardedLfu(cache) => cache.get(key),
        }
    }
}

impl<K, V> CachePolicy<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        match &self.inner {
            CacheInner::Lru(cache) => cache.put(key, value),
            CacheInner::Lfu(cache) => cache.put(key, value),
            CacheInner::LruK(cache) => cache.put(key, value),
            CacheInner::Arc(cache) => cache.put(key, value),
            CacheInner::ShardedLru(cache) => cache.put(key, value),
            CacheInner::ShardedLfu(cache) => cache.put(key, value),
        }
    }

    fn get_to(&self, key: &K, out: &mut V) -> bool {
        match &self.inner {
            CacheInner::Lru(cache) => cache.get_to(key, out),
            CacheInner::Lfu(cache) => cache.get_to(key, out),
            CacheInner::LruK(cache) => cache.get_to(key, out),
            CacheInner::Arc(cache) => cache.get_to(key, out),
            CacheInner::ShardedLru(cache) => cache.get_to(key, out),
            CacheInner::ShardedLfu(cache) => cache.get_to(key, out),
        }
    }
}

/// Builder for [`Cache`] instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Starts a builder for caches of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a cache with the given policy.
    ///
    /// # Panics
    ///
    /// Panics on invalid configuration (e.g. an LFU decay threshold of 0);
    /// use [`try_build`](Self::try_build) to handle that as an error.
    pub fn build<K, V>(self, kind: PolicyKind) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let name = kind.name();
        let inner = match kind {
            PolicyKind::Lru => CacheInner::Lru(LruCache::new(self.capacity)),
            PolicyKind::Lfu { max_avg_freq } => {
                CacheInner::Lfu(LfuCache::with_max_avg_freq(self.capacity, max_avg_freq))
            },
            PolicyKind::LruK {
                k,
                history_capacity,
            } => CacheInner::LruK(LruKCache::new(self.capacity, history_capacity, k)),
            PolicyKind::Arc {
                transform_threshold,
            } => CacheInner::Arc(ArcCache::with_threshold(self.capacity, transform_threshold)),
            PolicyKind::ShardedLru { shards } => {
                CacheInner::ShardedLru(HashLruCache::new(self.capacity, shards))
            },
            PolicyKind::ShardedLfu {
                shards,
                max_avg_freq,
            } => CacheInner::ShardedLfu(HashLfuCache::with_max_avg_freq(
                self.capacity,
                shards,
                max_avg_freq,
            )),
        };
        Cache { inner, name }
    }

    /// Builds a cache, reporting invalid configuration as [`ConfigError`].
    pub fn try_build<K, V>(self, kind: PolicyKind) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let name = kind.name();
        let inner = match kind {
            PolicyKind::Lfu { max_avg_freq } => {
                CacheInner::Lfu(LfuCache::try_new(self.capacity, max_avg_freq)?)
            },
            PolicyKind::ShardedLru { shards } => {
                CacheInner::ShardedLru(HashLruCache::try_new(self.capacity, shards)?)
            },
            PolicyKind::ShardedLfu {
                shards,
                max_avg_freq,
            } => CacheInner::ShardedLfu(HashLfuCache::try_new(
                self.capacity,
                shards,
                max_avg_freq,
            )?),
            other => return Ok(self.build(other)),
        };
        Ok(Cache { inner, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_policy_passes_the_basic_contract() {
        let kinds = [
            PolicyKind::Lru,
            PolicyKind::Lfu { max_avg_freq: 10 },
            PolicyKind::LruK {
                k: 1,
                history_capacity: 16,
            },
            PolicyKind::Arc {
                transform_threshold: 2,
            },
            PolicyKind::ShardedLru { shards: 2 },
            PolicyKind::ShardedLfu {
                shards: 2,
                max_avg_freq: 10,
            },
        ];

        for kind in kinds {
            let cache = CacheBuilder::new(8).build::<u64, String>(kind);
            let name = cache.policy_name();

            cache.put(1, "one".into());
            cache.put(2, "two".into());

            let mut out = String::new();
            assert!(cache.get_to(&1, &mut out), "{name}: expected hit");
            assert_eq!(out, "one", "{name}");

            assert!(!cache.get_to(&99, &mut out), "{name}: expected miss");
            assert_eq!(out, "one", "{name}: miss must not clobber out");

            cache.put(1, "ONE".into());
            assert_eq!(cache.get(&1).as_deref(), Some("ONE"), "{name}: overwrite");
            assert_eq!(cache.get_or_default(&99), "", "{name}: default on miss");
        }
    }

    #[test]
    fn try_build_surfaces_config_errors() {
        let bad = CacheBuilder::new(8).try_build::<u64, u64>(PolicyKind::Lfu { max_avg_freq: 0 });
        assert!(bad.is_err());

        let bad = CacheBuilder::new(2).try_build::<u64, u64>(PolicyKind::ShardedLru { shards: 8 });
        assert!(bad.is_err());

        let ok = CacheBuilder::new(8).try_build::<u64, u64>(PolicyKind::Lru);
        assert!(ok.is_ok());
    }

    #[test]
    fn policy_names_are_stable() {
        assert_eq!(PolicyKind::Lru.name(), "lru");
        assert_eq!(
            PolicyKind::Arc {
                transform_threshold: 2
            }
            .name(),
            "arc"
        );
    }
}
