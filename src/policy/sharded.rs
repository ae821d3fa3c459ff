//! # Sharded cache wrappers
//!
//! Fixed-fanout wrappers that split one logical cache into `S` independent
//! sub-caches of size `⌈C/S⌉` and route every operation to
//! `hash(key) mod S`. Each shard has its own lock, so threads touching
//! different shards never contend; the trade-off is that replacement is
//! per-shard, not globally optimal.
//!
//! ```text
//!            put(k, v) / get_to(k) / remove(k)
//!                         │
//!                  ShardSelector: hash(k) mod S
//!            ┌────────────┼────────────┐
//!            ▼            ▼            ▼
//!      ┌──────────┐ ┌──────────┐ ┌──────────┐
//!      │ shard 0  │ │ shard 1  │ │ shard 2  │   each ⌈C/S⌉ entries,
//!      │ LRU/LFU  │ │ LRU/LFU  │ │ LRU/LFU  │   own mutex, no
//!      └──────────┘ └──────────┘ └──────────┘   cross-shard traffic
//! ```
//!
//! A shard count of 0 defaults to the host's available parallelism.

use std::fmt;
use std::hash::Hash;

use crate::ds::shard::ShardSelector;
use crate::error::ConfigError;
use crate::policy::lfu::{DEFAULT_MAX_AVG_FREQ, LfuCache};
use crate::policy::lru::LruCache;
use crate::traits::CachePolicy;

fn shard_capacity(total: usize, shards: usize) -> usize {
    total.div_ceil(shards.max(1))
}

fn validate_fanout(total: usize, shards: usize) -> Result<(), ConfigError> {
    if shards > total && total > 0 {
        return Err(ConfigError::new(format!(
            "shard count {shards} exceeds total capacity {total}"
        )));
    }
    Ok(())
}

/// Sharded LRU cache: `S` independent [`LruCache`] shards.
///
/// # Example
///
/// ```
/// use tricache::policy::sharded::HashLruCache;
/// use tricache::traits::CachePolicy;
///
/// let cache: HashLruCache<u64, String> = HashLruCache::new(64, 4);
/// cache.put(1, "one".into());
/// assert_eq!(cache.get(&1).as_deref(), Some("one"));
/// assert_eq!(cache.shard_count(), 4);
/// ```
pub struct HashLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    shards: Vec<LruCache<K, V>>,
    selector: ShardSelector,
}

impl<K, V> HashLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates `shard_count` shards of `⌈total_capacity / shard_count⌉`
    /// entries each. A shard count of 0 defaults to the host's available
    /// parallelism.
    pub fn new(total_capacity: usize, shard_count: usize) -> Self {
        let selector = ShardSelector::with_default_parallelism(shard_count);
        let per_shard = shard_capacity(total_capacity, selector.shard_count());
        let shards = (0..selector.shard_count())
            .map(|_| LruCache::new(per_shard))
            .collect();
        Self { shards, selector }
    }

    /// Fallible constructor: rejects a fanout wider than the total
    /// capacity (which would silently over-provision).
    pub fn try_new(total_capacity: usize, shard_count: usize) -> Result<Self, ConfigError> {
        let selector = ShardSelector::with_default_parallelism(shard_count);
        validate_fanout(total_capacity, selector.shard_count())?;
        Ok(Self::new(total_capacity, shard_count))
    }

    fn shard(&self, key: &K) -> &LruCache<K, V> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    /// Looks up `key` on its shard, refreshing recency there.
    pub fn get(&self, key: &K) -> Option<V> {
        self.shard(key).get(key)
    }

    /// Removes `key` from its shard.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.shard(key).remove(key)
    }

    /// Presence on the key's shard.
    pub fn contains(&self, key: &K) -> bool {
        self.shard(key).contains(key)
    }

    /// Total resident entries across all shards. Each shard is locked in
    /// turn, so the sum is not a single atomic snapshot.
    pub fn len(&self) -> usize {
        self.shards.iter().map(LruCache::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(LruCache::is_empty)
    }

    /// Effective capacity: shard count × per-shard capacity.
    pub fn capacity(&self) -> usize {
        self.shards.iter().map(LruCache::capacity).sum()
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.selector.shard_count()
    }

    /// Drops every entry on every shard.
    pub fn clear(&self) {
        for shard in &self.shards {
            shard.clear();
        }
    }
}

impl<K, V> CachePolicy<K, V> for HashLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        self.shard(&key).put(key, value);
    }

    fn get_to(&self, key: &K, out: &mut V) -> bool {
        self.shard(key).get_to(key, out)
    }
}

impl<K, V> fmt::Debug for HashLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashLruCache")
            .field("shards", &self.shard_count())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// Sharded LFU cache: `S` independent [`LfuCache`] shards.
///
/// # Example
///
/// ```
/// use tricache::policy::sharded::HashLfuCache;
/// use tricache::traits::CachePolicy;
///
/// let cache: HashLfuCache<u64, String> = HashLfuCache::new(64, 4);
/// cache.put(1, "one".into());
/// cache.put(2, "two".into());
/// assert_eq!(cache.get(&2).as_deref(), Some("two"));
///
/// cache.purge();
/// assert_eq!(cache.get(&1), None);
/// ```
pub struct HashLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    shards: Vec<LfuCache<K, V>>,
    selector: ShardSelector,
}

impl<K, V> HashLfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a sharded LFU with the default decay threshold.
    pub fn new(total_capacity: usize, shard_count: usize) -> Self {
        Self::with_max_avg_freq(total_capacity, shard_count, DEFAULT_MAX_AVG_FREQ)
    }

    /// Creates a sharded LFU whose shards age once their average frequency
    /// exceeds `max_avg_freq`.
    ///
    /// # Panics
    ///
    /// Panics if `max_avg_freq` is 0; use [`try_new`](Self::try_new).
    pub fn with_max_avg_freq(total_capacity: usize, shard_count: usize, max_avg_freq: u64) -> Self {
        let selector = ShardSelector::with_default_parallelism(shard_count);
        let per_shard = shard_capacity(total_capacity, selector.shard_count());
        let shards = (0..selector.shard_count())
            .map(|_| LfuCache::with_max_avg_freq(per_shard, max_avg_freq))
            .collect();
        Self { shards, selector }
    }

    /// Fallible constructor: rejects a zero decay threshold and a fanout
    /// wider than the total capacity.
    pub fn try_new(
        total_capacity: usize,
        shard_count: usize,
        max_avg_freq: u64,
    ) -> Result<Self, ConfigError> {
        if max_avg_freq == 0 {
            return Err(ConfigError::new("max_avg_freq must be > 0"));
        }
        let selector = ShardSelector::with_default_parallelism(shard_count);
        validate_fanout(total_capacity, selector.shard_count())?;
        Ok(Self::with_max_avg_freq(
            total_capacity,
            shard_count,
            max_avg_freq,
        ))
    }

    fn shard(&self, key: &K) -> &LfuCache<K, V> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    /// Looks up `key` on its shard, promoting its frequency there.
    pub fn get(&self, key: &K) -> Option<V> {
        self.shard(key).get(key)
    }

    /// Presence on the key's shard.
    pub fn contains(&self, key: &K) -> bool {
        self.shard(key).contains(key)
    }

    /// Wipes every shard's entries and frequency state.
    pub fn purge(&self) {
        for shard in &self.shards {
            shard.purge();
        }
    }

    /// Total resident entries across all shards (not an atomic snapshot).
    pub fn len(&self) -> usize {
        self.shards.iter().map(LfuCache::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(LfuCache::is_empty)
    }

    /// Effective capacity: shard count × per-shard capacity.
    pub fn capacity(&self) -> usize {
        self.shards.iter().map(LfuCache::capacity).sum()
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.selector.shard_count()
    }
}

impl<K, V> CachePolicy<K, V> for HashLfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        self.shard(&key).put(key, value);
    }

    fn get_to(&self, key: &K, out: &mut V) -> bool {
        self.shard(key).get_to(key, out)
    }
}

impl<K, V> fmt::Debug for HashLfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashLfuCache")
            .field("shards", &self.shard_count())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_shard_capacity_is_ceiling() {
        let cache: HashLruCache<u64, u64> = HashLruCache::new(10, 4);
        assert_eq!(cache.shard_count(), 4);
        // ceil(10 / 4) = 3 per shard.
        assert_eq!(cache.capacity(), 12);
    }

    #[test]
    fn operations_route_to_one_shard() {
        let cache: HashLruCache<u64, String> = HashLruCache::new(16, 4);
        for i in 0..16u64 {
            cache.put(i, format!("v{i}"));
        }
        // Whatever was retained answers consistently through every op.
        for i in 0..16u64 {
            if let Some(value) = cache.get(&i) {
                assert_eq!(value, format!("v{i}"));
                assert!(cache.contains(&i));
            }
        }
    }

    #[test]
    fn remove_only_touches_own_shard() {
        // 8 entries per shard: eight keys can never overflow any shard.
        let cache: HashLruCache<u64, u64> = HashLruCache::new(32, 4);
        for i in 0..8u64 {
            cache.put(i, i);
        }
        let before = cache.len();
        assert_eq!(cache.remove(&3), Some(3));
        assert_eq!(cache.len(), before - 1);
        for i in (0..8u64).filter(|&i| i != 3) {
            assert!(cache.contains(&i), "unrelated key {i} was lost");
        }
    }

    #[test]
    fn zero_shard_count_defaults_to_parallelism() {
        let cache: HashLruCache<u64, u64> = HashLruCache::new(64, 0);
        assert!(cache.shard_count() >= 1);
    }

    #[test]
    fn try_new_rejects_overwide_fanout() {
        assert!(HashLruCache::<u64, u64>::try_new(4, 16).is_err());
        assert!(HashLruCache::<u64, u64>::try_new(16, 4).is_ok());
        assert!(HashLfuCache::<u64, u64>::try_new(16, 4, 0).is_err());
        assert!(HashLfuCache::<u64, u64>::try_new(16, 4, 10).is_ok());
    }

    #[test]
    fn lfu_purge_wipes_all_shards() {
        let cache: HashLfuCache<u64, u64> = HashLfuCache::new(16, 2);
        for i in 0..8u64 {
            cache.put(i, i);
        }
        assert!(!cache.is_empty());
        cache.purge();
        assert!(cache.is_empty());
        for i in 0..8u64 {
            assert_eq!(cache.get(&i), None);
        }
    }

    #[test]
    fn shards_are_independent_lrus() {
        // 2 shards × 2 slots: hammering one shard cannot evict keys that
        // hash to the other.
        let cache: HashLruCache<u64, u64> = HashLruCache::new(4, 2);
        let selector = ShardSelector::new(2);

        let probe = 0u64;
        let probe_shard = selector.shard_for_key(&probe);
        cache.put(probe, 42);

        // Flood keys of the other shard only.
        let mut flooded = 0;
        for i in 1..200u64 {
            if selector.shard_for_key(&i) != probe_shard {
                cache.put(i, i);
                flooded += 1;
            }
            if flooded == 20 {
                break;
            }
        }
        assert_eq!(cache.get(&probe), Some(42), "cross-shard eviction");
    }

    #[test]
    fn concurrent_shard_access() {
        use std::sync::Arc;

        let cache: Arc<HashLruCache<u64, u64>> = Arc::new(HashLruCache::new(256, 4));
        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..512u64 {
                        cache.put(t * 10_000 + i, i);
                        cache.get(&(t * 10_000 + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= cache.capacity());
    }
}
