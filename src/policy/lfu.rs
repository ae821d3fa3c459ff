//! # Least Frequently Used (LFU) cache with average-frequency decay
//!
//! Bounded map ordered by access frequency. Values live in a hash table;
//! ordering lives in a [`FrequencyBuckets`] index — an ordered map of
//! frequency classes whose first entry is always the eviction class. The
//! victim is the oldest entry of that lowest class, so ties inside a
//! frequency class break FIFO.
//!
//! ## Aging
//!
//! Plain LFU never forgets: a key that was hot last week outranks every
//! newcomer forever. This engine keeps a running `total_freq` and, whenever
//! `total_freq / len` exceeds `max_avg_freq` (default
//! [`DEFAULT_MAX_AVG_FREQ`]), decays every entry to
//! `max(1, freq − max_avg_freq / 2)` in one sweep and recomputes
//! `total_freq` from the survivors. Stale-but-once-hot entries drift back
//! toward the eviction end instead of pinning the cache.
//!
//! ```text
//!   access ─► bump total ─► avg = total / len ─┬─ avg ≤ max ─► done
//!                                              └─ avg > max ─► age sweep
//! ```
//!
//! [`LfuCore`] is the single-threaded engine; [`LfuCache`] wraps it in a
//! mutex, implements [`CachePolicy`], and adds `purge`.

use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::frequency_buckets::FrequencyBuckets;
use crate::error::ConfigError;
use crate::traits::{CachePolicy, CoreCache, MutableCache};

/// Decay threshold used by `new`: aging triggers once the average access
/// frequency exceeds this.
pub const DEFAULT_MAX_AVG_FREQ: u64 = 10;

/// Single-threaded LFU engine with average-frequency decay.
///
/// # Example
///
/// ```
/// use tricache::policy::lfu::LfuCore;
/// use tricache::traits::CoreCache;
///
/// let mut cache = LfuCore::new(2, 10);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.get(&1); // freq(1) = 2
///
/// cache.insert(3, "c"); // evicts 2, the least frequent
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// ```
pub struct LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    values: FxHashMap<K, V>,
    freqs: FrequencyBuckets<K>,
    capacity: usize,
    max_avg_freq: u64,
    /// Sum of all resident entries' frequencies.
    total_freq: u64,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine holding at most `capacity` entries, aging once the
    /// average frequency exceeds `max_avg_freq` (clamped to at least 1).
    pub fn new(capacity: usize, max_avg_freq: u64) -> Self {
        Self {
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            freqs: FrequencyBuckets::with_capacity(capacity),
            capacity,
            max_avg_freq: max_avg_freq.max(1),
            total_freq: 0,
        }
    }

    /// Current frequency of `key`, if resident.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.freqs.frequency(key)
    }

    /// Lowest frequency among resident entries, `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        self.freqs.min_freq()
    }

    /// Sum of all resident entries' frequencies.
    pub fn total_freq(&self) -> u64 {
        self.total_freq
    }

    /// Configured decay threshold.
    pub fn max_avg_freq(&self) -> u64 {
        self.max_avg_freq
    }

    /// Drops all entries and counters, keeping configuration.
    pub fn purge(&mut self) {
        self.values.clear();
        self.freqs.clear();
        self.total_freq = 0;
    }

    fn evict(&mut self) {
        if let Some((key, freq)) = self.freqs.pop_min() {
            self.values.remove(&key);
            self.total_freq = self.total_freq.saturating_sub(freq);
        }
    }

    /// One more access happened: grow the total and age if the average
    /// climbed past the threshold.
    fn bump_total(&mut self) {
        self.total_freq += 1;
        let len = self.values.len() as u64;
        if len > 0 && self.total_freq / len > self.max_avg_freq {
            self.total_freq = self.freqs.age(self.max_avg_freq / 2);
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.values.len(), self.freqs.len());
        assert!(self.values.len() <= self.capacity);
        self.freqs.debug_validate_invariants();
        for key in self.values.keys() {
            assert!(self.freqs.contains(key));
        }
    }
}

impl<K, V> CoreCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(slot) = self.values.get_mut(&key) {
            let previous = std::mem::replace(slot, value);
            // An overwrite counts as an access: same promotion as a hit.
            self.freqs.touch(&key);
            self.bump_total();
            return Some(previous);
        }

        if self.values.len() >= self.capacity {
            self.evict();
        }
        self.values.insert(key.clone(), value);
        self.freqs.insert(key);
        self.bump_total();
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        if !self.values.contains_key(key) {
            return None;
        }
        self.freqs.touch(key);
        self.bump_total();
        self.values.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.purge();
    }
}

impl<K, V> MutableCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.values.remove(key)?;
        if let Some(freq) = self.freqs.remove(key) {
            self.total_freq = self.total_freq.saturating_sub(freq);
        }
        Some(value)
    }
}

impl<K, V> fmt::Debug for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("total_freq", &self.total_freq)
            .field("max_avg_freq", &self.max_avg_freq)
            .finish_non_exhaustive()
    }
}

/// Internally synchronised LFU cache with average-frequency decay.
///
/// # Example
///
/// ```
/// use tricache::policy::lfu::LfuCache;
/// use tricache::traits::CachePolicy;
///
/// let cache: LfuCache<u32, String> = LfuCache::new(2);
/// cache.put(1, "a".into());
/// cache.put(2, "b".into());
/// cache.get(&1);
/// cache.get(&1);
///
/// cache.put(3, "c".into()); // evicts 2 (lowest frequency)
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.get(&1).as_deref(), Some("a"));
/// ```
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Mutex<LfuCore<K, V>>,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache with the default decay threshold
    /// ([`DEFAULT_MAX_AVG_FREQ`]).
    pub fn new(capacity: usize) -> Self {
        Self::with_max_avg_freq(capacity, DEFAULT_MAX_AVG_FREQ)
    }

    /// Creates a cache aging once the average frequency exceeds
    /// `max_avg_freq`.
    ///
    /// # Panics
    ///
    /// Panics if `max_avg_freq` is 0; use [`try_new`](Self::try_new) to
    /// handle that as an error.
    pub fn with_max_avg_freq(capacity: usize, max_avg_freq: u64) -> Self {
        assert!(max_avg_freq > 0, "max_avg_freq must be > 0");
        Self {
            inner: Mutex::new(LfuCore::new(capacity, max_avg_freq)),
        }
    }

    /// Fallible constructor: rejects `max_avg_freq == 0`.
    ///
    /// ```
    /// use tricache::policy::lfu::LfuCache;
    ///
    /// assert!(LfuCache::<u32, u32>::try_new(10, 0).is_err());
    /// assert!(LfuCache::<u32, u32>::try_new(10, 5).is_ok());
    /// ```
    pub fn try_new(capacity: usize, max_avg_freq: u64) -> Result<Self, ConfigError> {
        if max_avg_freq == 0 {
            return Err(ConfigError::new("max_avg_freq must be > 0"));
        }
        Ok(Self::with_max_avg_freq(capacity, max_avg_freq))
    }

    /// Looks up `key`, promoting its frequency. Returns a clone of the
    /// value.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Current frequency of `key`, if resident. Does not count as an
    /// access.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    /// Lowest frequency among resident entries.
    pub fn min_freq(&self) -> Option<u64> {
        self.inner.lock().min_freq()
    }

    /// Wipes all entries and frequency state without destroying the cache.
    pub fn purge(&self) {
        self.inner.lock().purge()
    }

    /// Presence check; does not count as an access.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum number of resident entries.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Configured decay threshold.
    pub fn max_avg_freq(&self) -> u64 {
        self.inner.lock().max_avg_freq()
    }
}

impl<K, V> CachePolicy<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        self.inner.lock().insert(key, value);
    }

    fn get_to(&self, key: &K, out: &mut V) -> bool {
        let mut core = self.inner.lock();
        match core.get(key) {
            Some(value) => {
                out.clone_from(value);
                true
            },
            None => false,
        }
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LfuCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_frequent() {
        let mut cache = LfuCore::new(2, 10);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.get(&1); // 1: freq 2, 2: freq 1

        cache.insert(3, "c"); // evicts 2
        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
        assert!(cache.contains(&3));
        cache.debug_validate_invariants();
    }

    #[test]
    fn frequency_tie_breaks_fifo() {
        let mut cache = LfuCore::new(3, 100);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");
        // All freq 1; oldest insert (1) is the victim.
        cache.insert(4, "d");

        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn overwrite_promotes_like_a_hit() {
        let mut cache = LfuCore::new(2, 100);
        cache.insert(1, "a");
        cache.insert(2, "b");
        assert_eq!(cache.insert(1, "a2"), Some("a")); // 1: freq 2

        cache.insert(3, "c"); // evicts 2, not 1
        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
        assert_eq!(cache.get(&1), Some(&"a2"));
    }

    #[test]
    fn total_freq_tracks_sum() {
        let mut cache = LfuCore::new(3, 100);
        cache.insert(1, "a"); // total 1
        cache.insert(2, "b"); // total 2
        cache.get(&1); // total 3
        cache.get(&1); // total 4
        assert_eq!(cache.total_freq(), 4);
        assert_eq!(cache.frequency(&1), Some(3));
        assert_eq!(cache.frequency(&2), Some(1));

        // Evicting 2 (freq 1) subtracts its frequency.
        cache.insert(3, "c");
        cache.insert(4, "d");
        cache.debug_validate_invariants();
    }

    #[test]
    fn aging_decays_all_entries() {
        // max_avg_freq 2 → decay 1, triggered once avg > 2.
        let mut cache = LfuCore::new(2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        // Hammer 1 until the average crosses the threshold.
        for _ in 0..4 {
            cache.get(&1);
        }
        // Before aging could trigger: freq(1) up to 5, freq(2) = 1,
        // total would be 6 > 2*2, so a sweep has happened.
        let f1 = cache.frequency(&1).unwrap();
        let f2 = cache.frequency(&2).unwrap();
        assert!(f1 < 5, "hot entry must have been decayed, got {f1}");
        assert_eq!(f2, 1, "floor is 1");
        assert_eq!(cache.total_freq(), f1 + f2);
        assert_eq!(cache.min_freq(), Some(f2.min(f1)));
        cache.debug_validate_invariants();
    }

    #[test]
    fn decay_caps_hot_entry_frequency() {
        // With a threshold of 2 the sweep fires as soon as the average
        // crosses 2, so a hammered key can never run away.
        let mut cache = LfuCore::new(2, 2);
        cache.insert(1, "hot");
        for _ in 0..10 {
            cache.get(&1);
        }
        assert!(cache.frequency(&1).unwrap() <= 3);

        // Structure stays sound under newcomer churn afterwards.
        for i in 100..120 {
            cache.insert(i, "cold");
        }
        assert_eq!(cache.len(), 2);
        cache.debug_validate_invariants();
    }

    #[test]
    fn zero_capacity_is_dead() {
        let mut cache = LfuCore::new(0, 10);
        assert_eq!(cache.insert(1, "a"), None);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn remove_subtracts_frequency() {
        let mut cache = LfuCore::new(3, 100);
        cache.insert(1, "a");
        cache.get(&1);
        cache.insert(2, "b");
        assert_eq!(cache.total_freq(), 3);

        assert_eq!(cache.remove(&1), Some("a"));
        assert_eq!(cache.total_freq(), 1);
        assert_eq!(cache.min_freq(), Some(1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn purge_resets_but_keeps_config() {
        let mut cache = LfuCore::new(3, 7);
        cache.insert(1, "a");
        cache.get(&1);
        cache.purge();

        assert!(cache.is_empty());
        assert_eq!(cache.total_freq(), 0);
        assert_eq!(cache.min_freq(), None);
        assert_eq!(cache.capacity(), 3);
        assert_eq!(cache.max_avg_freq(), 7);

        cache.insert(2, "b");
        assert_eq!(cache.frequency(&2), Some(1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn locked_wrapper_contract() {
        let cache: LfuCache<u32, String> = LfuCache::new(2);
        cache.put(1, "a".into());
        cache.put(2, "b".into());
        cache.get(&1);
        cache.get(&1);
        cache.get(&2);

        cache.put(3, "c".into()); // 2 has the lowest frequency
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1).as_deref(), Some("a"));
        assert_eq!(cache.get(&3).as_deref(), Some("c"));

        cache.purge();
        assert!(cache.is_empty());
    }

    #[test]
    #[should_panic(expected = "max_avg_freq")]
    fn zero_threshold_panics() {
        let _ = LfuCache::<u32, u32>::with_max_avg_freq(10, 0);
    }
}
