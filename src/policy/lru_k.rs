//! # LRU-K admission filter
//!
//! Wraps a main LRU cache behind an observation gate: a key is admitted
//! only after it has been seen `k` times. Observations are tracked in a
//! second, bounded LRU mapping key → count, so keys that never return are
//! eventually forgotten instead of polluting the filter.
//!
//! ```text
//!   access(k)
//!      │
//!      ├─ resident in main ──► plain LRU behavior (put overwrites
//!      │                       directly, get refreshes recency)
//!      │
//!      └─ not resident ──► history[k] += 1
//!             │
//!             ├─ put and count ≥ K ──► admit: move into main,
//!             │                        forget history entry
//!             └─ otherwise ──► stay pending (a get cannot admit —
//!                              it has no value to install)
//! ```
//!
//! Both `put` and `get` count as observations. One-shot scans therefore
//! never displace the resident working set: a scanned key costs one
//! history slot, not a main-cache slot.
//!
//! This is composition, not inheritance — the filter owns two independent
//! [`LruCore`] engines and changes the semantics of both operations.

use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::policy::lru::LruCore;
use crate::traits::{CachePolicy, CoreCache, MutableCache};

/// Single-threaded LRU-K engine.
///
/// # Example
///
/// ```
/// use tricache::policy::lru_k::LruKCore;
/// use tricache::traits::CoreCache;
///
/// let mut cache = LruKCore::new(4, 16, 2);
/// cache.insert(1, "a");          // observation 1 of 2: pending
/// assert_eq!(cache.get(&1), None); // observation 2, but a get cannot admit
/// cache.insert(1, "a");          // observation 3 ≥ 2: admitted
/// assert_eq!(cache.get(&1), Some(&"a"));
/// ```
pub struct LruKCore<K, V>
where
    K: Eq + Hash + Clone,
{
    main: LruCore<K, V>,
    /// key → observation count for keys not yet admitted.
    history: LruCore<K, u64>,
    k: u64,
}

impl<K, V> LruKCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a filter admitting keys into a `main_capacity`-sized LRU
    /// after `k` observations, remembering at most `history_capacity`
    /// pending keys. `k` is clamped to at least 1 (`k == 1` admits on the
    /// first put, i.e. plain LRU).
    pub fn new(main_capacity: usize, history_capacity: usize, k: u64) -> Self {
        Self {
            main: LruCore::new(main_capacity),
            history: LruCore::new(history_capacity),
            k: k.max(1),
        }
    }

    /// The configured admission threshold.
    pub fn k_value(&self) -> u64 {
        self.k
    }

    /// Number of keys currently pending admission.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Observation count for a pending key. `None` once admitted or never
    /// seen.
    pub fn observations(&self, key: &K) -> Option<u64> {
        self.history.peek(key).copied()
    }

    /// Records one observation for a non-resident key and returns the new
    /// count.
    fn observe(&mut self, key: &K) -> u64 {
        let seen = self.history.peek(key).copied().unwrap_or(0) + 1;
        self.history.insert(key.clone(), seen);
        seen
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.main.debug_validate_invariants();
        self.history.debug_validate_invariants();
    }
}

impl<K, V> CoreCache<K, V> for LruKCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.main.contains(&key) {
            // Resident keys bypass the gate entirely.
            return self.main.insert(key, value);
        }

        if self.observe(&key) >= self.k {
            self.history.remove(&key);
            self.main.insert(key, value)
        } else {
            None
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        if self.main.contains(key) {
            return self.main.get(key);
        }
        // Pending: the observation counts, the lookup still misses.
        self.observe(key);
        None
    }

    fn contains(&self, key: &K) -> bool {
        self.main.contains(key)
    }

    fn len(&self) -> usize {
        self.main.len()
    }

    fn capacity(&self) -> usize {
        self.main.capacity()
    }

    fn clear(&mut self) {
        self.main.clear();
        self.history.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruKCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        self.history.remove(key);
        self.main.remove(key)
    }
}

impl<K, V> fmt::Debug for LruKCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruKCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("history_len", &self.history.len())
            .field("k", &self.k)
            .finish_non_exhaustive()
    }
}

/// Internally synchronised LRU-K cache.
///
/// # Example
///
/// ```
/// use tricache::policy::lru_k::LruKCache;
/// use tricache::traits::CachePolicy;
///
/// let cache: LruKCache<u32, String> = LruKCache::new(1, 4, 2);
/// cache.put(1, "a".into());
/// assert_eq!(cache.get(&1), None);     // admission pending
/// cache.put(1, "a".into());
/// assert_eq!(cache.get(&1).as_deref(), Some("a")); // admitted
/// ```
pub struct LruKCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Mutex<LruKCore<K, V>>,
}

impl<K, V> LruKCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// See [`LruKCore::new`].
    pub fn new(main_capacity: usize, history_capacity: usize, k: u64) -> Self {
        Self {
            inner: Mutex::new(LruKCore::new(main_capacity, history_capacity, k)),
        }
    }

    /// Looks up `key` in the main cache; a miss still counts as an
    /// observation.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Removes `key` from the main cache and forgets its history.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Presence in the main cache (pending keys are not resident).
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Number of admitted entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Main-cache capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// The configured admission threshold.
    pub fn k_value(&self) -> u64 {
        self.inner.lock().k_value()
    }

    /// Number of keys pending admission.
    pub fn history_len(&self) -> usize {
        self.inner.lock().history_len()
    }

    /// Drops admitted entries and pending history.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }
}

impl<K, V> CachePolicy<K, V> for LruKCache<K, V>
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

impl<K, V> fmt::Debug for LruKCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.lock().fmt(f)
    }
}
