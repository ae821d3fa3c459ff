//! # Adaptive Replacement Cache (ARC), two-part form
//!
//! Balances a recency (LRU) half against a frequency (LFU) half, each with
//! its own ghost list of recent eviction victims and its own dynamically
//! shifting capacity.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────────┐
//!   │                  ArcCache = Mutex<ArcCore>                        │
//!   │                                                                   │
//!   │   ┌────────────────────────┐      ┌────────────────────────────┐  │
//!   │   │  recency: ArcLruPart   │      │  frequency: ArcLfuPart     │  │
//!   │   │                        │      │                            │  │
//!   │   │  main LRU (cap_r)      │      │  main LFU (cap_f)          │  │
//!   │   │  ghost: victim keys    │      │  ghost: victim keys        │  │
//!   │   │  hit counter →         │──────►  mirrored entries          │  │
//!   │   │    promotion at        │mirror│  (access-proven keys)      │  │
//!   │   │    transform threshold │      │                            │  │
//!   │   └────────────────────────┘      └────────────────────────────┘  │
//!   │                                                                   │
//!   │   ghost hit in recency.ghost  → cap_f − 1, cap_r + 1              │
//!   │   ghost hit in frequency.ghost → cap_r − 1, cap_f + 1             │
//!   │   cap_r + cap_f is invariant (= 2 × construction capacity)        │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation flow
//!
//! ```text
//!   put(k, v):
//!     1. probe both ghosts; on a hit, shift one capacity unit toward
//!        the half whose ghost fired (if the other half can shrink)
//!     2. ghost hit    → absorb into the recency half only
//!        otherwise    → insert into recency; if that reports the entry
//!                       reached the transform threshold, mirror into
//!                       the frequency half
//!
//!   get(k):
//!     1. probe both ghosts (capacity-shift side effect only)
//!     2. recency hit  → mirror into frequency half when flagged; done
//!     3. otherwise    → frequency half decides
//! ```
//!
//! A recently promoted key can be resident in both halves; the recency
//! half is consulted first. Both halves are constructed with the full
//! `capacity`, so the effective budget is `2 × capacity` — the shape the
//! hit-rate characteristics of this design assume.
//!
//! The coordinator keeps the parts as plain data under one mutex
//! ([`ArcCache`]), so there is no lock ordering to get wrong.

pub mod lfu_part;
pub mod lru_part;

pub use lfu_part::ArcLfuPart;
pub use lru_part::ArcLruPart;

use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::traits::CachePolicy;

/// Default construction capacity for [`ArcCache::default`].
pub const DEFAULT_CAPACITY: usize = 10;

/// Default promotion threshold: accesses needed before a recency-half
/// entry is mirrored into the frequency half.
pub const DEFAULT_TRANSFORM_THRESHOLD: u64 = 2;

/// Single-threaded ARC coordinator.
///
/// # Example
///
/// ```
/// use tricache::policy::arc::ArcCore;
///
/// let mut cache = ArcCore::new(2, 2);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.insert(3, "c"); // recency half full: 1 evicted to its ghost
///
/// // Re-inserting the ghost key rewards the recency half with one
/// // capacity unit taken from the frequency half.
/// cache.insert(1, "a");
/// assert_eq!(cache.recency_capacity(), 3);
/// assert_eq!(cache.frequency_capacity(), 1);
/// assert_eq!(cache.get(&1), Some("a"));
/// ```
pub struct ArcCore<K, V>
where
    K: Eq + Hash + Clone,
{
    recency: ArcLruPart<K, V>,
    frequency: ArcLfuPart<K, V>,
}

impl<K, V> ArcCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a coordinator whose halves are each sized `capacity`
    /// (total budget `2 × capacity`).
    pub fn new(capacity: usize, transform_threshold: u64) -> Self {
        Self {
            recency: ArcLruPart::new(capacity, transform_threshold),
            frequency: ArcLfuPart::new(capacity),
        }
    }

    /// Inserts or overwrites `key` per the routing rules above.
    pub fn insert(&mut self, key: K, value: V) {
        let ghost_hit = self.check_ghosts(&key);
        if ghost_hit {
            // The miss is absorbed by the recency half alone.
            self.recency.insert(key, value);
        } else if self.recency.insert(key.clone(), value.clone()) {
            // Access-proven: mirror into the frequency half.
            self.frequency.insert(key, value);
        }
    }

    /// Looks up `key`: recency half first, then frequency half. Returns a
    /// clone of the value.
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.check_ghosts(key);

        let recency_hit = self
            .recency
            .get(key)
            .map(|(value, transform)| (value.clone(), transform));
        if let Some((value, transform)) = recency_hit {
            if transform {
                self.frequency.insert(key.clone(), value.clone());
            }
            return Some(value);
        }
        self.frequency.get(key).cloned()
    }

    /// Presence in either half; does not touch ghosts or metadata.
    pub fn contains(&self, key: &K) -> bool {
        self.recency.contains(key) || self.frequency.contains(key)
    }

    /// Resident entries across both halves. A recently promoted key that
    /// is mirrored in both halves counts twice.
    pub fn len(&self) -> usize {
        self.recency.len() + self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recency.is_empty() && self.frequency.is_empty()
    }

    /// Current capacity of the recency half.
    pub fn recency_capacity(&self) -> usize {
        self.recency.capacity()
    }

    /// Current capacity of the frequency half.
    pub fn frequency_capacity(&self) -> usize {
        self.frequency.capacity()
    }

    pub fn clear(&mut self) {
        self.recency.clear();
        self.frequency.clear();
    }

    /// Probes both ghost lists; on a hit, shifts one capacity unit toward
    /// the half whose ghost fired — but only when the shrinking half can
    /// actually give a unit up. Returns whether any ghost hit occurred.
    fn check_ghosts(&mut self, key: &K) -> bool {
        if self.recency.check_ghost(key) {
            if self.frequency.decrease_capacity() {
                self.recency.increase_capacity();
            }
            true
        } else if self.frequency.check_ghost(key) {
            if self.recency.decrease_capacity() {
                self.frequency.increase_capacity();
            }
            true
        } else {
            false
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.recency.debug_validate_invariants();
        self.frequency.debug_validate_invariants();
    }
}

impl<K, V> fmt::Debug for ArcCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCore")
            .field("recency_len", &self.recency.len())
            .field("recency_capacity", &self.recency.capacity())
            .field("frequency_len", &self.frequency.len())
            .field("frequency_capacity", &self.frequency.capacity())
            .finish_non_exhaustive()
    }
}

/// Internally synchronised adaptive cache.
///
/// # Example
///
/// ```
/// use tricache::policy::arc::ArcCache;
/// use tricache::traits::CachePolicy;
///
/// let cache: ArcCache<u32, String> = ArcCache::new(4);
/// cache.put(1, "a".into());
/// cache.put(2, "b".into());
///
/// let mut out = String::new();
/// assert!(cache.get_to(&1, &mut out));
/// assert_eq!(out, "a");
/// ```
pub struct ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Mutex<ArcCore<K, V>>,
}

impl<K, V> ArcCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache whose halves are each sized `capacity`, with the
    /// default promotion threshold.
    pub fn new(capacity: usize) -> Self {
        Self::with_threshold(capacity, DEFAULT_TRANSFORM_THRESHOLD)
    }

    /// Creates a cache with an explicit promotion threshold.
    pub fn with_threshold(capacity: usize, transform_threshold: u64) -> Self {
        Self {
            inner: Mutex::new(ArcCore::new(capacity, transform_threshold)),
        }
    }

    /// Looks up `key`, returning a clone of the value.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key)
    }

    /// Presence in either half.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Resident entries across both halves (mirrored keys count twice).
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Current capacity of the recency half.
    pub fn recency_capacity(&self) -> usize {
        self.inner.lock().recency_capacity()
    }

    /// Current capacity of the frequency half.
    pub fn frequency_capacity(&self) -> usize {
        self.inner.lock().frequency_capacity()
    }

    /// Drops every entry and all ghost state.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }
}

impl<K, V> Default for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> CachePolicy<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        self.inner.lock().insert(key, value);
    }

    fn get_to(&self, key: &K, out: &mut V) -> bool {
        match self.inner.lock().get(key) {
            Some(value) => {
                *out = value;
                true
            },
            None => false,
        }
    }
}

impl<K, V> fmt::Debug for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.lock().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_inserts_live_in_recency_half() {
        let mut cache = ArcCore::new(4, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");

        assert!(cache.contains(&1));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.recency_capacity(), 4);
        assert_eq!(cache.frequency_capacity(), 4);
        cache.debug_validate_invariants();
    }

    #[test]
    fn second_access_mirrors_into_frequency_half() {
        let mut cache = ArcCore::new(4, 2);
        cache.insert(1, "a");
        assert_eq!(cache.get(&1), Some("a")); // count 2 → mirrored

        // Both halves can now answer; the sum counts the mirror twice.
        assert_eq!(cache.len(), 2);
        cache.debug_validate_invariants();
    }

    #[test]
    fn recency_ghost_hit_shifts_capacity() {
        let mut cache = ArcCore::new(2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c"); // evicts 1 into the recency ghost

        assert!(!cache.contains(&1));

        cache.insert(1, "a"); // ghost hit
        assert_eq!(cache.recency_capacity(), 3);
        assert_eq!(cache.frequency_capacity(), 1);
        assert_eq!(
            cache.recency_capacity() + cache.frequency_capacity(),
            4,
            "capacity sum is invariant"
        );
        assert_eq!(cache.get(&1), Some("a"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn frequency_ghost_hit_shifts_capacity_back() {
        let mut cache = ArcCore::new(2, 2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.get(&1); // mirror 1
        cache.get(&2); // mirror 2 → frequency half full
        cache.insert(3, "c"); // recency evicts 1 → recency ghost

        // Recency ghost hit on 1: the shrinking frequency half is full, so
        // it evicts its least frequent (1, FIFO) into its own ghost first.
        cache.insert(1, "a");
        assert_eq!(cache.recency_capacity(), 3);
        assert_eq!(cache.frequency_capacity(), 1);

        // 1 is now remembered by the frequency ghost only. The next probe
        // shifts one unit back toward the frequency half.
        cache.get(&1);
        assert_eq!(cache.recency_capacity(), 2);
        assert_eq!(cache.frequency_capacity(), 2);
        assert_eq!(cache.recency_capacity() + cache.frequency_capacity(), 4);
        cache.debug_validate_invariants();
    }

    #[test]
    fn shift_refused_when_other_half_exhausted() {
        let mut cache = ArcCore::new(1, 2);
        cache.insert(1, "a");
        cache.insert(2, "b"); // evicts 1 → recency ghost
        cache.insert(1, "a"); // ghost hit: frequency (empty) gives up its
                              // only unit; recency 1 → 2, frequency 1 → 0
        assert_eq!(cache.recency_capacity(), 2);
        assert_eq!(cache.frequency_capacity(), 0);

        cache.insert(3, "c"); // evicts 2 → recency ghost
        // Ghost hit on 2, but the frequency half cannot shrink below 0:
        // capacities stay put and the request is still served.
        cache.insert(2, "b");
        assert_eq!(cache.recency_capacity(), 2);
        assert_eq!(cache.frequency_capacity(), 0);
        assert_eq!(cache.get(&2), Some("b"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn get_falls_through_to_frequency_half() {
        let mut cache = ArcCore::new(2, 2);
        cache.insert(1, "a");
        cache.get(&1); // mirrored into frequency half
        cache.insert(2, "b");
        cache.insert(3, "c"); // recency evicts 1 (its LRU)

        // 1 is gone from recency but survives in the frequency half.
        assert_eq!(cache.get(&1), Some("a"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn ghost_hit_routes_put_to_recency_only() {
        // Threshold 1 would normally mirror every insert into the
        // frequency half.
        let mut cache = ArcCore::new(2, 1);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c"); // recency evicts 1 → its ghost

        cache.insert(1, "a"); // ghost hit → absorbed by recency alone
        assert!(cache.recency.contains(&1));
        assert!(!cache.frequency.contains(&1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn zero_capacity_is_dead() {
        let mut cache: ArcCore<u32, &str> = ArcCore::new(0, 2);
        cache.insert(1, "a");
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn clear_resets_both_halves() {
        let mut cache = ArcCore::new(2, 2);
        cache.insert(1, "a");
        cache.get(&1);
        cache.insert(2, "b");
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
        cache.debug_validate_invariants();
    }

    #[test]
    fn locked_wrapper_contract() {
        let cache: ArcCache<u32, String> = ArcCache::with_threshold(2, 2);
        cache.put(1, "a".into());
        cache.put(2, "b".into());

        let mut out = String::new();
        assert!(cache.get_to(&1, &mut out));
        assert_eq!(out, "a");
        assert!(!cache.get_to(&9, &mut out));
        assert_eq!(out, "a");
        assert_eq!(cache.get_or_default(&9), "");

        let defaulted: ArcCache<u32, u32> = ArcCache::default();
        assert_eq!(defaulted.recency_capacity(), DEFAULT_CAPACITY);
    }
}
