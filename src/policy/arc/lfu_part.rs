//! Frequency half of the adaptive cache.
//!
//! A bounded LFU segment: values in a hash table, ordering in a
//! [`FrequencyBuckets`] index, victims remembered in a ghost list. No
//! aging here — entries arrive already proven (mirrored once the recency
//! half has seen them enough), and the coordinator's capacity shifts do
//! the adapting.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::frequency_buckets::FrequencyBuckets;
use crate::ds::ghost_list::GhostList;

/// LFU segment with ghost tracking.
#[derive(Debug)]
pub struct ArcLfuPart<K, V>
where
    K: Eq + Hash + Clone,
{
    values: FxHashMap<K, V>,
    freqs: FrequencyBuckets<K>,
    ghost: GhostList<K>,
    capacity: usize,
}

impl<K, V> ArcLfuPart<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates the half with `capacity` main slots and a ghost list bounded
    /// by the same initial capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            freqs: FrequencyBuckets::with_capacity(capacity),
            ghost: GhostList::new(capacity),
            capacity,
        }
    }

    /// Inserts or overwrites `key`. An overwrite promotes the entry's
    /// frequency like a hit. Returns `false` only for a dead (capacity 0)
    /// half.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.capacity == 0 {
            return false;
        }

        if let Some(slot) = self.values.get_mut(&key) {
            *slot = value;
            self.freqs.touch(&key);
            return true;
        }

        if self.values.len() >= self.capacity {
            self.evict_to_ghost();
        }
        self.values.insert(key.clone(), value);
        self.freqs.insert(key);
        true
    }

    /// Looks up `key`, promoting its frequency.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.values.contains_key(key) {
            return None;
        }
        self.freqs.touch(key);
        self.values.get(key)
    }

    /// Consumes a ghost hit for `key`; `true` if it was remembered.
    pub fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.strike(key)
    }

    /// Grants this half one more main slot.
    pub fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    /// Takes one main slot away, evicting the least frequent entry first
    /// when full. Returns `false` when the capacity is already 0.
    pub fn decrease_capacity(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.values.len() >= self.capacity {
            self.evict_to_ghost();
        }
        self.capacity -= 1;
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ghost_len(&self) -> usize {
        self.ghost.len()
    }

    /// Current frequency of `key`, if resident.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.freqs.frequency(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.freqs.clear();
        self.ghost.clear();
    }

    fn evict_to_ghost(&mut self) {
        if let Some((key, _)) = self.freqs.pop_min() {
            self.values.remove(&key);
            self.ghost.record(key);
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.values.len(), self.freqs.len());
        assert!(self.values.len() <= self.capacity);
        self.freqs.debug_validate_invariants();
        self.ghost.debug_validate_invariants();
        for key in self.values.keys() {
            assert!(self.freqs.contains(key));
            assert!(
                !self.ghost.contains(key),
                "key resident in both main and ghost"
            );
        }
    }
}
