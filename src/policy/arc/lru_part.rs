//! Recency half of the adaptive cache.
//!
//! A bounded LRU segment with a per-entry hit counter and a ghost list of
//! eviction victims. The hit counter drives promotion: once an entry has
//! been touched `transform_threshold` times it qualifies for mirroring
//! into the frequency half. The capacity is mutable in single steps so the
//! coordinator can reward this half on ghost hits.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::ghost_list::GhostList;
use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;

#[derive(Debug)]
struct PartEntry<K, V> {
    key: K,
    value: V,
    access_count: u64,
}

/// LRU segment with ghost tracking and promotion counting.
#[derive(Debug)]
pub struct ArcLruPart<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    /// front = most recent, back = eviction victim.
    order: IntrusiveList<PartEntry<K, V>>,
    ghost: GhostList<K>,
    capacity: usize,
    transform_threshold: u64,
}

impl<K, V> ArcLruPart<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates the half with `capacity` main slots and a ghost list bounded
    /// by the same initial capacity.
    pub fn new(capacity: usize, transform_threshold: u64) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: IntrusiveList::with_capacity(capacity),
            ghost: GhostList::new(capacity),
            capacity,
            transform_threshold,
        }
    }

    /// Inserts or overwrites `key`.
    ///
    /// Returns `true` iff the entry now qualifies for promotion into the
    /// frequency half (its access count has reached the transform
    /// threshold) — not whether an insert happened.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.capacity == 0 {
            return false;
        }

        if let Some(&id) = self.index.get(&key) {
            self.order.move_to_front(id);
            let Some(entry) = self.order.get_mut(id) else {
                return false;
            };
            entry.value = value;
            entry.access_count += 1;
            return entry.access_count >= self.transform_threshold;
        }

        if self.index.len() >= self.capacity {
            self.evict_to_ghost();
        }
        let count = 1;
        let id = self.order.push_front(PartEntry {
            key: key.clone(),
            value,
            access_count: count,
        });
        self.index.insert(key, id);
        count >= self.transform_threshold
    }

    /// Looks up `key`, refreshing recency and bumping the hit counter.
    ///
    /// The second tuple element reports whether the entry has reached the
    /// transform threshold and should be mirrored into the frequency half.
    pub fn get(&mut self, key: &K) -> Option<(&V, bool)> {
        let &id = self.index.get(key)?;
        self.order.move_to_front(id);
        let should_transform = {
            let entry = self.order.get_mut(id)?;
            entry.access_count += 1;
            entry.access_count >= self.transform_threshold
        };
        self.order
            .get(id)
            .map(|entry| (&entry.value, should_transform))
    }

    /// Consumes a ghost hit for `key`; `true` if it was remembered.
    pub fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.strike(key)
    }

    /// Grants this half one more main slot.
    pub fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    /// Takes one main slot away, evicting a victim first when full.
    /// Returns `false` when the capacity is already 0 and cannot shrink.
    pub fn decrease_capacity(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.index.len() >= self.capacity {
            self.evict_to_ghost();
        }
        self.capacity -= 1;
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ghost_len(&self) -> usize {
        self.ghost.len()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.ghost.clear();
    }

    fn evict_to_ghost(&mut self) {
        if let Some(entry) = self.order.pop_back() {
            self.index.remove(&entry.key);
            // Keys only: the value is dropped here.
            self.ghost.record(entry.key);
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.order.len());
        assert!(self.index.len() <= self.capacity);
        self.order.debug_validate_invariants();
        self.ghost.debug_validate_invariants();
        for entry in self.order.iter() {
            assert!(self.index.contains_key(&entry.key));
            assert!(
                !self.ghost.contains(&entry.key),
                "key resident in both main and ghost"
            );
        }
    }
}
