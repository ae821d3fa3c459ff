//! Bounded recency list of evicted keys.
//!
//! Remembers the last `capacity` eviction victims — keys only, values are
//! gone — so an adaptive policy can recognise a miss on a recently evicted
//! key as a "near-hit": evidence that the evicting segment was too small.
//! Both ARC halves carry one of these.
//!
//! Orientation: back = most recently recorded, front = oldest. A full list
//! drops its front before accepting a new key.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;

/// Bounded keys-only recency list for ghost tracking.
///
/// # Example
///
/// ```
/// use tricache::ds::GhostList;
///
/// let mut ghost = GhostList::new(2);
/// ghost.record("a");
/// ghost.record("b");
/// ghost.record("c"); // full: "a" is forgotten
///
/// assert!(!ghost.contains(&"a"));
/// assert!(ghost.strike(&"b"));  // ghost hit consumes the entry
/// assert!(!ghost.contains(&"b"));
/// ```
#[derive(Debug)]
pub struct GhostList<K> {
    order: IntrusiveList<K>,
    index: FxHashMap<K, SlotId>,
    capacity: usize,
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a ghost list remembering at most `capacity` keys.
    ///
    /// Capacity 0 produces a list that ignores every record.
    pub fn new(capacity: usize) -> Self {
        Self {
            order: IntrusiveList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    /// Number of keys currently remembered.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no keys are remembered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Configured bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if `key` is remembered. This is the ghost-hit probe.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Remembers `key` as the most recent victim.
    ///
    /// A key already present is refreshed to the most-recent position; when
    /// full, the oldest remembered key is dropped first.
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }
        if let Some(&id) = self.index.get(&key) {
            self.order.move_to_back(id);
            return;
        }
        if self.order.len() >= self.capacity {
            self.forget_oldest();
        }
        let id = self.order.push_back(key.clone());
        self.index.insert(key, id);
    }

    /// Consumes a ghost hit: removes `key` and reports whether it was
    /// remembered.
    pub fn strike(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.order.remove(id);
                true
            },
            None => false,
        }
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    fn forget_oldest(&mut self) {
        if let Some(old) = self.order.pop_front() {
            self.index.remove(&old);
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.order.len(), self.index.len());
        assert!(self.order.len() <= self.capacity);
        for key in self.order.iter() {
            assert!(self.index.contains_key(key));
        }
        self.order.debug_validate_invariants();
    }
}
