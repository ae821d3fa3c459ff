//! # Least Recently Used (LRU) cache
//!
//! O(1) recency-ordered bounded map: a hash index from key to list slot,
//! and an arena-backed recency list ordered most → least recently used.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                        LruCache<K, V>                        │
//!   │                 Mutex<LruCore<K, V>> (one lock)              │
//!   │                              │                               │
//!   │  ┌───────────────────────────▼────────────────────────────┐  │
//!   │  │                     LruCore<K, V>                      │  │
//!   │  │                                                        │  │
//!   │  │  index: FxHashMap<K, SlotId>                           │  │
//!   │  │     k1 ──► id_2      k2 ──► id_0      k3 ──► id_1      │  │
//!   │  │                                                        │  │
//!   │  │  order: IntrusiveList<LruEntry>                        │  │
//!   │  │     front ─► [id_1] ◄──► [id_2] ◄──► [id_0] ◄─ back    │  │
//!   │  │              (MRU)                    (LRU)            │  │
//!   │  │                                        ▲               │  │
//!   │  │                              eviction victim           │  │
//!   │  └────────────────────────────────────────────────────────┘  │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A hit (get, touch, or overwriting put) splices the entry to the front;
//! inserting into a full cache pops the back. Entries live in the list's
//! arena — the index holds non-owning `SlotId` handles, so removal is one
//! unlink plus one map erase, and there is no ownership cycle to leak.
//!
//! | Operation        | Complexity | Notes                              |
//! |------------------|------------|------------------------------------|
//! | `put` / `insert` | O(1)       | may evict the back entry           |
//! | `get`            | O(1)       | splices to front, bumps hit count  |
//! | `peek`           | O(1)       | no reorder                         |
//! | `remove`         | O(1)       | unlink + erase                     |
//!
//! [`LruCore`] is the single-threaded engine; [`LruCache`] wraps it in a
//! `parking_lot::Mutex` and implements [`CachePolicy`] for shared-reference
//! concurrent use.

use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::traits::{CachePolicy, CoreCache, MutableCache};

#[derive(Debug)]
struct LruEntry<K, V> {
    key: K,
    value: V,
    access_count: u64,
}

/// Single-threaded LRU engine.
///
/// # Example
///
/// ```
/// use tricache::policy::lru::LruCore;
/// use tricache::traits::{CoreCache, MutableCache};
///
/// let mut cache = LruCore::new(2);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
///
/// cache.get(&1);          // 1 becomes most recent
/// cache.insert(3, "three"); // evicts 2
///
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// assert_eq!(cache.remove(&3), Some("three"));
/// ```
pub struct LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, SlotId>,
    /// front = most recently used, back = eviction victim.
    order: IntrusiveList<LruEntry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine holding at most `capacity` entries. Capacity 0
    /// yields a dead cache: every insert is a no-op.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: IntrusiveList::with_capacity(capacity),
            capacity,
        }
    }

    /// Looks up without touching recency order or the hit counter.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let &id = self.index.get(key)?;
        self.order.get(id).map(|entry| &entry.value)
    }

    /// Marks `key` as most recently used without reading its value.
    /// Returns `false` if the key is not resident.
    pub fn touch(&mut self, key: &K) -> bool {
        let Some(&id) = self.index.get(key) else {
            return false;
        };
        self.order.move_to_front(id);
        if let Some(entry) = self.order.get_mut(id) {
            entry.access_count += 1;
        }
        true
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.order.pop_back()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// The least recently used entry, without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.order.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Number of recorded hits for `key` (1 at insertion, +1 per hit).
    pub fn access_count(&self, key: &K) -> Option<u64> {
        let &id = self.index.get(key)?;
        self.order.get(id).map(|entry| entry.access_count)
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.order.pop_back() {
            self.index.remove(&entry.key);
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.order.len());
        assert!(self.index.len() <= self.capacity);
        self.order.debug_validate_invariants();
        for entry in self.order.iter() {
            assert!(self.index.contains_key(&entry.key));
        }
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.order.move_to_front(id);
            let entry = self.order.get_mut(id)?;
            entry.access_count += 1;
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.capacity == 0 {
            return None;
        }
        if self.index.len() >= self.capacity {
            self.evict_lru();
        }

        let id = self.order.push_front(LruEntry {
            key: key.clone(),
            value,
            access_count: 1,
        });
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let &id = self.index.get(key)?;
        self.order.move_to_front(id);
        if let Some(entry) = self.order.get_mut(id) {
            entry.access_count += 1;
        }
        self.order.get(id).map(|entry| &entry.value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.order.remove(id).map(|entry| entry.value)
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Internally synchronised LRU cache.
///
/// One exclusive lock covers the whole engine; operations on one instance
/// are linearisable and callers may share a `&LruCache` across threads.
///
/// # Example
///
/// ```
/// use tricache::policy::lru::LruCache;
/// use tricache::traits::CachePolicy;
///
/// let cache: LruCache<u32, String> = LruCache::new(2);
/// cache.put(1, "a".into());
/// cache.put(2, "b".into());
/// cache.get(&1);                 // refresh 1
/// cache.put(3, "c".into());      // evicts 2
///
/// assert_eq!(cache.get(&1).as_deref(), Some("a"));
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.get(&3).as_deref(), Some("c"));
/// ```
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Mutex<LruCore<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LruCore::new(capacity)),
        }
    }

    /// Looks up `key`, refreshing its recency. Returns a clone of the
    /// value.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Looks up without touching recency order.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.lock().peek(key).cloned()
    }

    /// Marks `key` as most recently used; `false` if absent.
    pub fn touch(&self, key: &K) -> bool {
        self.inner.lock().touch(key)
    }

    /// Removes `key`, returning its value if it was resident.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, V)> {
        self.inner.lock().pop_lru()
    }

    /// Presence check; does not affect recency.
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

    /// Drops every entry.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }
}

impl<K, V> CachePolicy<K, V> for LruCache<K, V>
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

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LruCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish_non_exhaustive()
    }
}
