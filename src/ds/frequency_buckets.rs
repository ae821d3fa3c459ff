//! Frequency-ordered key index for LFU-style policies.
//!
//! Maps each key to an access frequency and keeps every frequency class in
//! its own age-ordered bucket. Buckets live in an ordered map keyed by
//! frequency, so the minimum class is always the map's first entry — there
//! is no separate minimum to track and nothing to repair when a class
//! drains.
//!
//! ```text
//!   buckets (BTreeMap, ascending)
//!   ├─ 2 ─► oldest [k1] ◄─ [k4] ◄─ [k9] newest    ◄─ eviction end
//!   ├─ 5 ─► oldest [k7] newest
//!   └─ 9 ─► oldest [k0] ◄─ [k2] newest
//! ```
//!
//! Entries sit in a slot arena and chain through `older`/`newer` links
//! inside their bucket. Every mutation is the same two moves: detach the
//! entry from its class (dropping the class when it drains), then attach
//! it at the newest end of the target class. `pop_min` takes the oldest
//! entry of the first class, so same-frequency entries leave FIFO. `age`
//! applies a bulk frequency decay (floor 1) and rebuilds the map, which is
//! what an average-frequency decay policy needs.

use std::collections::BTreeMap;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Entry<K> {
    key: K,
    freq: u64,
    /// Neighbor attached after this one (toward the newest end).
    newer: Option<SlotId>,
    /// Neighbor attached before this one (toward the eviction end).
    older: Option<SlotId>,
}

#[derive(Debug)]
struct Bucket {
    newest: Option<SlotId>,
    oldest: Option<SlotId>,
}

/// Frequency-bucketed key index; the lowest class is always first.
#[derive(Debug)]
pub struct FrequencyBuckets<K> {
    entries: SlotArena<Entry<K>>,
    index: FxHashMap<K, SlotId>,
    buckets: BTreeMap<u64, Bucket>,
}

impl<K> FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: SlotArena::new(),
            index: FxHashMap::default(),
            buckets: BTreeMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Current frequency of `key`, if tracked.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| entry.freq)
    }

    /// Lowest frequency among tracked keys, `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        self.buckets.first_key_value().map(|(&freq, _)| freq)
    }

    /// Oldest key of the lowest class — the next eviction victim.
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        let (_, bucket) = self.buckets.first_key_value()?;
        let entry = self.entries.get(bucket.oldest?)?;
        Some((&entry.key, entry.freq))
    }

    /// Starts tracking `key` at frequency 1. Returns `false` if already
    /// tracked.
    pub fn insert(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        let id = self.entries.insert(Entry {
            key: key.clone(),
            freq: 1,
            newer: None,
            older: None,
        });
        self.index.insert(key, id);
        self.attach(id, 1);
        true
    }

    /// Promotes `key` one frequency class up, returning the new frequency.
    ///
    /// A saturated counter stays in its class; the promotion then only
    /// refreshes the entry to the newest end.
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let freq = self.entries.get(id)?.freq;
        let next = freq.saturating_add(1);

        self.detach(id, freq);
        if let Some(entry) = self.entries.get_mut(id) {
            entry.freq = next;
        }
        self.attach(id, next);
        Some(next)
    }

    /// Stops tracking `key`, returning its last frequency.
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        let id = self.index.remove(key)?;
        let freq = self.entries.get(id)?.freq;
        self.detach(id, freq);
        self.entries.remove(id).map(|entry| entry.freq)
    }

    /// Removes and returns the eviction victim: the oldest key of the
    /// lowest class.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        let (freq, id) = {
            let (&freq, bucket) = self.buckets.first_key_value()?;
            (freq, bucket.oldest?)
        };
        self.detach(id, freq);
        let entry = self.entries.remove(id)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.freq))
    }

    /// Bulk decay: every frequency becomes `max(1, freq − decay)` and the
    /// bucket map is rebuilt. Returns the sum of the new frequencies.
    ///
    /// The sweep snapshots entry order first (ascending frequency, oldest
    /// first within a class) and only then reassigns, so no bucket is read
    /// while being rewritten. Re-attaching in that order keeps FIFO order
    /// inside merged classes.
    pub fn age(&mut self, decay: u64) -> u64 {
        let mut survivors = Vec::with_capacity(self.entries.len());
        for bucket in self.buckets.values() {
            let mut cursor = bucket.oldest;
            while let Some(id) = cursor {
                survivors.push(id);
                cursor = self.entries.get(id).and_then(|entry| entry.newer);
            }
        }

        self.buckets.clear();

        let mut total = 0u64;
        for id in survivors {
            let new_freq = {
                let entry = self.entries.get_mut(id).expect("aged entry missing");
                entry.freq = entry.freq.saturating_sub(decay).max(1);
                entry.newer = None;
                entry.older = None;
                entry.freq
            };
            self.attach(id, new_freq);
            total += new_freq;
        }
        total
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.buckets.clear();
    }

    /// Links `id` at the newest end of class `freq`, creating the class if
    /// absent.
    fn attach(&mut self, id: SlotId, freq: u64) {
        let bucket = self.buckets.entry(freq).or_insert(Bucket {
            newest: None,
            oldest: None,
        });
        let displaced = bucket.newest.replace(id);
        if bucket.oldest.is_none() {
            bucket.oldest = Some(id);
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.older = displaced;
            entry.newer = None;
        }
        if let Some(prev) = displaced
            && let Some(entry) = self.entries.get_mut(prev)
        {
            entry.newer = Some(id);
        }
    }

    /// Unlinks `id` from class `freq`, dropping the class when it drains.
    fn detach(&mut self, id: SlotId, freq: u64) {
        let (newer, older) = match self.entries.get(id) {
            Some(entry) => (entry.newer, entry.older),
            None => return,
        };

        if let Some(n) = newer
            && let Some(entry) = self.entries.get_mut(n)
        {
            entry.older = older;
        }
        if let Some(o) = older
            && let Some(entry) = self.entries.get_mut(o)
        {
            entry.newer = newer;
        }

        let drained = match self.buckets.get_mut(&freq) {
            Some(bucket) => {
                if bucket.newest == Some(id) {
                    bucket.newest = older;
                }
                if bucket.oldest == Some(id) {
                    bucket.oldest = newer;
                }
                bucket.newest.is_none()
            },
            None => false,
        };
        if drained {
            self.buckets.remove(&freq);
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.newer = None;
            entry.older = None;
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.len(), self.index.len());

        if self.is_empty() {
            assert!(self.buckets.is_empty());
            return;
        }

        let mut walked = 0usize;
        let mut last_freq = None;
        for (&freq, bucket) in &self.buckets {
            assert!(last_freq < Some(freq), "bucket map out of order");
            last_freq = Some(freq);
            assert!(bucket.oldest.is_some(), "drained class not dropped");

            let mut cursor = bucket.oldest;
            let mut behind = None;
            while let Some(id) = cursor {
                let entry = self.entries.get(id).expect("bucket entry missing");
                assert_eq!(entry.freq, freq);
                assert_eq!(entry.older, behind);
                assert_eq!(self.index.get(&entry.key), Some(&id));
                behind = Some(id);
                cursor = entry.newer;
                walked += 1;
                assert!(walked <= self.len());
            }
            assert_eq!(bucket.newest, behind);
        }
        assert_eq!(walked, self.len());
    }
}

impl<K> Default for FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
