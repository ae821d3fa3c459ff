//! Deterministic key-to-shard routing.
//!
//! Maps any hashable key to `hash(key) mod shards`. The same key always
//! lands on the same shard, so a sharded cache can hand every operation
//! for a key to one sub-cache with no cross-shard coordination.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::num::NonZeroUsize;
use std::thread;

/// Maps keys to shard indices in `[0, shards)`.
///
/// # Example
///
/// ```
/// use tricache::ds::ShardSelector;
///
/// let selector = ShardSelector::new(4);
/// let shard = selector.shard_for_key(&"user:42");
/// assert!(shard < 4);
/// // Deterministic: same key, same shard.
/// assert_eq!(selector.shard_for_key(&"user:42"), shard);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
}

impl ShardSelector {
    /// Creates a selector for `shards` shards, clamped to at least 1.
    pub fn new(shards: usize) -> Self {
        Self {
            shards: shards.max(1),
        }
    }

    /// Creates a selector for `requested` shards, falling back to the
    /// host's available parallelism when `requested` is 0.
    pub fn with_default_parallelism(requested: usize) -> Self {
        let shards = if requested == 0 {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        } else {
            requested
        };
        Self::new(shards)
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Maps a key to its shard index.
    pub fn shard_for_key<K: Hash>(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards
    }
}

impl Default for ShardSelector {
    /// Single-shard selector.
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_is_deterministic() {
        let selector = ShardSelector::new(8);
        let shard = selector.shard_for_key(&"key");
        assert_eq!(selector.shard_for_key(&"key"), shard);
        assert!(shard < 8);
    }

    #[test]
    fn zero_shards_clamps_to_one() {
        let selector = ShardSelector::new(0);
        assert_eq!(selector.shard_count(), 1);
        assert_eq!(selector.shard_for_key(&123u64), 0);
    }

    #[test]
    fn zero_request_uses_parallelism() {
        let selector = ShardSelector::with_default_parallelism(0);
        assert!(selector.shard_count() >= 1);

        let explicit = ShardSelector::with_default_parallelism(3);
        assert_eq!(explicit.shard_count(), 3);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same key always maps to the same shard.
        #[test]
        fn prop_deterministic(shards in 1usize..64, key in any::<u64>()) {
            let selector = ShardSelector::new(shards);
            prop_assert_eq!(selector.shard_for_key(&key), selector.shard_for_key(&key));
        }

        /// Shard index is always in range.
        #[test]
        fn prop_in_range(shards in 1usize..128, keys in prop::collection::vec(any::<u32>(), 0..64)) {
            let selector = ShardSelector::new(shards);
            for key in keys {
                prop_assert!(selector.shard_for_key(&key) < shards);
            }
        }

        /// Enough distinct keys reach more than one shard.
        #[test]
        fn prop_distribution_uses_shards(shards in 2usize..16) {
            let selector = ShardSelector::new(shards);
            let used: std::collections::HashSet<_> =
                (0..256u64).map(|k| selector.shard_for_key(&k)).collect();
            prop_assert!(used.len() > 1);
        }
    }
}
