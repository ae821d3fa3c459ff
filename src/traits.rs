//! # Cache Trait Hierarchy
//!
//! Two layers of contract live here:
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────┐
//!   │                      CachePolicy<K, V>                          │
//!   │                                                                 │
//!   │   put(&self, K, V)                                              │
//!   │   get_to(&self, &K, &mut V) → bool                              │
//!   │   get_or_default(&self, &K) → V          (provided)             │
//!   │                                                                 │
//!   │   Shared-reference API. Implementors synchronise internally     │
//!   │   (one exclusive lock per instance), so callers may invoke      │
//!   │   concurrently. This is the uniform surface every public cache  │
//!   │   type exposes: LruCache, LfuCache, ArcCache, LruKCache,        │
//!   │   HashLruCache, HashLfuCache.                                   │
//!   └─────────────────────────────────────────────────────────────────┘
//!
//!   ┌─────────────────────────────────────────────────────────────────┐
//!   │                 CoreCache<K, V>  /  MutableCache<K, V>          │
//!   │                                                                 │
//!   │   insert(&mut, K, V) → Option<V>     remove(&mut, &K) →         │
//!   │   get(&mut, &K) → Option<&V>           Option<V>                │
//!   │   contains(&, &K) → bool                                        │
//!   │   len / is_empty / capacity / clear                             │
//!   │                                                                 │
//!   │   Single-threaded engine contract. The policy cores (LruCore,   │
//!   │   LfuCore, ArcCore, LruKCore) implement these and carry no      │
//!   │   lock; the public wrappers own the mutex.                      │
//!   └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The split mirrors the core/wrapper structure of the policy modules: all
//! algorithmic work happens in an unsynchronised core, and thread safety is
//! layered on exactly once, at the outermost type.

/// Uniform lookup/insertion contract shared by every cache policy.
///
/// Implementors take `&self` and synchronise internally; operations on one
/// instance are linearisable. Values handed out are copies — no reference
/// into the cache ever escapes the lock.
///
/// # Example
///
/// ```
/// use tricache::traits::CachePolicy;
/// use tricache::policy::lru::LruCache;
/// use tricache::policy::lfu::LfuCache;
///
/// fn warm<C: CachePolicy<u32, String>>(cache: &C) {
///     for i in 0..4 {
///         cache.put(i, format!("v{i}"));
///     }
/// }
///
/// let lru: LruCache<u32, String> = LruCache::new(8);
/// let lfu: LfuCache<u32, String> = LfuCache::new(8);
/// warm(&lru);
/// warm(&lfu);
/// assert_eq!(lru.get_or_default(&1), "v1");
/// assert_eq!(lfu.get_or_default(&1), "v1");
/// ```
pub trait CachePolicy<K, V> {
    /// Inserts or overwrites `key`.
    ///
    /// If the key is resident its value is replaced and its
    /// position/frequency metadata refreshed; otherwise a new entry is
    /// created, evicting exactly one victim when the cache is full. A cache
    /// constructed with capacity 0 ignores all puts.
    fn put(&self, key: K, value: V);

    /// Copies the current value for `key` into `out`.
    ///
    /// On a hit the entry's position/frequency metadata is refreshed and
    /// `true` is returned. On a miss `out` is left untouched and `false` is
    /// returned.
    fn get_to(&self, key: &K, out: &mut V) -> bool;

    /// By-value convenience lookup: returns the value on a hit, a
    /// default-constructed `V` on a miss. Never fails.
    ///
    /// ```
    /// use tricache::traits::CachePolicy;
    /// use tricache::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, u64> = LruCache::new(4);
    /// cache.put(7, 700);
    /// assert_eq!(cache.get_or_default(&7), 700);
    /// assert_eq!(cache.get_or_default(&8), 0); // miss → default
    /// ```
    fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        let mut out = V::default();
        self.get_to(key, &mut out);
        out
    }
}

/// Core operations every single-threaded cache engine supports.
///
/// Engines require `&mut self` and are not thread-safe; the public cache
/// types wrap them in a lock and re-expose [`CachePolicy`].
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if the key
    /// was resident. May evict one entry according to the policy.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up a key, updating policy metadata (recency / frequency) on a
    /// hit.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks presence without touching policy metadata.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of simultaneously resident entries.
    fn capacity(&self) -> usize;

    /// Drops every entry, keeping configuration.
    fn clear(&mut self);
}

/// Engines that additionally support arbitrary key removal.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a key, returning its value if it was resident.
    fn remove(&mut self, key: &K) -> Option<V>;
}
