//! tricache: bounded in-memory key→value caches with pluggable replacement.
//!
//! Three eviction engines — recency (LRU), frequency with aging (LFU), and
//! an adaptive two-part ARC — plus an LRU-K admission filter and fixed-fanout
//! sharded wrappers. All public cache types share the [`traits::CachePolicy`]
//! contract and synchronise internally, so a `&Cache` can be hammered from
//! many threads.
//!
//! ```
//! use tricache::policy::lru::LruCache;
//! use tricache::traits::CachePolicy;
//!
//! let cache: LruCache<u32, String> = LruCache::new(2);
//! cache.put(1, "one".to_string());
//! cache.put(2, "two".to_string());
//!
//! let mut out = String::new();
//! assert!(cache.get_to(&1, &mut out));
//! assert_eq!(out, "one");
//!
//! cache.put(3, "three".to_string()); // evicts 2, the least recently used
//! assert!(!cache.get_to(&2, &mut out));
//! ```

pub mod ds;
pub mod policy;

pub mod builder;
pub mod error;
pub mod prelude;
pub mod traits;
