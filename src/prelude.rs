pub use crate::builder::{Cache, CacheBuilder, PolicyKind};
pub use crate::ds::{FrequencyBuckets, GhostList, IntrusiveList, ShardSelector, SlotArena, SlotId};
pub use crate::error::ConfigError;
pub use crate::policy::arc::ArcCache;
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lru::LruCache;
pub use crate::policy::lru_k::LruKCache;
pub use crate::policy::sharded::{HashLfuCache, HashLruCache};
pub use crate::traits::{CachePolicy, CoreCache, MutableCache};
