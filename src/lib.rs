//! Bounded in-memory key-value caches with O(1) eviction.
//!
//! This crate provides two cache engines:
//!
//! 1. [`LruCache`] - evicts the least recently used entry when full
//! 2. [`LfuCache`] - evicts the least frequently used entry, breaking ties
//!    toward the least recently touched
//!
//! Both expose the same contract (captured by the [`Cache`] trait): `insert`,
//! `insert_with`, `get`, `peek`, `remove`, `contains`, `clear`,
//! `set_capacity`, and the size/capacity queries. `get` counts as a touch for
//! the eviction policy; `peek` never does. Lookups on absent keys return
//! [`CacheError::KeyNotFound`].
//!
//! # Features
//!
//! - O(1) amortized insert, get, and eviction for both policies
//! - Generic key and value types
//! - Hash-based or order-based key lookup, chosen at the type level
//!   ([`HashIndex`] by default, [`OrderedIndex`] for keys without a hash)
//! - Optional mutual exclusion via [`SyncLruCache`] / [`SyncLfuCache`],
//!   selected at compile time; the plain engines carry no locking cost
//! - Linked structures live in a slot arena, so the engines contain no
//!   pointer manipulation
//!
//! # Examples
//!
//! ```rust
//! use bounded_cache::{LfuCache, LruCache};
//!
//! let mut recent: LruCache<_, _> = LruCache::new(2);
//! recent.insert(1, "a");
//! recent.insert(2, "b");
//! recent.get(&1).unwrap();
//! recent.insert(3, "c"); // evicts 2, untouched the longest
//! assert!(!recent.contains(&2));
//!
//! let mut frequent: LfuCache<_, _> = LfuCache::new(2);
//! frequent.insert(1, "a");
//! frequent.insert(2, "b");
//! frequent.get(&1).unwrap();
//! frequent.insert(3, "c"); // evicts 2, the least frequently used
//! assert!(frequent.contains(&1));
//! ```

mod arena;
pub mod error;
pub mod index;
pub mod lfu_cache;
pub mod lru_cache;
pub mod sync;
pub mod traits;

pub use error::CacheError;
pub use index::{HashIndex, KeyIndex, OrderedIndex};
pub use lfu_cache::{LfuCache, OrderedLfuCache};
pub use lru_cache::{LruCache, OrderedLruCache};
pub use sync::{RawNullLock, SyncLfuCache, SyncLruCache, Synced};
pub use traits::Cache;
