//! Optional mutual-exclusion wrapper around a cache engine.
//!
//! [`Synced`] re-exposes the whole [`Cache`] surface through `&self`,
//! taking an exclusive lock for the duration of each call. The raw lock is a
//! type parameter: [`parking_lot::RawMutex`] gives real exclusion (see the
//! [`SyncLruCache`]/[`SyncLfuCache`] aliases), while the default
//! [`RawNullLock`] costs nothing and confines the cache to one thread.
//!
//! Locked lookups return owned clones rather than references: a reference
//! into the cache cannot outlive the critical section, because any later
//! mutating call may evict or overwrite the entry behind it.

use std::cell::Cell;

use parking_lot::lock_api::{GuardNoSend, Mutex, RawMutex};

use crate::error::CacheError;
use crate::index::{HashIndex, KeyIndex};
use crate::lfu_cache::LfuCache;
use crate::lru_cache::LruCache;
use crate::traits::Cache;

/// No-op lock policy for single-threaded use.
///
/// Acquisition only flips a flag. The `Cell` keeps the type `!Sync`, so a
/// cache under this policy cannot be shared across threads at all; that is
/// what makes skipping real exclusion safe. Reentrant acquisition panics
/// instead of deadlocking.
pub struct RawNullLock {
    locked: Cell<bool>,
}

unsafe impl RawMutex for RawNullLock {
    const INIT: Self = RawNullLock {
        locked: Cell::new(false),
    };

    type GuardMarker = GuardNoSend;

    fn lock(&self) {
        assert!(
            self.try_lock(),
            "reentrant operation on a single-threaded cache"
        );
    }

    fn try_lock(&self) -> bool {
        !self.locked.replace(true)
    }

    unsafe fn unlock(&self) {
        self.locked.set(false);
    }
}

/// A cache engine behind a compile-time-selected exclusive lock.
///
/// Each public operation acquires the lock for its full duration; the guard
/// releases it on every exit path, including `Err` returns. Operations are
/// atomic with respect to each other on the same instance. Reentrancy is not
/// supported: calling back into the same cache while an operation runs
/// deadlocks (real mutex) or panics (null lock).
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
///
/// use bounded_cache::SyncLruCache;
///
/// let cache: Arc<SyncLruCache<u32, String>> = Arc::new(SyncLruCache::with_capacity(100));
/// let writer = {
///     let cache = Arc::clone(&cache);
///     thread::spawn(move || cache.insert(1, String::from("one")))
/// };
/// writer.join().unwrap();
/// assert_eq!(cache.get(&1), Ok(String::from("one")));
/// ```
pub struct Synced<C, R: RawMutex = RawNullLock> {
    inner: Mutex<R, C>,
}

/// Mutex-guarded LRU cache, shareable across threads.
pub type SyncLruCache<K, V, I = HashIndex<K>> =
    Synced<LruCache<K, V, I>, parking_lot::RawMutex>;

/// Mutex-guarded LFU cache, shareable across threads.
pub type SyncLfuCache<K, V, I = HashIndex<K>> =
    Synced<LfuCache<K, V, I>, parking_lot::RawMutex>;

impl<C, R: RawMutex> Synced<C, R> {
    /// Wraps an engine in the chosen lock policy.
    pub fn new(cache: C) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    /// Unwraps the engine, discarding the lock.
    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }
}

impl<K, V, I> Synced<LruCache<K, V, I>, parking_lot::RawMutex>
where
    K: Clone,
    I: KeyIndex<K>,
{
    /// Creates a mutex-guarded LRU cache bounded by `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(LruCache::new(capacity))
    }
}

impl<K, V, I> Synced<LfuCache<K, V, I>, parking_lot::RawMutex>
where
    K: Clone,
    I: KeyIndex<K>,
{
    /// Creates a mutex-guarded LFU cache bounded by `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(LfuCache::new(capacity))
    }
}

impl<C: Cache, R: RawMutex> Synced<C, R> {
    pub fn insert(&self, key: C::Key, value: C::Value) {
        self.inner.lock().insert(key, value)
    }

    pub fn insert_with<F>(&self, key: C::Key, make: F)
    where
        F: FnOnce() -> C::Value,
    {
        self.inner.lock().insert_with(key, make)
    }

    /// Locked lookup with a recency/frequency touch; returns a clone.
    pub fn get(&self, key: &C::Key) -> Result<C::Value, CacheError>
    where
        C::Value: Clone,
    {
        self.inner.lock().get(key).map(|value| value.clone())
    }

    /// Locked lookup without touching the eviction order; returns a clone.
    pub fn peek(&self, key: &C::Key) -> Result<C::Value, CacheError>
    where
        C::Value: Clone,
    {
        self.inner.lock().peek(key).map(|value| value.clone())
    }

    pub fn remove(&self, key: &C::Key) -> bool {
        self.inner.lock().remove(key)
    }

    pub fn contains(&self, key: &C::Key) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn is_full(&self) -> bool {
        self.inner.lock().is_full()
    }

    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    pub fn set_capacity(&self, new_cap: usize) {
        self.inner.lock().set_capacity(new_cap)
    }
}
