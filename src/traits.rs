use crate::error::CacheError;

/// The contract shared by both eviction engines.
///
/// [`LruCache`](crate::LruCache) and [`LfuCache`](crate::LfuCache) expose the
/// same operation surface and differ only in which entry they pick when
/// capacity is exceeded. This trait captures that surface so wrappers such as
/// [`Synced`](crate::Synced) and downstream collaborators can abstract over
/// the policy.
pub trait Cache {
    type Key;
    type Value;

    /// Inserts or overwrites `key`, evicting per policy when a new key does
    /// not fit. A no-op at capacity zero.
    fn insert(&mut self, key: Self::Key, value: Self::Value);

    /// Like `insert`, but builds the value on demand. The closure is not
    /// invoked when the operation is a no-op (capacity zero).
    fn insert_with<F>(&mut self, key: Self::Key, make: F)
    where
        F: FnOnce() -> Self::Value;

    /// Looks up `key` and registers the access with the eviction policy.
    fn get(&mut self, key: &Self::Key) -> Result<&mut Self::Value, CacheError>;

    /// Looks up `key` without touching the eviction bookkeeping.
    fn peek(&self, key: &Self::Key) -> Result<&Self::Value, CacheError>;

    /// Removes `key` if present, reporting whether it was.
    fn remove(&mut self, key: &Self::Key) -> bool;

    fn contains(&self, key: &Self::Key) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    /// True exactly when `len() == capacity()`.
    fn is_full(&self) -> bool;

    /// Removes every entry. The cache then behaves like a freshly
    /// constructed one of the same capacity.
    fn clear(&mut self);

    /// Rebounds the cache, evicting per policy until the current contents
    /// fit. Accepts zero, which empties the cache and keeps it empty.
    fn set_capacity(&mut self, new_cap: usize);
}
