//! Least-frequently-used cache engine.
//!
//! Every live entry carries an access frequency. Entries sharing a frequency
//! form a bucket, an intrusive list over the slot arena with the most
//! recently touched key at the front. Eviction takes the back of the
//! minimum-frequency bucket, so the least frequent entry goes first and ties
//! break toward the least recently touched.
//!
//! The crux is the frequency bump: a touch splices the entry from bucket `f`
//! to the front of bucket `f + 1` in O(1), and when the old bucket was the
//! minimum and empties, the minimum advances by one without any rescan. Only
//! `remove` and `set_capacity` can leave a hole at the minimum, and they
//! recompute it with an eager scan over the distinct frequencies.

use std::collections::HashMap;

use crate::arena::SlotArena;
use crate::error::CacheError;
use crate::index::{HashIndex, KeyIndex, OrderedIndex};
use crate::traits::Cache;

/// List terminator. No slot index ever reaches this value.
const NIL: usize = usize::MAX;

struct Node<K, V> {
    key: K,
    value: V,
    freq: u64,
    prev: usize,
    next: usize,
}

/// Per-frequency intrusive list ends. Never kept around empty.
struct Bucket {
    head: usize,
    tail: usize,
}

/// A bounded cache that evicts the least frequently used entry, breaking
/// ties toward the least recently touched at that frequency.
///
/// `get` and overwriting inserts bump the frequency; `peek` does not. A
/// capacity of zero is taken literally: the cache is permanently empty (and
/// reports full), and every insert is a no-op.
///
/// # Examples
///
/// ```rust
/// use bounded_cache::LfuCache;
///
/// let mut cache: LfuCache<_, _> = LfuCache::new(2);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.get(&1).unwrap();
/// cache.insert(3, "c"); // evicts 2: frequency 1 vs frequency 2
/// assert!(!cache.contains(&2));
/// assert!(cache.contains(&1));
/// ```
pub struct LfuCache<K, V, I = HashIndex<K>> {
    cap: usize,
    /// Smallest frequency among live entries; zero when empty.
    min_freq: u64,
    index: I,
    nodes: SlotArena<Node<K, V>>,
    buckets: HashMap<u64, Bucket>,
}

/// LFU cache over an ordered key index.
pub type OrderedLfuCache<K, V> = LfuCache<K, V, OrderedIndex<K>>;

impl<K, V, I> LfuCache<K, V, I>
where
    K: Clone,
    I: KeyIndex<K>,
{
    /// Creates a cache bounded by `capacity` entries. Zero is allowed and
    /// means the cache never retains anything.
    pub fn new(capacity: usize) -> Self {
        Self {
            cap: capacity,
            min_freq: 0,
            index: I::default(),
            nodes: SlotArena::with_capacity(capacity),
            buckets: HashMap::new(),
        }
    }

    /// Inserts `key`, evicting from the minimum-frequency bucket if a new
    /// key does not fit. Overwriting an existing key bumps its frequency
    /// and never evicts. A fresh entry always starts at frequency 1.
    pub fn insert(&mut self, key: K, value: V) {
        if self.cap == 0 {
            return;
        }
        if let Some(slot) = self.index.get(&key) {
            self.node_mut(slot).value = value;
            self.bump(slot);
        } else {
            if self.nodes.len() == self.cap {
                self.evict_min();
            }
            self.insert_new(key, value);
        }
    }

    /// Like [`insert`](Self::insert), but builds the value on demand. At
    /// capacity zero the closure is never invoked.
    pub fn insert_with<F>(&mut self, key: K, make: F)
    where
        F: FnOnce() -> V,
    {
        if self.cap == 0 {
            return;
        }
        if let Some(slot) = self.index.get(&key) {
            self.node_mut(slot).value = make();
            self.bump(slot);
        } else {
            if self.nodes.len() == self.cap {
                self.evict_min();
            }
            self.insert_new(key, make());
        }
    }

    /// Returns the value for `key`, bumping its frequency.
    pub fn get(&mut self, key: &K) -> Result<&mut V, CacheError> {
        let slot = self.index.get(key).ok_or(CacheError::KeyNotFound)?;
        self.bump(slot);
        Ok(&mut self.node_mut(slot).value)
    }

    /// Returns the value for `key` without bumping its frequency.
    pub fn peek(&self, key: &K) -> Result<&V, CacheError> {
        let slot = self.index.get(key).ok_or(CacheError::KeyNotFound)?;
        Ok(&self.node(slot).value)
    }

    /// Removes `key` if present, reporting whether it was. Recomputes the
    /// minimum frequency when the minimum bucket empties out.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(slot) => {
                let freq = self.node(slot).freq;
                self.bucket_unlink(freq, slot);
                self.nodes.remove(slot);
                if freq == self.min_freq && !self.buckets.contains_key(&freq) {
                    self.rescan_min_freq();
                }
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn is_full(&self) -> bool {
        self.index.len() == self.cap
    }

    /// Removes every entry and resets the frequency bookkeeping.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Rebounds the cache, evicting from the minimum-frequency bucket's back
    /// until the contents fit. Zero empties the cache and keeps it empty.
    pub fn set_capacity(&mut self, new_cap: usize) {
        self.cap = new_cap;
        while self.nodes.len() > self.cap {
            self.evict_min();
        }
    }

    fn node(&self, slot: usize) -> &Node<K, V> {
        self.nodes.get(slot).expect("indexed slot missing from arena")
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node<K, V> {
        self.nodes
            .get_mut(slot)
            .expect("indexed slot missing from arena")
    }

    fn insert_new(&mut self, key: K, value: V) {
        let slot = self.nodes.insert(Node {
            key: key.clone(),
            value,
            freq: 1,
            prev: NIL,
            next: NIL,
        });
        self.index.insert(key, slot);
        self.bucket_push_front(1, slot);
        // A fresh entry is always the new minimum.
        self.min_freq = 1;
    }

    /// Moves the entry from bucket `f` to the front of bucket `f + 1`.
    fn bump(&mut self, slot: usize) {
        let old = self.node(slot).freq;
        if old == u64::MAX {
            // Counter saturated; refresh recency within the bucket.
            self.bucket_unlink(old, slot);
            self.bucket_push_front(old, slot);
            return;
        }

        self.bucket_unlink(old, slot);
        self.node_mut(slot).freq = old + 1;
        self.bucket_push_front(old + 1, slot);

        if old == self.min_freq && !self.buckets.contains_key(&old) {
            self.min_freq = old + 1;
        }
    }

    /// Evicts the least recently touched entry of the minimum bucket.
    fn evict_min(&mut self) {
        let freq = self.min_freq;
        let victim = match self.buckets.get(&freq) {
            Some(bucket) => bucket.tail,
            None => return,
        };
        self.bucket_unlink(freq, victim);
        let node = self
            .nodes
            .remove(victim)
            .expect("bucket slot missing from arena");
        self.index.remove(&node.key);
        if !self.buckets.contains_key(&freq) {
            self.rescan_min_freq();
        }
    }

    /// Eager recompute over the distinct live frequencies. Not the hot path:
    /// only `remove` and shrinking can empty the minimum bucket without an
    /// obvious successor.
    fn rescan_min_freq(&mut self) {
        self.min_freq = self.buckets.keys().min().copied().unwrap_or(0);
    }

    fn bucket_push_front(&mut self, freq: u64, slot: usize) {
        let bucket = self
            .buckets
            .entry(freq)
            .or_insert(Bucket { head: NIL, tail: NIL });
        let old_head = bucket.head;
        bucket.head = slot;
        if old_head == NIL {
            bucket.tail = slot;
        }

        {
            let node = self.node_mut(slot);
            node.prev = NIL;
            node.next = old_head;
        }
        if old_head != NIL {
            self.node_mut(old_head).prev = slot;
        }
    }

    /// Unlinks the entry from its bucket, dropping the bucket if it empties.
    fn bucket_unlink(&mut self, freq: u64, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev, node.next)
        };
        if prev != NIL {
            self.node_mut(prev).next = next;
        }
        if next != NIL {
            self.node_mut(next).prev = prev;
        }

        let bucket = self
            .buckets
            .get_mut(&freq)
            .expect("bucket missing for live frequency");
        if bucket.head == slot {
            bucket.head = next;
        }
        if bucket.tail == slot {
            bucket.tail = prev;
        }
        if bucket.head == NIL {
            self.buckets.remove(&freq);
        }
    }
}

impl<K, V, I> Cache for LfuCache<K, V, I>
where
    K: Clone,
    I: KeyIndex<K>,
{
    type Key = K;
    type Value = V;

    fn insert(&mut self, key: K, value: V) {
        LfuCache::insert(self, key, value)
    }

    fn insert_with<F>(&mut self, key: K, make: F)
    where
        F: FnOnce() -> V,
    {
        LfuCache::insert_with(self, key, make)
    }

    fn get(&mut self, key: &K) -> Result<&mut V, CacheError> {
        LfuCache::get(self, key)
    }

    fn peek(&self, key: &K) -> Result<&V, CacheError> {
        LfuCache::peek(self, key)
    }

    fn remove(&mut self, key: &K) -> bool {
        LfuCache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LfuCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        LfuCache::capacity(self)
    }

    fn is_full(&self) -> bool {
        LfuCache::is_full(self)
    }

    fn clear(&mut self) {
        LfuCache::clear(self)
    }

    fn set_capacity(&mut self, new_cap: usize) {
        LfuCache::set_capacity(self, new_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut cache: LfuCache<_, _> = LfuCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");

        assert_eq!(cache.get(&1), Ok(&mut "a"));
        assert_eq!(cache.get(&2), Ok(&mut "b"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn get_missing_is_key_not_found() {
        let mut cache: LfuCache<i32, i32> = LfuCache::new(2);
        assert_eq!(cache.get(&7), Err(CacheError::KeyNotFound));
        assert_eq!(cache.peek(&7), Err(CacheError::KeyNotFound));
    }

    #[test]
    fn frequency_decides_eviction() {
        let mut cache: LfuCache<_, _> = LfuCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.get(&1).unwrap();
        cache.get(&1).unwrap();
        cache.get(&1).unwrap();
        cache.get(&2).unwrap();
        cache.insert(3, "c"); // 2 has frequency 2, 1 has frequency 4

        assert!(!cache.contains(&2));
        assert!(cache.contains(&1));
        assert!(cache.contains(&3));
    }

    #[test]
    fn tie_break_evicts_least_recent_at_min_frequency() {
        let mut cache: LfuCache<_, _> = LfuCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b"); // both frequency 1, 2 touched later
        cache.insert(3, "c");

        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
    }

    #[test]
    fn hot_key_survives_churn() {
        let mut cache: LfuCache<_, _> = LfuCache::new(3);
        cache.insert('a', 1);
        for _ in 0..5 {
            cache.get(&'a').unwrap();
        }
        cache.insert('b', 2);
        cache.insert('c', 3);
        cache.insert('d', 4); // evicts b: frequency 1, older than c

        assert!(!cache.contains(&'b'));
        assert!(cache.contains(&'a'));
        assert!(cache.contains(&'c'));
        assert!(cache.contains(&'d'));
    }

    #[test]
    fn overwrite_insert_bumps_frequency() {
        let mut cache: LfuCache<_, _> = LfuCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(1, "a2"); // frequency bump for 1
        cache.insert(3, "c");

        assert!(!cache.contains(&2));
        assert_eq!(cache.peek(&1), Ok(&"a2"));
    }

    #[test]
    fn peek_does_not_bump() {
        let mut cache: LfuCache<_, _> = LfuCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.peek(&1).unwrap();
        cache.peek(&1).unwrap();
        cache.insert(3, "c"); // 1 still at frequency 1, older than 2

        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
    }

    #[test]
    fn get_then_peek_agree() {
        let mut cache: LfuCache<_, _> = LfuCache::new(2);
        cache.insert(1, 10);
        let got = *cache.get(&1).unwrap();
        assert_eq!(cache.peek(&1), Ok(&got));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_reports_presence() {
        let mut cache: LfuCache<_, _> = LfuCache::new(2);
        cache.insert(1, "a");

        assert!(cache.remove(&1));
        assert!(!cache.remove(&1));
        assert!(!cache.contains(&1));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn remove_recomputes_minimum_frequency() {
        let mut cache: LfuCache<_, _> = LfuCache::new(3);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.get(&1).unwrap();
        cache.get(&1).unwrap(); // 1 at frequency 3
        cache.get(&2).unwrap(); // 2 at frequency 2

        assert!(cache.remove(&2)); // minimum bucket empties, rescan finds 3

        cache.insert(3, "c");
        cache.insert(4, "d");
        cache.insert(5, "e"); // evicts 3: frequency 1, older than 4

        assert!(!cache.contains(&3));
        assert!(cache.contains(&1));
        assert!(cache.contains(&4));
        assert!(cache.contains(&5));
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut cache: LfuCache<_, _> = LfuCache::new(0);
        assert_eq!(cache.capacity(), 0);

        cache.insert(1, "a");
        assert!(cache.is_empty());
        assert!(cache.is_full());
        assert_eq!(cache.get(&1), Err(CacheError::KeyNotFound));
    }

    #[test]
    fn shrink_evicts_lowest_frequencies_first() {
        let mut cache: LfuCache<_, _> = LfuCache::new(4);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");
        cache.insert(4, "d");
        cache.get(&1).unwrap();
        cache.get(&1).unwrap(); // 1 at frequency 3
        cache.get(&2).unwrap(); // 2 at frequency 2

        cache.set_capacity(1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&1));
    }

    #[test]
    fn set_capacity_zero_empties_permanently() {
        let mut cache: LfuCache<_, _> = LfuCache::new(2);
        cache.insert(1, "a");
        cache.get(&1).unwrap();
        cache.set_capacity(0);

        assert!(cache.is_empty());
        assert!(cache.is_full());

        cache.insert(2, "b");
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_resets_frequencies() {
        let mut cache: LfuCache<_, _> = LfuCache::new(2);
        cache.insert(1, "a");
        cache.get(&1).unwrap();
        cache.get(&1).unwrap();
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 2);

        // 1 is back at frequency 1 and older than 2 at that frequency
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
    }

    #[test]
    fn insert_with_skips_construction_when_noop() {
        let mut cache: LfuCache<i32, String> = LfuCache::new(0);
        cache.insert_with(1, || unreachable!("value built despite zero capacity"));
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_with_overwrites_and_bumps() {
        let mut cache: LfuCache<_, _> = LfuCache::new(2);
        cache.insert(1, String::from("a"));
        cache.insert(2, String::from("b"));
        cache.insert_with(1, || String::from("a2"));
        cache.insert_with(3, || String::from("c"));

        assert!(!cache.contains(&2));
        assert_eq!(cache.peek(&1), Ok(&String::from("a2")));
    }

    #[test]
    fn ordered_index_for_unhashable_keys() {
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
        struct Version(u32, u32);

        let mut cache: OrderedLfuCache<Version, &str> = OrderedLfuCache::new(2);
        cache.insert(Version(1, 0), "one");
        cache.insert(Version(2, 0), "two");
        cache.get(&Version(2, 0)).unwrap();
        cache.insert(Version(3, 0), "three");

        assert!(!cache.contains(&Version(1, 0)));
        assert!(cache.contains(&Version(2, 0)));
    }
}
