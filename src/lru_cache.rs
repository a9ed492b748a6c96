//! Least-recently-used cache engine.
//!
//! Entries sit in an intrusive doubly linked list over a slot arena, most
//! recently touched at the head. The key index maps each key to its arena
//! slot, so lookup, touch, and eviction are all O(1) amortized.

use crate::arena::SlotArena;
use crate::error::CacheError;
use crate::index::{HashIndex, KeyIndex, OrderedIndex};
use crate::traits::Cache;

/// List terminator. No slot index ever reaches this value.
const NIL: usize = usize::MAX;

struct Node<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// A bounded cache that evicts the least recently used entry.
///
/// `get` and overwriting inserts count as recency touches; `peek` does not.
/// The index strategy `I` defaults to [`HashIndex`]; use
/// [`OrderedLruCache`] for keys that are comparable but not hashable.
///
/// # Examples
///
/// ```rust
/// use bounded_cache::LruCache;
///
/// let mut cache: LruCache<_, _> = LruCache::new(2);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.get(&1).unwrap();
/// cache.insert(3, "c"); // evicts 2, the least recently touched
/// assert!(!cache.contains(&2));
/// ```
pub struct LruCache<K, V, I = HashIndex<K>> {
    cap: usize,
    index: I,
    nodes: SlotArena<Node<K, V>>,
    head: usize,
    tail: usize,
}

/// LRU cache over an ordered key index.
pub type OrderedLruCache<K, V> = LruCache<K, V, OrderedIndex<K>>;

impl<K, V, I> LruCache<K, V, I>
where
    K: Clone,
    I: KeyIndex<K>,
{
    /// Creates a cache bounded by `capacity` entries.
    ///
    /// A capacity of zero is normalized up to one; a cache that retains
    /// nothing is only reachable through [`set_capacity`](Self::set_capacity).
    pub fn new(capacity: usize) -> Self {
        let cap = capacity.max(1);
        Self {
            cap,
            index: I::default(),
            nodes: SlotArena::with_capacity(cap),
            head: NIL,
            tail: NIL,
        }
    }

    /// Inserts `key`, evicting the least recently used entry if a new key
    /// does not fit. Overwriting an existing key counts as a recency touch
    /// and never evicts. A no-op at capacity zero.
    pub fn insert(&mut self, key: K, value: V) {
        if self.cap == 0 {
            return;
        }
        if let Some(slot) = self.index.get(&key) {
            self.node_mut(slot).value = value;
            self.move_to_front(slot);
        } else {
            if self.nodes.len() == self.cap {
                self.evict_tail();
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
            self.move_to_front(slot);
        } else {
            if self.nodes.len() == self.cap {
                self.evict_tail();
            }
            self.insert_new(key, make());
        }
    }

    /// Returns the value for `key`, marking it most recently used.
    pub fn get(&mut self, key: &K) -> Result<&mut V, CacheError> {
        let slot = self.index.get(key).ok_or(CacheError::KeyNotFound)?;
        self.move_to_front(slot);
        Ok(&mut self.node_mut(slot).value)
    }

    /// Returns the value for `key` without changing the recency order.
    pub fn peek(&self, key: &K) -> Result<&V, CacheError> {
        let slot = self.index.get(key).ok_or(CacheError::KeyNotFound)?;
        Ok(&self.node(slot).value)
    }

    /// Removes `key` if present, reporting whether it was.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(slot) => {
                self.unlink(slot);
                self.nodes.remove(slot);
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

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// Rebounds the cache, evicting from the tail until the contents fit.
    ///
    /// Unlike construction, zero is taken literally: the cache is emptied
    /// and every later insert is a no-op until the capacity is raised again.
    pub fn set_capacity(&mut self, new_cap: usize) {
        self.cap = new_cap;
        while self.nodes.len() > self.cap {
            self.evict_tail();
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
            prev: NIL,
            next: NIL,
        });
        self.index.insert(key, slot);
        self.push_front(slot);
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(slot);
            node.prev = NIL;
            node.next = old_head;
        }
        if old_head != NIL {
            self.node_mut(old_head).prev = slot;
        } else {
            self.tail = slot;
        }
        self.head = slot;
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev, node.next)
        };
        if prev != NIL {
            self.node_mut(prev).next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.node_mut(next).prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn move_to_front(&mut self, slot: usize) {
        if self.head == slot {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    fn evict_tail(&mut self) {
        let victim = self.tail;
        if victim == NIL {
            return;
        }
        self.unlink(victim);
        let node = self
            .nodes
            .remove(victim)
            .expect("tail slot missing from arena");
        self.index.remove(&node.key);
    }
}

impl<K, V, I> Cache for LruCache<K, V, I>
where
    K: Clone,
    I: KeyIndex<K>,
{
    type Key = K;
    type Value = V;

    fn insert(&mut self, key: K, value: V) {
        LruCache::insert(self, key, value)
    }

    fn insert_with<F>(&mut self, key: K, make: F)
    where
        F: FnOnce() -> V,
    {
        LruCache::insert_with(self, key, make)
    }

    fn get(&mut self, key: &K) -> Result<&mut V, CacheError> {
        LruCache::get(self, key)
    }

    fn peek(&self, key: &K) -> Result<&V, CacheError> {
        LruCache::peek(self, key)
    }

    fn remove(&mut self, key: &K) -> bool {
        LruCache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }

    fn is_full(&self) -> bool {
        LruCache::is_full(self)
    }

    fn clear(&mut self) {
        LruCache::clear(self)
    }

    fn set_capacity(&mut self, new_cap: usize) {
        LruCache::set_capacity(self, new_cap)
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone)]
    enum Op {
        Insert(u8, u16),
        Get(u8),
        Remove(u8),
        SetCapacity(usize),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
            4 => any::<u8>().prop_map(Op::Get),
            2 => any::<u8>().prop_map(Op::Remove),
            1 => (0usize..6).prop_map(Op::SetCapacity),
            1 => Just(Op::Clear),
        ]
    }

    /// Reference model: recency list with the most recent touch at the front.
    struct ModelLru {
        cap: usize,
        order: Vec<(u8, u16)>,
    }

    impl ModelLru {
        fn insert(&mut self, key: u8, value: u16) {
            if self.cap == 0 {
                return;
            }
            let existed = self.order.iter().any(|(k, _)| *k == key);
            self.order.retain(|(k, _)| *k != key);
            if !existed && self.order.len() == self.cap {
                self.order.pop();
            }
            self.order.insert(0, (key, value));
        }

        fn get(&mut self, key: u8) -> Option<u16> {
            let pos = self.order.iter().position(|(k, _)| *k == key)?;
            let entry = self.order.remove(pos);
            self.order.insert(0, entry);
            Some(entry.1)
        }

        fn remove(&mut self, key: u8) -> bool {
            let before = self.order.len();
            self.order.retain(|(k, _)| *k != key);
            self.order.len() != before
        }

        fn set_capacity(&mut self, new_cap: usize) {
            self.cap = new_cap;
            self.order.truncate(new_cap);
        }
    }

    proptest! {
        #[test]
        fn matches_reference_model(
            cap in 1usize..6,
            ops in proptest::collection::vec(op_strategy(), 0..80),
        ) {
            let mut cache: LruCache<u8, u16> = LruCache::new(cap);
            let mut model = ModelLru { cap, order: Vec::new() };

            for op in ops {
                match op {
                    Op::Insert(k, v) => {
                        cache.insert(k, v);
                        model.insert(k, v);
                    }
                    Op::Get(k) => {
                        let expected = model.get(k);
                        prop_assert_eq!(cache.get(&k).ok().map(|v| *v), expected);
                    }
                    Op::Remove(k) => {
                        prop_assert_eq!(cache.remove(&k), model.remove(k));
                    }
                    Op::SetCapacity(n) => {
                        cache.set_capacity(n);
                        model.set_capacity(n);
                    }
                    Op::Clear => {
                        cache.clear();
                        model.order.clear();
                    }
                }

                prop_assert_eq!(cache.len(), model.order.len());
                prop_assert!(cache.len() <= cache.capacity());
                prop_assert_eq!(cache.is_full(), cache.len() == cache.capacity());
                for (k, v) in &model.order {
                    prop_assert_eq!(cache.peek(k), Ok(v));
                }
            }
        }
    }
}
