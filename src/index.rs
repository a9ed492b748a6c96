//! Key-to-slot lookup strategies.
//!
//! Both engines are generic over [`KeyIndex`], so the caller decides at the
//! type level whether keys are located by hashing ([`HashIndex`], the
//! default) or by total order ([`OrderedIndex`]). A key type supporting
//! neither capability fails to compile at the instantiation site. The choice
//! never changes observable cache behavior, only how the index is stored.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Lookup structure mapping keys to arena slot indices.
pub trait KeyIndex<K>: Default {
    /// Returns the slot recorded for `key`, if present.
    fn get(&self, key: &K) -> Option<usize>;

    /// Records `key` at `slot`, replacing any previous record.
    fn insert(&mut self, key: K, slot: usize);

    /// Removes the record for `key`, returning its slot if it was present.
    fn remove(&mut self, key: &K) -> Option<usize>;

    fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// Hash-based index for `K: Hash + Eq`.
#[derive(Debug)]
pub struct HashIndex<K>(HashMap<K, usize>);

impl<K> Default for HashIndex<K> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<K: Hash + Eq> KeyIndex<K> for HashIndex<K> {
    fn get(&self, key: &K) -> Option<usize> {
        self.0.get(key).copied()
    }

    fn insert(&mut self, key: K, slot: usize) {
        self.0.insert(key, slot);
    }

    fn remove(&mut self, key: &K) -> Option<usize> {
        self.0.remove(key)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Order-based index for keys that are comparable but not hashable.
///
/// Lookups degrade to O(log n); the engines' bookkeeping stays the same.
#[derive(Debug)]
pub struct OrderedIndex<K>(BTreeMap<K, usize>);

impl<K> Default for OrderedIndex<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord> KeyIndex<K> for OrderedIndex<K> {
    fn get(&self, key: &K) -> Option<usize> {
        self.0.get(key).copied()
    }

    fn insert(&mut self, key: K, slot: usize) {
        self.0.insert(key, slot);
    }

    fn remove(&mut self, key: &K) -> Option<usize> {
        self.0.remove(key)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}
