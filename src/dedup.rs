use std::collections::HashSet;
use std::hash::Hash;

/// Insertion-ordered collection that rejects items whose key was already seen.
#[derive(Debug, Clone)]
pub struct Unique<K, T> {
    seen: HashSet<K>,
    items: Vec<T>,
}

impl<K: Eq + Hash, T> Unique<K, T> {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    /// Returns false (and drops `item`) when `key` is a duplicate.
    pub fn insert_with(&mut self, key: K, item: T) -> bool {
        if !self.seen.insert(key) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<K: Eq + Hash, T> Default for Unique<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
