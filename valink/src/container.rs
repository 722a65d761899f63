//! Keyed access to the two supported container shapes.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    hash::{BuildHasher, Hash},
};

use valink_common::Data;

/// Uniform keyed access over the container shapes a link can focus into.
///
/// Two families implement this: ordered sequences (`Vec<T>`, keyed by
/// position, removal compacts) and keyed mappings (`HashMap`, `BTreeMap`;
/// removal deletes the key). Scalars and opaque values implement neither,
/// which is what makes `at`/`map`/`remove_at` unavailable on links to them —
/// the type system plays the role of the identity/no-op fallback.
///
/// All mutating methods operate on an already-cloned value; callers are
/// responsible for never handing them a shared one.
pub trait Container: Data {
    type Key: Clone + Debug + Eq + Hash + 'static;
    type Element: Data;

    fn get(&self, key: &Self::Key) -> Option<&Self::Element>;

    /// Replaces the element at `key`. For sequences, `key == len` appends;
    /// anything past that is a caller contract violation and panics.
    fn set_at(&mut self, key: &Self::Key, value: Self::Element);

    /// Removes the element at `key`, if present.
    fn remove_at(&mut self, key: &Self::Key);

    /// Current keys, in the container's iteration order.
    fn keys(&self) -> Vec<Self::Key>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Data> Container for Vec<T> {
    type Key = usize;
    type Element = T;

    fn get(&self, key: &usize) -> Option<&T> {
        self.as_slice().get(*key)
    }

    fn set_at(&mut self, key: &usize, value: T) {
        if *key == self.len() {
            self.push(value);
        } else {
            self[*key] = value;
        }
    }

    fn remove_at(&mut self, key: &usize) {
        if *key < self.len() {
            self.remove(*key);
        }
    }

    fn keys(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<K, V, S> Container for HashMap<K, V, S>
where
    K: Clone + Debug + Eq + Hash + 'static,
    V: Data,
    S: BuildHasher + Clone + 'static,
{
    type Key = K;
    type Element = V;

    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn set_at(&mut self, key: &K, value: V) {
        self.insert(key.clone(), value);
    }

    fn remove_at(&mut self, key: &K) {
        self.remove(key);
    }

    // Hash order; callers that need a stable order use BTreeMap instead.
    fn keys(&self) -> Vec<K> {
        HashMap::keys(self).cloned().collect()
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl<K, V> Container for BTreeMap<K, V>
where
    K: Clone + Debug + Eq + Ord + Hash + 'static,
    V: Data,
{
    type Key = K;
    type Element = V;

    fn get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn set_at(&mut self, key: &K, value: V) {
        self.insert(key.clone(), value);
    }

    fn remove_at(&mut self, key: &K) {
        self.remove(key);
    }

    fn keys(&self) -> Vec<K> {
        BTreeMap::keys(self).cloned().collect()
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}
