//! Host-state adapter: the one place the link algebra touches mutable state.

use std::cell::{Cell, RefCell};
use std::hash::Hash;
use std::rc::Rc;

use fnv::FnvHashMap;
use tracing::trace;
use valink_common::Data;

use crate::link::Link;

/// The single mutable cell behind a tree of links.
///
/// `link()` derives a fresh root whose write rule commits straight back into
/// the cell. Read-after-write holds from the next derivation: a root link
/// derived before a commit keeps showing its construction-time snapshot,
/// which is exactly what a deferred-rerender host expects.
pub struct StateCell<T: Data> {
    data: Rc<RefCell<T>>,
    revision: Rc<Cell<u64>>,
}

impl<T: Data> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        StateCell {
            data: self.data.clone(),
            revision: self.revision.clone(),
        }
    }
}

impl<T: Data> StateCell<T> {
    pub fn new(value: T) -> StateCell<T> {
        StateCell {
            data: Rc::new(RefCell::new(value)),
            revision: Rc::new(Cell::new(0)),
        }
    }

    /// Snapshot copy of the current state.
    pub fn get(&self) -> T {
        self.data.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.data.borrow())
    }

    /// Monotonic commit counter. Hosts use it as a cheap "did anything
    /// change" probe between derivations.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Derives a fresh root link over the current state.
    pub fn link(&self) -> Link<T> {
        let cell = self.clone();
        let value = self.data.borrow().clone();
        Link::from_value_and_setter(value, move |next: T| cell.commit(next))
    }

    fn commit(&self, next: T) {
        *self.data.borrow_mut() = next;
        self.revision.set(self.revision.get() + 1);
        trace!(revision = self.revision.get(), "state cell commit");
    }
}

/// External state owner: a snapshot getter plus a committer.
///
/// Implemented by [`StateCell`]; host frameworks with their own state cells
/// implement it to plug into [`Link::from_state_field`].
pub trait Host<S: Data> {
    fn state(&self) -> S;
    fn set_state(&self, next: S);
}

impl<T: Data> Host<T> for StateCell<T> {
    fn state(&self) -> T {
        self.get()
    }

    fn set_state(&self, next: T) {
        self.commit(next);
    }
}

impl<T: Data> Link<T> {
    /// Root link bound to one field of a larger host state object. The
    /// getter/putter pair plays the field key; a write reads the host state,
    /// replaces the field and commits the whole state back.
    pub fn from_state_field<S, H>(
        host: &H,
        get: impl Fn(&S) -> T + 'static,
        put: impl Fn(&mut S, T) + 'static,
    ) -> Link<T>
    where
        S: Data,
        H: Host<S> + Clone + 'static,
    {
        let value = get(&host.state());
        let host = host.clone();
        Link::from_value_and_setter(value, move |next: T| {
            let mut state = host.state();
            put(&mut state, next);
            host.set_state(state);
        })
    }
}

/// Adapter-local memo of derived links, keyed by field identity.
///
/// Re-deriving a link on every host re-read is cheap but produces a new
/// object each time; hosts that render-skip on shallow equality want the
/// *same* link back while the underlying value has not changed. An entry is
/// reused while its cached value is `same` as the current one and rebuilt
/// otherwise.
pub struct LinkCache<K, T: Data> {
    entries: RefCell<FnvHashMap<K, Link<T>>>,
}

impl<K: Clone + Eq + Hash, T: Data> LinkCache<K, T> {
    pub fn new() -> LinkCache<K, T> {
        LinkCache {
            entries: RefCell::new(FnvHashMap::default()),
        }
    }

    /// Returns the cached link for `key` if its value is still `same` as
    /// `current`, otherwise builds a fresh one via `make` and caches it.
    ///
    /// The cache is not borrowed while `make` runs, so `make` may resolve
    /// other keys on the same cache.
    pub fn resolve(&self, key: K, current: &T, make: impl FnOnce() -> Link<T>) -> Link<T> {
        {
            let entries = self.entries.borrow();
            if let Some(cached) = entries.get(&key) {
                if cached.value().same(current) {
                    return cached.clone();
                }
                trace!("cached link stale, re-deriving");
            }
        }
        let fresh = make();
        self.entries.borrow_mut().insert(key, fresh.clone());
        fresh
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.borrow_mut().remove(key);
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<K: Clone + Eq + Hash, T: Data> Default for LinkCache<K, T> {
    fn default() -> Self {
        LinkCache::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_after_write_from_next_derivation() {
        let cell = StateCell::new(1i32);
        let before = cell.link();
        before.set(2);
        // the pre-commit link keeps its snapshot
        assert_eq!(*before.value(), 1);
        assert_eq!(*cell.link().value(), 2);
        assert_eq!(cell.revision(), 1);
    }

    #[test]
    fn from_state_field_commits_whole_state() {
        let cell = StateCell::new(("name".to_string(), 30i32));
        let age = Link::from_state_field(&cell, |s: &(String, i32)| s.1, |s, v| s.1 = v);
        assert_eq!(*age.value(), 30);
        age.set(31);
        assert_eq!(cell.get(), ("name".to_string(), 31));
    }

    #[test]
    fn resolve_nested_on_same_cache() {
        let names = StateCell::new("left".to_string());
        let cache: LinkCache<&'static str, String> = LinkCache::new();

        // building one entry may derive a related entry on the same cache
        let current = names.get();
        let a = cache.resolve("a", &current, || {
            let b = cache.resolve("b", &names.get(), || names.link());
            b.on_change(|_| {})
        });
        assert_eq!(*a.value(), "left");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cache_reuses_until_value_changes() {
        let cell = StateCell::new(vec![1i32, 2]);
        let cache: LinkCache<&'static str, Vec<i32>> = LinkCache::new();

        let current = cell.get();
        let a = cache.resolve("items", &current, || cell.link());
        let b = cache.resolve("items", &current, || cell.link());
        // same write rule object: the cached entry was reused
        assert!(Rc::ptr_eq(&a.write, &b.write));

        a.push(3);
        let current = cell.get();
        let c = cache.resolve("items", &current, || cell.link());
        assert!(!Rc::ptr_eq(&a.write, &c.write));
        assert_eq!(*c.value(), vec![1, 2, 3]);
    }
}
