//! The link algebra: reading, writing and deriving pointers into nested state.

use std::fmt;
use std::rc::Rc;

use fnv::FnvHashMap;
use tracing::trace;
use valink_common::Data;

use crate::container::Container;
use crate::error::ValidationError;

mod vec;

/// A pointer to a value inside a nested, immutable state tree.
///
/// A link holds a snapshot of the value it points at, an optional validation
/// error, and a write rule. The write rule is the only thing that
/// distinguishes a root link from an element link or a derived boolean view:
/// each derivation composes a new closure over its parent's, so a write
/// percolates a structurally-shared copy up the parent chain until the root
/// adapter commits it.
///
/// Links are cheap, disposable values. They are re-derived on every read of
/// the host state and hold no subscriptions.
pub struct Link<T: Data> {
    pub(crate) value: T,
    pub(crate) error: Option<ValidationError>,
    pub(crate) write: Rc<dyn Fn(T)>,
}

impl<T: Data> Clone for Link<T> {
    fn clone(&self) -> Self {
        Link {
            value: self.value.clone(),
            error: self.error.clone(),
            write: self.write.clone(),
        }
    }
}

impl<T: Data + fmt::Debug> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Link")
            .field("value", &self.value)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T: Data> Link<T> {
    /// Creates a root link from a value and a commit function.
    ///
    /// This is the custom-root constructor: the setter is the write rule,
    /// verbatim. Everything else in the crate is derived from links built
    /// here (or from [`StateCell::link`](crate::StateCell::link), which calls
    /// this).
    pub fn from_value_and_setter(value: T, set: impl Fn(T) + 'static) -> Link<T> {
        Link {
            value,
            error: None,
            write: Rc::new(set),
        }
    }

    /// The current snapshot. Never mutated in place; a changed value is only
    /// ever observed through a freshly derived link.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Snapshot copy of the current value.
    pub fn get(&self) -> T {
        self.value.clone()
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Publishes a replacement value through the write rule.
    pub fn set(&self, value: T) {
        (self.write)(value);
    }

    /// Clones the current value, lets `f` edit the clone, and commits the
    /// result when `f` returns `true`. Returning `false` means "no update":
    /// nothing is written, nothing propagates.
    ///
    /// This is the universal batched-mutation entry point; the sequence
    /// mutators and `remove_at` all funnel through it.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) {
        let mut next = self.value.clone();
        if f(&mut next) {
            self.set(next);
        } else {
            trace!("update declined, skipping write");
        }
    }

    /// Wraps `update` in an event-handler-shaped closure, so call sites can
    /// hand a ready-made handler to a control instead of re-deriving one.
    pub fn action<E>(&self, f: impl Fn(&mut T, &E) -> bool + 'static) -> impl Fn(&E) {
        let link = self.clone();
        move |event: &E| link.update(|value| f(value, event))
    }

    /// Records `error` on this link if no earlier check failed and `pred`
    /// rejects the current value. First failing check wins; chain
    /// most-specific-first. `ValidationError::default()` gives the generic
    /// message.
    pub fn check(
        mut self,
        pred: impl FnOnce(&T) -> bool,
        error: impl Into<ValidationError>,
    ) -> Self {
        if self.error.is_none() && !pred(&self.value) {
            self.error = Some(error.into());
        }
        self
    }

    /// Returns a link that invokes `handler` with the written value before
    /// forwarding it. Observable value semantics are unchanged; the carried
    /// error is propagated from this link.
    pub fn on_change(&self, handler: impl Fn(&T) + 'static) -> Link<T> {
        let write = self.write.clone();
        Link {
            value: self.value.clone(),
            error: self.error.clone(),
            write: Rc::new(move |value: T| {
                handler(&value);
                write(value);
            }),
        }
    }

    /// Returns a link whose writes are first passed through `f(next, prev)`.
    /// `None` means "no update" and suppresses the write entirely. Used for
    /// write-side coercion (e.g. upper-casing on commit).
    pub fn pipe(&self, f: impl Fn(T, &T) -> Option<T> + 'static) -> Link<T> {
        let write = self.write.clone();
        let prev = self.value.clone();
        Link {
            value: self.value.clone(),
            error: self.error.clone(),
            write: Rc::new(move |value: T| match f(value, &prev) {
                Some(next) => write(next),
                None => trace!("pipe declined, skipping write"),
            }),
        }
    }

    /// Focuses one field of a struct-shaped value. `get` projects the field
    /// out, `put` writes it back into a clone of the parent; together they
    /// play the role a key plays for containers.
    ///
    /// Writing a value that is `same` as the field's construction-time
    /// snapshot skips the parent write entirely.
    pub fn field<U: Data>(
        &self,
        get: impl FnOnce(&T) -> U,
        put: impl Fn(&mut T, U) + 'static,
    ) -> Link<U> {
        let current = get(&self.value);
        let snapshot = current.clone();
        let parent = self.value.clone();
        let write = self.write.clone();
        Link {
            value: current,
            error: None,
            write: Rc::new(move |value: U| {
                if value.same(&snapshot) {
                    trace!("skipping write of identical field value");
                    return;
                }
                let mut next = parent.clone();
                put(&mut next, value);
                write(next);
            }),
        }
    }

    /// Derives a boolean view that is `true` while this link's value is
    /// `same` as `truthy`. Writing `true` sets `truthy` on the parent;
    /// writing `false` resets the parent to `T::default()`.
    pub fn equals(&self, truthy: T) -> Link<bool>
    where
        T: Default,
    {
        let value = self.value.same(&truthy);
        let write = self.write.clone();
        Link {
            value,
            error: None,
            write: Rc::new(move |on: bool| {
                if on {
                    write(truthy.clone());
                } else {
                    write(T::default());
                }
            }),
        }
    }
}

impl<T: Data> Link<Option<T>> {
    /// Derives a boolean view over the presence of an optional value.
    /// Writing `true` fills the parent with `default`; writing `false`
    /// clears it.
    pub fn enabled(&self, default: T) -> Link<bool> {
        let value = self.value.is_some();
        let write = self.write.clone();
        Link {
            value,
            error: None,
            write: Rc::new(move |on: bool| {
                write(if on { Some(default.clone()) } else { None });
            }),
        }
    }

    pub fn enabled_or_default(&self) -> Link<bool>
    where
        T: Default,
    {
        self.enabled(T::default())
    }
}

impl<C: Container> Link<C> {
    /// Focuses the element at `key`, or `None` if the key is absent.
    ///
    /// The element link's write clones the parent container, assigns the key
    /// and forwards the clone up the chain — unless the written value is
    /// `same` as the element's construction-time snapshot, in which case the
    /// whole write is skipped and nothing propagates.
    pub fn try_at(&self, key: C::Key) -> Option<Link<C::Element>> {
        let current = self.value.get(&key)?.clone();
        let snapshot = current.clone();
        let parent = self.value.clone();
        let write = self.write.clone();
        Some(Link {
            value: current,
            error: None,
            write: Rc::new(move |value: C::Element| {
                if value.same(&snapshot) {
                    trace!(key = ?key, "skipping write of identical element");
                    return;
                }
                let mut next = parent.clone();
                next.set_at(&key, value);
                write(next);
            }),
        })
    }

    /// Focuses the element at `key`.
    ///
    /// Panics if the key is absent; that is a caller contract violation, not
    /// a recoverable condition. Use [`try_at`](Link::try_at) when absence is
    /// an expected state.
    pub fn at(&self, key: C::Key) -> Link<C::Element> {
        match self.try_at(key.clone()) {
            Some(link) => link,
            None => panic!("link has no element at key {:?}", key),
        }
    }

    /// Derives one element link per requested key. Absent keys are skipped.
    pub fn pick(
        &self,
        keys: impl IntoIterator<Item = C::Key>,
    ) -> FnvHashMap<C::Key, Link<C::Element>> {
        keys.into_iter()
            .filter_map(|key| self.try_at(key.clone()).map(|link| (key, link)))
            .collect()
    }

    /// Derives one element link for every current key.
    pub fn pick_all(&self) -> FnvHashMap<C::Key, Link<C::Element>> {
        self.pick(self.value.keys())
    }

    /// Projects every element through a fresh element link and `f`,
    /// collecting the `Some` results in iteration order. `None` skips the
    /// element; the output is always a plain sequence, whatever the
    /// container shape.
    pub fn map<R>(&self, mut f: impl FnMut(Link<C::Element>, &C::Key) -> Option<R>) -> Vec<R> {
        let mut out = Vec::new();
        for key in self.value.keys() {
            if let Some(link) = self.try_at(key.clone()) {
                if let Some(item) = f(link, &key) {
                    out.push(item);
                }
            }
        }
        out
    }

    /// Removes the element at `key` and commits the shrunk container.
    pub fn remove_at(&self, key: &C::Key) {
        self.update(|value| {
            value.remove_at(key);
            true
        });
    }
}
