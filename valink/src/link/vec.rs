//! `Vec<T>` link conveniences: sequence mutators and the membership view.

use std::rc::Rc;

use tracing::warn;
use valink_common::Data;

use crate::link::Link;

impl<T: Data> Link<Vec<T>> {
    /// Appends `item` and commits.
    pub fn push(&self, item: T) {
        self.update(|v| {
            v.push(item);
            true
        });
    }

    /// Prepends `item` and commits.
    pub fn unshift(&self, item: T) {
        self.update(|v| {
            v.insert(0, item);
            true
        });
    }

    /// Removes `remove` elements starting at `start`, inserts `items` in
    /// their place, and commits. Out-of-range `start`/`remove` are clamped to
    /// the sequence bounds rather than panicking.
    pub fn splice(&self, start: usize, remove: usize, items: Vec<T>) {
        self.update(|v| {
            let len = v.len();
            if start > len {
                warn!(start, len, "splice start out of range, clamping");
            }
            let start = start.min(len);
            let end = start.saturating_add(remove).min(len);
            if remove > end - start {
                warn!(remove, available = end - start, "splice remove out of range, clamping");
            }
            v.splice(start..end, items);
            true
        });
    }

    /// Derives a boolean view over membership of `element`.
    ///
    /// `true` while any element is `same` as `element` at construction time.
    /// Writing `true` appends `element` (no dedup: membership is checked
    /// against the construction snapshot, not re-checked per write); writing
    /// `false` removes every occurrence.
    pub fn contains(&self, element: T) -> Link<bool> {
        let snapshot = self.value.clone();
        let value = snapshot.iter().any(|x| x.same(&element));
        let write = self.write.clone();
        Link {
            value,
            error: None,
            write: Rc::new(move |on: bool| {
                let mut next = snapshot.clone();
                if on {
                    next.push(element.clone());
                } else {
                    next.retain(|x| !x.same(&element));
                }
                write(next);
            }),
        }
    }
}
