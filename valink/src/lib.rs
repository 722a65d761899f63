//! Functional pointers ("links") into nested immutable state.
//!
//! # Link
//! A link is an object that represents a location inside a state tree: it
//! carries a snapshot of the value at that location, an optional validation
//! error, and a write rule that knows how to publish a replacement value.
//! Writing through a link never mutates anything it can see; instead it
//! rebuilds the spine of containers from the written location up to the root
//! (structural sharing: untouched siblings are reused as-is) and hands the new
//! root to the host adapter.
//!
//! # Derivation
//! Links are derived from other links: [`Link::at`] focuses one key of a
//! container, [`Link::field`] focuses one field of a struct, and
//! [`Link::equals`]/[`Link::enabled`]/[`Link::contains`] derive boolean views
//! whose writes translate the boolean intent back into a concrete parent
//! write. A derived link is a cheap, disposable value; it holds no
//! subscriptions and is re-derived whenever the host re-reads its state.
//!
//! # Host
//! The only mutable cell in the system is owned by the host adapter
//! ([`StateCell`], or whatever implements the commit closure given to
//! [`Link::from_value_and_setter`]). Read-after-write holds from the next
//! derivation of the root link, not within the same derivation.

mod container;
mod error;
mod form;
mod link;
mod state;

pub use container::Container;
pub use error::ValidationError;
pub use form::{
    get_errors, get_values, has_errors, has_errors_any, set_values, CheckboxProps, FormField,
    InputProps,
};
pub use link::Link;
pub use state::{Host, LinkCache, StateCell};
pub use valink_common::Data;
