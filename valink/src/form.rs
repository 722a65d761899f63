//! Form-facing surface: spreadable control props and bulk helpers over a
//! keyed collection of links.

use std::hash::Hash;
use std::rc::Rc;

use fnv::FnvHashMap;
use valink_common::Data;

use crate::error::ValidationError;
use crate::link::Link;

/// `{ value, on_change }` projection for text-like controls.
pub struct InputProps<T> {
    pub value: T,
    pub on_change: Rc<dyn Fn(T)>,
}

impl<T: Clone> Clone for InputProps<T> {
    fn clone(&self) -> Self {
        InputProps {
            value: self.value.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

/// `{ checked, on_change }` projection for checkbox-like controls.
#[derive(Clone)]
pub struct CheckboxProps {
    pub checked: bool,
    pub on_change: Rc<dyn Fn(bool)>,
}

impl<T: Data> Link<T> {
    pub fn input_props(&self) -> InputProps<T> {
        InputProps {
            value: self.get(),
            on_change: self.write.clone(),
        }
    }
}

impl Link<bool> {
    pub fn checkbox_props(&self) -> CheckboxProps {
        CheckboxProps {
            checked: self.get(),
            on_change: self.write.clone(),
        }
    }
}

/// Type-erased view of a link's validation state, for gating submission over
/// fields of mixed value types.
pub trait FormField {
    fn field_error(&self) -> Option<&ValidationError>;

    fn is_valid(&self) -> bool {
        self.field_error().is_none()
    }
}

impl<T: Data> FormField for Link<T> {
    fn field_error(&self) -> Option<&ValidationError> {
        self.error()
    }
}

/// Current values of every field, keyed like the input.
pub fn get_values<K, T>(fields: &FnvHashMap<K, Link<T>>) -> FnvHashMap<K, T>
where
    K: Clone + Eq + Hash,
    T: Data,
{
    fields.iter().map(|(k, link)| (k.clone(), link.get())).collect()
}

/// Validation errors of the fields that carry one.
pub fn get_errors<K, T>(fields: &FnvHashMap<K, Link<T>>) -> FnvHashMap<K, ValidationError>
where
    K: Clone + Eq + Hash,
    T: Data,
{
    fields
        .iter()
        .filter_map(|(k, link)| link.error().map(|e| (k.clone(), e.clone())))
        .collect()
}

/// `true` if any field carries a validation error.
pub fn has_errors<K, T>(fields: &FnvHashMap<K, Link<T>>) -> bool
where
    K: Eq + Hash,
    T: Data,
{
    fields.values().any(|link| !link.is_valid())
}

/// Heterogeneous counterpart of [`has_errors`] over type-erased fields.
pub fn has_errors_any(fields: &[&dyn FormField]) -> bool {
    fields.iter().any(|field| !field.is_valid())
}

/// Writes `source[k]` through each field link whose key appears in `source`.
/// Used to reset or pre-fill a form in one go.
pub fn set_values<K, T>(fields: &FnvHashMap<K, Link<T>>, source: &FnvHashMap<K, T>)
where
    K: Eq + Hash,
    T: Data,
{
    for (key, link) in fields {
        if let Some(value) = source.get(key) {
            link.set(value.clone());
        }
    }
}
