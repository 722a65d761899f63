use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failure recorded on a link by [`Link::check`](crate::Link::check).
///
/// This is a value, not a control-flow error: it is never raised, only read
/// back through `Link::error`. A link carries at most one of these; the first
/// failing check wins and later checks on the same instance are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: Cow<'static, str>,
}

impl ValidationError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> ValidationError {
        ValidationError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for ValidationError {
    fn default() -> Self {
        ValidationError::new("invalid value")
    }
}

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::new(message)
    }
}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        ValidationError::new(message)
    }
}
