//! Opaque media store reference

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference issued by the media store for a persisted audio file
///
/// The engine never interprets the value; it is only handed back to the
/// store when the file is trashed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    /// Wrap a store-issued reference
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the reference as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the reference, returning the inner value
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MediaRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for MediaRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
