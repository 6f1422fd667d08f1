//! Identifier and cursor newtypes
//!
//! Newtype wrappers keep collection names and pagination cursors from being
//! mixed up with arbitrary strings and JSON values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Collection identifier newtype wrapper
///
/// The identifier is the collection's name as reported by the database.
/// Comparison against user input is case-insensitive, see [`CollectionId::matches`].
///
/// # Examples
///
/// ```
/// use fauna_dump::domain::ids::CollectionId;
/// use std::str::FromStr;
///
/// let id = CollectionId::from_str("User").unwrap();
/// assert!(id.matches("user"));
/// assert_eq!(id.as_str(), "User");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionId(String);

impl CollectionId {
    /// Creates a new CollectionId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(CollectionId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Collection ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the collection ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Case-insensitive comparison against a user-supplied name
    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CollectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque pagination cursor
///
/// Holds the `after` token returned with a page, verbatim. It is only ever
/// handed back to the service that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(Value);

impl Cursor {
    /// Wrap a raw continuation token
    pub fn new(token: Value) -> Self {
        Self(token)
    }

    /// The raw token, as it must be sent back to the service
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
