//! Record identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, InvalidInputError};

/// A validated record identifier.
///
/// Identifiers are generated on the device at creation time so a record
/// can be stored and referenced before the backend has ever seen it.
/// Generated ids are hyphenated lowercase UUID v4 strings; ids received
/// from elsewhere only need to be filesystem- and URL-safe.
///
/// # Example
///
/// ```
/// use fieldsync_core::RecordId;
///
/// let id = RecordId::new("3f1c2a9e-5b7d-4e0a-9c1f-2d3e4f5a6b7c").unwrap();
/// assert_eq!(id.as_str(), "3f1c2a9e-5b7d-4e0a-9c1f-2d3e4f5a6b7c");
/// assert!(RecordId::new("../etc").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create a record id from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, too long, or contains
    /// characters outside `[A-Za-z0-9._-]`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if s.len() > 128 {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: "exceeds maximum length of 128 characters".to_string(),
            }
            .into());
        }

        // Ids double as file names.
        if s.starts_with('.') {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: "cannot start with '.'".to_string(),
            }
            .into());
        }

        if let Some(c) = s
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_' && *c != '.')
        {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: format!("contains invalid character '{}'", c),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
