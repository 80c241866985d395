// Copyright (c) 2025 - Cowboy AI, Inc.
//! Identifier Value Objects with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier is empty")]
    Empty,

    #[error("Identifier exceeds maximum length of 128 characters: {0}")]
    TooLong(usize),

    #[error("Invalid character in identifier: {0}")]
    InvalidCharacter(char),
}

/// Maximum length for any identifier
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an opaque identifier
///
/// # Invariants
/// - Non-empty
/// - Length ≤ 128 characters
/// - ASCII alphanumeric plus `-` and `_` only
///
/// Identifiers double as NATS KV key segments and subject tokens, so the
/// character set deliberately excludes `.`, `*`, `>`, `/`, and whitespace.
fn validate(raw: &str) -> Result<(), IdentifierError> {
    if raw.is_empty() {
        return Err(IdentifierError::Empty);
    }

    if raw.len() > MAX_IDENTIFIER_LENGTH {
        return Err(IdentifierError::TooLong(raw.len()));
    }

    for ch in raw.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_' {
            return Err(IdentifierError::InvalidCharacter(ch));
        }
    }

    Ok(())
}

/// Opaque event identifier value object
///
/// Assigned at event creation by the event directory; immutable thereafter.
/// The membership store uses it verbatim as the KV key for the event's
/// membership record.
///
/// # Examples
///
/// ```rust
/// use rsvp_admission::domain::EventId;
///
/// let event = EventId::new("summer-bbq-2026").unwrap();
/// assert_eq!(event.as_str(), "summer-bbq-2026");
///
/// // Invalid identifiers
/// assert!(EventId::new("").is_err());
/// assert!(EventId::new("has spaces").is_err());
/// assert!(EventId::new("dotted.name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Create a new event identifier with validation
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        validate(&id)?;
        Ok(Self(id))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EventId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EventId {
    type Error = IdentifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated user identifier value object
///
/// Supplied by the identity provider; trusted as given. Subject to the same
/// character-set invariants as [`EventId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user identifier with validation
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        validate(&id)?;
        Ok(Self(id))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserId {
    type Error = IdentifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(EventId::new("summer-bbq-2026").is_ok());
        assert!(EventId::new("a").is_ok());
        assert!(UserId::new("alice").is_ok());
        assert!(UserId::new("user_42").is_ok());
        assert!(UserId::new("A-b_C-3").is_ok());
    }

    #[test]
    fn test_invalid_identifiers() {
        assert_eq!(EventId::new("").unwrap_err(), IdentifierError::Empty);
        assert_eq!(
            UserId::new("has space").unwrap_err(),
            IdentifierError::InvalidCharacter(' ')
        );
        assert_eq!(
            EventId::new("dotted.name").unwrap_err(),
            IdentifierError::InvalidCharacter('.')
        );
        assert_eq!(
            EventId::new("wild>card").unwrap_err(),
            IdentifierError::InvalidCharacter('>')
        );
        assert_eq!(
            UserId::new("sl/ash").unwrap_err(),
            IdentifierError::InvalidCharacter('/')
        );
    }

    #[test]
    fn test_length_limit() {
        let max = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(EventId::new(max.clone()).is_ok());

        let too_long = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert_eq!(
            EventId::new(too_long).unwrap_err(),
            IdentifierError::TooLong(MAX_IDENTIFIER_LENGTH + 1)
        );
    }

    #[test]
    fn test_display_and_conversion() {
        let user = UserId::try_from("alice").unwrap();
        assert_eq!(format!("{}", user), "alice");
        assert_eq!(user.as_str(), "alice");
        assert_eq!(user.as_ref(), "alice");
    }
}
