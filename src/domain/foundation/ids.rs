//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Caller-supplied identifier of a conversation thread.
///
/// The engine never generates session ids; it only validates that the
/// caller sent something non-blank and uses it as a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Creates a SessionId, rejecting blank input. The id is kept byte for
    /// byte, so `" abc"` and `"abc"` are different sessions.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("session_id"));
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// Identifier of a finalized space record, formatted as `space_<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceId(String);

impl SpaceId {
    /// Key prefix shared by every persisted space record.
    pub const PREFIX: &'static str = "space_";

    /// Creates the id for a given sequence number.
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("{}{}", Self::PREFIX, sequence))
    }

    /// Wraps an existing id without checking its shape.
    ///
    /// Records imported from elsewhere may carry ids that do not follow
    /// the `space_<n>` convention; they are still valid identifiers.
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parses the trailing integer suffix, if the id follows the convention.
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(Self::PREFIX)?.parse().ok()
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_rejects_blank_input() {
        assert!(SessionId::new("").is_err());
        assert!(SessionId::new("   ").is_err());
    }

    #[test]
    fn session_id_keeps_caller_bytes() {
        let padded = SessionId::new("  sess-1 ").unwrap();
        assert_eq!(padded.as_str(), "  sess-1 ");
        assert_ne!(padded, SessionId::new("sess-1").unwrap());
    }

    #[test]
    fn session_id_deserialization_validates() {
        let ok: Result<SessionId, _> = serde_json::from_str("\"abc\"");
        assert!(ok.is_ok());

        let blank: Result<SessionId, _> = serde_json::from_str("\"\"");
        assert!(blank.is_err());
    }

    #[test]
    fn space_id_from_sequence_uses_prefix() {
        let id = SpaceId::from_sequence(7);
        assert_eq!(id.as_str(), "space_7");
        assert_eq!(id.sequence(), Some(7));
    }

    #[test]
    fn space_id_sequence_ignores_foreign_ids() {
        assert_eq!(SpaceId::from_raw("studio-a").sequence(), None);
        assert_eq!(SpaceId::from_raw("space_abc").sequence(), None);
    }
}
