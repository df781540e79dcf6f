//! Errors shared by the stores layered on the key-value port.

use super::KvError;

/// Errors raised by conversation, registration and space stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    KeyValue(#[from] KvError),

    #[error("Failed to serialize {entity}: {reason}")]
    SerializationFailed { entity: &'static str, reason: String },

    #[error("Failed to deserialize {entity} at '{key}': {reason}")]
    DeserializationFailed {
        entity: &'static str,
        key: String,
        reason: String,
    },
}

impl StoreError {
    pub fn serialization(entity: &'static str, err: serde_json::Error) -> Self {
        Self::SerializationFailed {
            entity,
            reason: err.to_string(),
        }
    }

    pub fn deserialization(entity: &'static str, key: impl Into<String>, err: serde_json::Error) -> Self {
        Self::DeserializationFailed {
            entity,
            key: key.into(),
            reason: err.to_string(),
        }
    }
}
