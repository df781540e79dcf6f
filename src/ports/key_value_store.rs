//! Key-Value Store Port - Minimal JSON document store.
//!
//! Every piece of session state and every space record lives behind this
//! trait. No compare-and-swap is offered; writers race and the last one wins.

use async_trait::async_trait;
use serde_json::Value;

/// Errors raised by key-value store implementations.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("Key-value backend unavailable: {0}")]
    Unavailable(String),

    #[error("Key-value operation failed: {0}")]
    Backend(String),

    #[error("Stored value under '{key}' is not valid JSON: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Port for a key-value store holding JSON values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Missing keys yield `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError>;

    /// Writes a value, replacing any previous one.
    async fn put(&self, key: &str, value: Value) -> Result<(), KvError>;

    /// Lists keys starting with `prefix` (all keys for an empty prefix).
    async fn list(&self, prefix: &str) -> Result<Vec<String>, KvError>;

    /// Deletes a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), KvError>;
}
