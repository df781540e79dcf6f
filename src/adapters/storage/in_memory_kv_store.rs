//! In-Memory Key-Value Store Adapter
//!
//! Keeps JSON values in a process-local map. Useful for testing and
//! development; contents are lost on restart.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{KeyValueStore, KvError};

/// In-memory key-value store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl InMemoryKeyValueStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Get the number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), KvError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, KvError> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_then_get_returns_value() {
        let store = InMemoryKeyValueStore::new();
        store.put("space_1", json!({"name": "스튜디오 A"})).await.unwrap();

        let value = store.get("space_1").await.unwrap();
        assert_eq!(value, Some(json!({"name": "스튜디오 A"})));
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = InMemoryKeyValueStore::new();
        store.put("k", json!(1)).await.unwrap();
        store.put("k", json!(2)).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let store = InMemoryKeyValueStore::new();
        store.put("space_1", json!({})).await.unwrap();
        store.put("space_2", json!({})).await.unwrap();
        store.put("session:a", json!({})).await.unwrap();

        let keys = store.list("space_").await.unwrap();
        assert_eq!(keys, vec!["space_1".to_string(), "space_2".to_string()]);

        let all = store.list("").await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn delete_removes_key_and_tolerates_missing() {
        let store = InMemoryKeyValueStore::new();
        store.put("k", json!(true)).await.unwrap();

        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();

        assert!(store.is_empty().await);
    }
}
