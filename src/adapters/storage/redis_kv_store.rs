//! Redis-backed key-value store for production deployments.
//!
//! Values are stored as JSON strings. Keys are optionally namespaced so
//! several deployments can share one Redis database; the namespace is
//! stripped again by `list`.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde_json::Value;

use crate::ports::{KeyValueStore, KvError};

/// Redis key-value store.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    conn: MultiplexedConnection,
    namespace: String,
}

impl RedisKeyValueStore {
    /// Wraps an existing connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            namespace: String::new(),
        }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self, KvError> {
        let client = redis::Client::open(url).map_err(|e| KvError::Unavailable(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| KvError::Unavailable(e.to_string()))?;
        Ok(Self::new(conn))
    }

    /// Prefixes every key with `namespace`.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }
}

/// Escapes glob metacharacters so a literal prefix can be used in `SCAN MATCH`.
fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn backend(e: redis::RedisError) -> KvError {
    if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
        KvError::Unavailable(e.to_string())
    } else {
        KvError::Backend(e.to_string())
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.full_key(key)).await.map_err(backend)?;

        raw.map(|text| {
            serde_json::from_str(&text).map_err(|e| KvError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.full_key(key), value.to_string())
            .await
            .map_err(backend)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, KvError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", escape_glob(&self.full_key(prefix)));

        let mut keys = Vec::new();
        {
            let mut iter: redis::AsyncIter<String> =
                conn.scan_match(&pattern).await.map_err(backend)?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        let mut keys: Vec<String> = keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.namespace).map(str::to_string))
            .collect();
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.full_key(key)).await.map_err(backend)
    }
}
