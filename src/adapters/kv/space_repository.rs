//! Space repository backed by a key-value store.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::foundation::SpaceId;
use crate::domain::space::SpaceRecord;
use crate::ports::{KeyValueStore, SpaceRepository, StoreError};

const ENTITY: &str = "space record";

/// Stores each space under its id (`space_<n>`).
#[derive(Clone)]
pub struct KvSpaceRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl KvSpaceRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }
}

/// Sequence used when the key scan fails.
fn time_based_sequence() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[async_trait]
impl SpaceRepository for KvSpaceRepository {
    async fn next_id(&self) -> SpaceId {
        match self.kv.list(SpaceId::PREFIX).await {
            Ok(keys) => {
                let max = keys
                    .iter()
                    .filter_map(|key| SpaceId::from_raw(key.as_str()).sequence())
                    .max()
                    .unwrap_or(0);
                SpaceId::from_sequence(max + 1)
            }
            Err(err) => {
                tracing::warn!(error = %err, "space key scan failed, using time-based id");
                SpaceId::from_sequence(time_based_sequence())
            }
        }
    }

    async fn save(&self, record: &SpaceRecord) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(record).map_err(|e| StoreError::serialization(ENTITY, e))?;
        self.kv.put(record.id.as_str(), value).await?;
        Ok(())
    }

    async fn find(&self, id: &SpaceId) -> Result<Option<SpaceRecord>, StoreError> {
        match self.kv.get(id.as_str()).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::deserialization(ENTITY, id.as_str(), e)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<SpaceRecord>, StoreError> {
        let keys = self.kv.list(SpaceId::PREFIX).await?;
        let mut records = Vec::with_capacity(keys.len());

        for key in keys {
            // Deleted between the scan and the read.
            let Some(mut value) = self.kv.get(&key).await? else {
                continue;
            };
            if let Some(object) = value.as_object_mut() {
                object
                    .entry("id")
                    .or_insert_with(|| serde_json::Value::String(key.clone()));
            }
            match serde_json::from_value::<SpaceRecord>(value) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "skipping unreadable space record");
                }
            }
        }

        Ok(records)
    }
}
