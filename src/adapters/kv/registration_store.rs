//! Registration store backed by a key-value store.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::registration::RegistrationState;
use crate::ports::{KeyValueStore, RegistrationStore, StoreError};

const KEY_PREFIX: &str = "registration:";
const ENTITY: &str = "registration state";

/// Stores one registration state per session.
#[derive(Clone)]
pub struct KvRegistrationStore {
    kv: Arc<dyn KeyValueStore>,
}

impl KvRegistrationStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    fn key(session_id: &SessionId) -> String {
        format!("{}{}", KEY_PREFIX, session_id)
    }
}

#[async_trait]
impl RegistrationStore for KvRegistrationStore {
    async fn load(&self, session_id: &SessionId) -> Result<Option<RegistrationState>, StoreError> {
        let key = Self::key(session_id);
        match self.kv.get(&key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::deserialization(ENTITY, &key, e)),
            None => Ok(None),
        }
    }

    async fn save(&self, state: &RegistrationState) -> Result<(), StoreError> {
        let value = serde_json::to_value(state).map_err(|e| StoreError::serialization(ENTITY, e))?;
        self.kv.put(&Self::key(&state.session_id), value).await?;
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> Result<(), StoreError> {
        self.kv.delete(&Self::key(session_id)).await?;
        Ok(())
    }
}
