//! Conversation store backed by a key-value store.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::conversation::{Conversation, Turn};
use crate::domain::foundation::SessionId;
use crate::ports::{ConversationStore, KeyValueStore, StoreError};

const KEY_PREFIX: &str = "conversation:";
const ENTITY: &str = "conversation";

/// Stores each session's conversation as one JSON document.
///
/// `append` is a read-modify-write with no locking; concurrent appends to
/// the same session can lose a turn.
#[derive(Clone)]
pub struct KvConversationStore {
    kv: Arc<dyn KeyValueStore>,
}

impl KvConversationStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    fn key(session_id: &SessionId) -> String {
        format!("{}{}", KEY_PREFIX, session_id)
    }
}

#[async_trait]
impl ConversationStore for KvConversationStore {
    async fn load(&self, session_id: &SessionId) -> Result<Option<Conversation>, StoreError> {
        let key = Self::key(session_id);
        let Some(value) = self.kv.get(&key).await? else {
            return Ok(None);
        };

        let conversation: Conversation = serde_json::from_value(value)
            .map_err(|e| StoreError::deserialization(ENTITY, &key, e))?;
        Ok(Some(conversation.enforce_bounds()))
    }

    async fn append(&self, session_id: &SessionId, turn: Turn) -> Result<Conversation, StoreError> {
        let mut conversation = self
            .load(session_id)
            .await?
            .unwrap_or_else(|| Conversation::new(session_id.clone()));

        conversation.append(turn);

        let value =
            serde_json::to_value(&conversation).map_err(|e| StoreError::serialization(ENTITY, e))?;
        self.kv.put(&Self::key(session_id), value).await?;

        Ok(conversation)
    }
}
