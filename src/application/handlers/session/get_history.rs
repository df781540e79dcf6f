//! GetHistoryHandler - Query handler for a session's stored turns.

use std::sync::Arc;

use crate::domain::conversation::Turn;
use crate::domain::foundation::SessionId;
use crate::ports::{ConversationStore, StoreError};

/// Query for a session's history.
#[derive(Debug, Clone)]
pub struct GetHistoryQuery {
    pub session_id: SessionId,
}

/// Handler returning stored turns, oldest first.
pub struct GetHistoryHandler {
    conversations: Arc<dyn ConversationStore>,
}

impl GetHistoryHandler {
    pub fn new(conversations: Arc<dyn ConversationStore>) -> Self {
        Self { conversations }
    }

    /// Unknown sessions have an empty history.
    pub async fn handle(&self, query: GetHistoryQuery) -> Result<Vec<Turn>, StoreError> {
        Ok(self
            .conversations
            .load(&query.session_id)
            .await?
            .map(|conversation| conversation.turns().to_vec())
            .unwrap_or_default())
    }
}
