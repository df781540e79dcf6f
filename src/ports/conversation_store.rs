//! Conversation Store Port - Per-session turn history.

use async_trait::async_trait;

use crate::domain::conversation::{Conversation, Turn};
use crate::domain::foundation::SessionId;

use super::StoreError;

/// Port for persisting conversations.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Loads a session's conversation, if it exists.
    async fn load(&self, session_id: &SessionId) -> Result<Option<Conversation>, StoreError>;

    /// Appends a turn, creating the conversation on first use.
    ///
    /// Returns the conversation as stored, already truncated to its bound.
    async fn append(&self, session_id: &SessionId, turn: Turn) -> Result<Conversation, StoreError>;
}
