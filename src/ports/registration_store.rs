//! Registration Store Port - In-progress registrations.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::registration::RegistrationState;

use super::StoreError;

/// Port for persisting one active registration per session.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn load(&self, session_id: &SessionId) -> Result<Option<RegistrationState>, StoreError>;

    async fn save(&self, state: &RegistrationState) -> Result<(), StoreError>;

    /// Discards a session's registration once it has been finalized.
    async fn delete(&self, session_id: &SessionId) -> Result<(), StoreError>;
}
