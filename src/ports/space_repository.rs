//! Space Repository Port - Finalized space records.

use async_trait::async_trait;

use crate::domain::foundation::SpaceId;
use crate::domain::space::SpaceRecord;

use super::StoreError;

/// Port for permanent space storage.
#[async_trait]
pub trait SpaceRepository: Send + Sync {
    /// Returns an id not used by any stored record.
    ///
    /// Best effort: two callers racing may receive the same id.
    async fn next_id(&self) -> SpaceId;

    async fn save(&self, record: &SpaceRecord) -> Result<(), StoreError>;

    async fn find(&self, id: &SpaceId) -> Result<Option<SpaceRecord>, StoreError>;

    /// Loads every stored record. Records that no longer deserialize are skipped.
    async fn list_all(&self) -> Result<Vec<SpaceRecord>, StoreError>;
}
