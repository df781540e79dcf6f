//! Store adapters layered on the KeyValueStore port.
//!
//! ## Key Layout
//!
//! - `conversation:<session_id>` - [`KvConversationStore`]
//! - `registration:<session_id>` - [`KvRegistrationStore`]
//! - `space_<n>` - [`KvSpaceRepository`]

mod conversation_store;
mod registration_store;
mod space_repository;

pub use conversation_store::KvConversationStore;
pub use registration_store::KvRegistrationStore;
pub use space_repository::KvSpaceRepository;
