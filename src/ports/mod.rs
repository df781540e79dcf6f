//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## External Capabilities
//!
//! - `AIProvider` - Text-completion gateway
//! - `KeyValueStore` - JSON document store
//!
//! ## Stores
//!
//! - `ConversationStore` - Bounded turn history per session
//! - `RegistrationStore` - In-progress registration per session
//! - `SpaceRepository` - Finalized space records and id generation

mod ai_provider;
mod conversation_store;
mod key_value_store;
mod registration_store;
mod space_repository;
mod store_error;

pub use ai_provider::{
    AIError, AIProvider, CompletionPurpose, CompletionRequest, CompletionResponse, FinishReason,
    Message, MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use conversation_store::ConversationStore;
pub use key_value_store::{KeyValueStore, KvError};
pub use registration_store::RegistrationStore;
pub use space_repository::SpaceRepository;
pub use store_error::StoreError;
