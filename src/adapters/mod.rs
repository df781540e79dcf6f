//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Text-completion gateways (OpenAI, Anthropic, mock)
//! - `storage` - Key-value backends (in-memory, Redis)
//! - `kv` - Conversation, registration and space stores over a key-value backend
//! - `http` - REST API (axum)

pub mod ai;
pub mod http;
pub mod kv;
pub mod storage;

pub use ai::{AnthropicProvider, MockAIProvider, OpenAIProvider};
pub use http::{app_router, ChatHandlers};
pub use kv::{KvConversationStore, KvRegistrationStore, KvSpaceRepository};
pub use storage::{InMemoryKeyValueStore, RedisKeyValueStore};
