//! Storage Adapters
//!
//! Implementations of the KeyValueStore port.
//!
//! ## Available Adapters
//!
//! - **InMemoryKeyValueStore** - Process-local map (testing/development)
//! - **RedisKeyValueStore** - Redis strings holding JSON (production)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryKeyValueStore, RedisKeyValueStore};
//!
//! // Production: Redis
//! let store = RedisKeyValueStore::connect("redis://127.0.0.1/").await?;
//!
//! // Testing: in-memory
//! let store = InMemoryKeyValueStore::new();
//! ```

mod in_memory_kv_store;
mod redis_kv_store;

pub use in_memory_kv_store::InMemoryKeyValueStore;
pub use redis_kv_store::RedisKeyValueStore;
