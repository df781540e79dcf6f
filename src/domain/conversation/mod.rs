//! Conversation domain module.
//!
//! Per-session turn history with the storage and context bounds
//! applied on every write.

mod conversation;
mod turn;

pub use conversation::{render_transcript, Conversation, CONTEXT_TURNS, MAX_STORED_TURNS};
pub use turn::{Turn, TurnMetadata, TurnRole};
