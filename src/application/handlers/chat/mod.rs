//! Inbound message orchestration.

mod handle_message;

pub use handle_message::{HandleMessageCommand, HandleMessageHandler, HandleMessageResult, ReplyPayload};
