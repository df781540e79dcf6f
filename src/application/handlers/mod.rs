//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod chat;
pub mod registration;
pub mod search;
pub mod session;

pub use chat::{HandleMessageCommand, HandleMessageHandler, HandleMessageResult, ReplyPayload};
pub use registration::{
    AdvanceRegistrationCommand, AdvanceRegistrationHandler, AdvanceRegistrationResult,
};
pub use search::{SearchSpacesCommand, SearchSpacesHandler, SearchSpacesResult};
pub use session::{
    GetHistoryHandler, GetHistoryQuery, GetRegistrationProgressHandler,
    GetRegistrationProgressQuery, RegistrationProgress,
};
