//! Application layer - Commands, Queries, Handlers and gateway-backed services.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers never surface external-capability failures; query
//! handlers return store errors to the HTTP shell.

pub mod handlers;
pub mod services;

pub use handlers::{
    // Chat
    HandleMessageCommand, HandleMessageHandler, HandleMessageResult, ReplyPayload,
    // Registration
    AdvanceRegistrationCommand, AdvanceRegistrationHandler, AdvanceRegistrationResult,
    // Search
    SearchSpacesCommand, SearchSpacesHandler, SearchSpacesResult,
    // Session queries
    GetHistoryHandler, GetHistoryQuery, GetRegistrationProgressHandler,
    GetRegistrationProgressQuery, RegistrationProgress,
};
pub use services::{CallContext, FieldExtractor, IntentClassifier, ReplyKind, ResponseSynthesizer};
