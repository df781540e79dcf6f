//! Gateway-backed services.
//!
//! Each service owns one kind of text-completion call: the prompt, the
//! generation options, and what a failure degrades to.

mod field_extractor;
mod intent_classifier;
mod response_synthesizer;

pub use field_extractor::FieldExtractor;
pub use intent_classifier::IntentClassifier;
pub use response_synthesizer::{ReplyKind, ResponseSynthesizer};

use crate::domain::foundation::SessionId;
use crate::ports::{CompletionPurpose, RequestMetadata};

/// Identifies the inbound message every gateway call is made for.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub session_id: SessionId,
    pub trace_id: String,
}

impl CallContext {
    pub fn new(session_id: SessionId, trace_id: impl Into<String>) -> Self {
        Self {
            session_id,
            trace_id: trace_id.into(),
        }
    }

    /// Creates a context with a fresh random trace id.
    pub fn with_new_trace(session_id: SessionId) -> Self {
        Self::new(session_id, uuid::Uuid::new_v4().to_string())
    }

    pub(crate) fn metadata(&self, purpose: CompletionPurpose) -> RequestMetadata {
        RequestMetadata::new(self.session_id.clone(), purpose, self.trace_id.clone())
    }
}
