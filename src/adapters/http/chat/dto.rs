//! HTTP DTOs for chat endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{
    AdvanceRegistrationResult, HandleMessageResult, RegistrationProgress, ReplyPayload,
    SearchSpacesResult,
};
use crate::domain::conversation::{Turn, TurnMetadata, TurnRole};
use crate::domain::intent::Intent;
use crate::domain::registration::{FieldName, RegistrationOutcome};
use crate::domain::space::{SearchMode, SpaceListing, SpaceRecord};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to send a chat message.
///
/// Both fields are optional at the serde level so that missing values
/// produce a `FAILURE` payload instead of a bare rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// A chat request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidChatRequest {
    pub message: String,
    pub session_id: String,
}

impl ChatRequest {
    /// Checks both fields, reporting every problem at once.
    pub fn validate(self) -> Result<ValidChatRequest, FailureResponse> {
        let message = self.message.filter(|m| !m.trim().is_empty());
        let session_id = self.session_id.filter(|s| !s.trim().is_empty());

        match (message, session_id) {
            (Some(message), Some(session_id)) => Ok(ValidChatRequest {
                message,
                session_id,
            }),
            (message, session_id) => {
                let mut errors = Vec::new();
                if message.is_none() {
                    errors.push(ErrorDetail::new("message is required"));
                }
                if session_id.is_none() {
                    errors.push(ErrorDetail::new("session_id is required"));
                }
                Err(FailureResponse::new(errors))
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Status marker carried by every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failure,
}

/// Error body: `{status: "FAILURE", error: [{message}]}`.
#[derive(Debug, Clone, Serialize)]
pub struct FailureResponse {
    pub status: ResponseStatus,
    pub error: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl FailureResponse {
    pub fn new(error: Vec<ErrorDetail>) -> Self {
        Self {
            status: ResponseStatus::Failure,
            error,
        }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self::new(vec![ErrorDetail::new(message)])
    }
}

/// Successful reply to a chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub status: ResponseStatus,
    pub session_id: String,
    pub intent: Intent,
    pub reply: String,
    #[serde(flatten)]
    pub search: Option<SearchPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<RegistrationPayload>,
}

/// Search results attached to a search reply.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPayload {
    pub total_count: usize,
    pub search_mode: SearchMode,
    pub results: Vec<SpaceListing>,
}

impl From<SearchSpacesResult> for SearchPayload {
    fn from(result: SearchSpacesResult) -> Self {
        Self {
            total_count: result.total_count(),
            search_mode: result.search_mode,
            results: result.listings,
        }
    }
}

/// Progress attached to a registration reply.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationPayload {
    pub outcome: RegistrationOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    pub total_steps: u32,
    pub collected_fields: Vec<FieldName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<SpaceRecord>,
}

impl From<AdvanceRegistrationResult> for RegistrationPayload {
    fn from(result: AdvanceRegistrationResult) -> Self {
        Self {
            outcome: result.outcome,
            step: result.step,
            total_steps: result.total_steps,
            collected_fields: result.collected_fields,
            space: result.space,
        }
    }
}

impl ChatResponse {
    pub fn from_result(session_id: String, result: HandleMessageResult) -> Self {
        let (search, registration) = match result.payload {
            ReplyPayload::Search(search) => (Some(search.into()), None),
            ReplyPayload::Registration(registration) => (None, Some(registration.into())),
            ReplyPayload::Profile => (None, None),
        };

        Self {
            status: ResponseStatus::Success,
            session_id,
            intent: result.intent,
            reply: result.reply,
            search,
            registration,
        }
    }
}

/// One stored turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub role: TurnRole,
    pub content: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TurnMetadata>,
}

impl From<Turn> for TurnResponse {
    fn from(turn: Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content,
            created_at: turn.created_at.as_datetime().to_rfc3339(),
            intent: turn.intent,
            metadata: turn.metadata,
        }
    }
}

/// Stored history of a session.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub status: ResponseStatus,
    pub session_id: String,
    pub turns: Vec<TurnResponse>,
}

impl HistoryResponse {
    pub fn new(session_id: String, turns: Vec<Turn>) -> Self {
        Self {
            status: ResponseStatus::Success,
            session_id,
            turns: turns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Registration progress of a session; `registration` is null when none is active.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationProgressResponse {
    pub status: ResponseStatus,
    pub session_id: String,
    pub registration: Option<RegistrationProgress>,
}
