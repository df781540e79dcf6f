//! Turn - one message exchanged within a session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SpaceId, Timestamp};
use crate::domain::intent::Intent;
use crate::domain::registration::RegistrationOutcome;
use crate::domain::space::SearchMode;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// Structured data attached to a turn alongside its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnMetadata {
    /// Results returned by the search flow.
    SearchResults {
        total_count: usize,
        space_ids: Vec<SpaceId>,
        search_mode: SearchMode,
    },
    /// Outcome of one registration step.
    Registration {
        step: u32,
        outcome: RegistrationOutcome,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        space_id: Option<SpaceId>,
    },
}

/// A single user or assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TurnMetadata>,
}

impl Turn {
    /// Creates a turn stamped with the current time.
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Timestamp::now(),
            intent: None,
            metadata: None,
        }
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    /// Sets the classified intent.
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }

    /// Attaches metadata.
    pub fn with_metadata(mut self, metadata: TurnMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Overrides the creation time.
    pub fn at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }
}
