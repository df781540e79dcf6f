//! Conversation - the bounded, append-only turn history of a session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp};

use super::turn::Turn;

/// Maximum number of turns kept in storage per session.
pub const MAX_STORED_TURNS: usize = 20;

/// Maximum number of turns read back as context for classification and replies.
pub const CONTEXT_TURNS: usize = 10;

/// Turn history of one session.
///
/// Invariants: turns are ordered by non-decreasing `created_at`, and at most
/// [`MAX_STORED_TURNS`] are retained (oldest dropped first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub session_id: SessionId,
    turns: Vec<Turn>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new(session_id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            session_id,
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a turn and truncates the history to [`MAX_STORED_TURNS`].
    ///
    /// A turn stamped earlier than the current last turn (clock skew between
    /// request handlers) is re-stamped to the last turn's time.
    pub fn append(&mut self, mut turn: Turn) {
        if let Some(last) = self.turns.last() {
            if turn.created_at.is_before(&last.created_at) {
                turn.created_at = last.created_at;
            }
        }

        self.updated_at = turn.created_at;
        self.turns.push(turn);

        if self.turns.len() > MAX_STORED_TURNS {
            let overflow = self.turns.len() - MAX_STORED_TURNS;
            self.turns.drain(..overflow);
        }
    }

    /// All stored turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent turns, at most [`CONTEXT_TURNS`], oldest first.
    pub fn context(&self) -> &[Turn] {
        let start = self.turns.len().saturating_sub(CONTEXT_TURNS);
        &self.turns[start..]
    }

    /// The context window that precedes the latest turn.
    ///
    /// Used right after a user turn is appended, so the classifier sees the
    /// history without the message it is classifying.
    pub fn context_before_latest(&self) -> &[Turn] {
        let end = self.turns.len().saturating_sub(1);
        let start = end.saturating_sub(CONTEXT_TURNS);
        &self.turns[start..end]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Re-applies the storage bound to a history loaded from outside.
    pub(crate) fn enforce_bounds(mut self) -> Self {
        if self.turns.len() > MAX_STORED_TURNS {
            let overflow = self.turns.len() - MAX_STORED_TURNS;
            self.turns.drain(..overflow);
        }
        self
    }
}

/// Renders turns as a plain `role: content` transcript for prompts.
pub fn render_transcript(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role.as_str(), t.content))
        .collect::<Vec<_>>()
        .join("\n")
}
