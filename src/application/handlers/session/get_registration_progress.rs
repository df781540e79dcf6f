//! GetRegistrationProgressHandler - Query handler for an active registration.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::registration::{total_steps, FieldName, RegistrationState};
use crate::domain::replies;
use crate::ports::{RegistrationStore, StoreError};

/// Query for a session's registration progress.
#[derive(Debug, Clone)]
pub struct GetRegistrationProgressQuery {
    pub session_id: SessionId,
}

/// Snapshot of an in-progress registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationProgress {
    pub step: u32,
    pub total_steps: u32,
    pub collected_fields: Vec<FieldName>,
    /// Prompt for the current step; absent when the state is past the last step.
    pub next_prompt: Option<String>,
    pub updated_at: Timestamp,
}

impl From<&RegistrationState> for RegistrationProgress {
    fn from(state: &RegistrationState) -> Self {
        Self {
            step: state.step,
            total_steps: total_steps(),
            collected_fields: state.collected.collected_fields(),
            next_prompt: state.current_step().map(replies::step_prompt),
            updated_at: state.updated_at,
        }
    }
}

/// Handler returning the active registration, if any.
pub struct GetRegistrationProgressHandler {
    registrations: Arc<dyn RegistrationStore>,
}

impl GetRegistrationProgressHandler {
    pub fn new(registrations: Arc<dyn RegistrationStore>) -> Self {
        Self { registrations }
    }

    pub async fn handle(
        &self,
        query: GetRegistrationProgressQuery,
    ) -> Result<Option<RegistrationProgress>, StoreError> {
        let state = self.registrations.load(&query.session_id).await?;
        Ok(state.as_ref().map(RegistrationProgress::from))
    }
}
