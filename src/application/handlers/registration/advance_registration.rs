//! AdvanceRegistrationHandler - drives one turn of the registration flow.
//!
//! A turn either opens a registration, collects the current step's field,
//! re-asks it, or finalizes the space. Any store or gateway failure ends the
//! turn with an apology and leaves the stored state as it was.

use std::sync::Arc;

use crate::application::services::{CallContext, FieldExtractor, ReplyKind, ResponseSynthesizer};
use crate::domain::conversation::{Turn, TurnMetadata};
use crate::domain::foundation::SpaceId;
use crate::domain::registration::{
    total_steps, FieldName, RegistrationOutcome, RegistrationState, StepTransition,
};
use crate::domain::replies;
use crate::domain::space::SpaceRecord;
use crate::ports::{RegistrationStore, SpaceRepository};

/// Command carrying the user's answer.
#[derive(Debug, Clone)]
pub struct AdvanceRegistrationCommand {
    pub message: String,
}

/// Result of one registration turn.
#[derive(Debug, Clone)]
pub struct AdvanceRegistrationResult {
    pub reply: String,
    pub outcome: RegistrationOutcome,
    /// Step the session is on after this turn; `None` when the state could not be read.
    pub step: Option<u32>,
    pub total_steps: u32,
    pub collected_fields: Vec<FieldName>,
    /// The saved record, present only on completion.
    pub space: Option<SpaceRecord>,
}

impl AdvanceRegistrationResult {
    fn from_state(reply: String, outcome: RegistrationOutcome, state: &RegistrationState) -> Self {
        Self {
            reply,
            outcome,
            step: Some(state.step),
            total_steps: total_steps(),
            collected_fields: state.collected.collected_fields(),
            space: None,
        }
    }

    fn failed(reply: String, state: Option<&RegistrationState>) -> Self {
        Self {
            reply,
            outcome: RegistrationOutcome::Failed,
            step: state.map(|s| s.step),
            total_steps: total_steps(),
            collected_fields: state
                .map(|s| s.collected.collected_fields())
                .unwrap_or_default(),
            space: None,
        }
    }

    pub fn space_id(&self) -> Option<&SpaceId> {
        self.space.as_ref().map(|s| &s.id)
    }

    /// Metadata recorded on the assistant turn, when the step is known.
    pub fn metadata(&self) -> Option<TurnMetadata> {
        self.step.map(|step| TurnMetadata::Registration {
            step,
            outcome: self.outcome,
            space_id: self.space_id().cloned(),
        })
    }
}

/// Handler for messages routed to the registration flow.
pub struct AdvanceRegistrationHandler {
    registrations: Arc<dyn RegistrationStore>,
    spaces: Arc<dyn SpaceRepository>,
    extractor: FieldExtractor,
    synthesizer: Arc<ResponseSynthesizer>,
}

impl AdvanceRegistrationHandler {
    pub fn new(
        registrations: Arc<dyn RegistrationStore>,
        spaces: Arc<dyn SpaceRepository>,
        extractor: FieldExtractor,
        synthesizer: Arc<ResponseSynthesizer>,
    ) -> Self {
        Self {
            registrations,
            spaces,
            extractor,
            synthesizer,
        }
    }

    pub async fn handle(
        &self,
        cmd: AdvanceRegistrationCommand,
        context: &[Turn],
        call: &CallContext,
    ) -> AdvanceRegistrationResult {
        // 1. Load existing state, or open a new registration
        let mut state = match self.registrations.load(&call.session_id).await {
            Ok(Some(state)) => state,
            Ok(None) => return self.start(&cmd, context, call).await,
            Err(err) => {
                tracing::warn!(session_id = %call.session_id, error = %err, "registration state load failed");
                return AdvanceRegistrationResult::failed(replies::registration_failed(), None);
            }
        };

        // 2. A reserved id means only the record write is left
        if let Some(id) = state.pending_space_id.clone() {
            tracing::info!(session_id = %call.session_id, space_id = %id, "resuming registration finalization");
            return self.commit(state, id, call).await;
        }

        // 3. Resolve the step being asked
        let Some(current) = state.current_step() else {
            tracing::warn!(
                session_id = %call.session_id,
                step = state.step,
                "registration state points past the last step"
            );
            return AdvanceRegistrationResult::failed(replies::registration_start_over(), Some(&state));
        };

        // 4. Extract the field from the answer
        let extraction = match self.extractor.extract(&cmd.message, current, context, call).await {
            Ok(extraction) => extraction,
            Err(err) => {
                tracing::warn!(
                    session_id = %call.session_id,
                    step = current.step,
                    error = %err,
                    "field extraction failed"
                );
                return AdvanceRegistrationResult::failed(replies::registration_failed(), Some(&state));
            }
        };

        let before = state.clone();

        // 5. Apply the transition
        let transition = match state.apply_extraction(extraction) {
            Ok(transition) => transition,
            Err(err) => {
                tracing::warn!(session_id = %call.session_id, error = %err, "registration transition rejected");
                return AdvanceRegistrationResult::failed(replies::registration_failed(), Some(&before));
            }
        };

        match transition {
            StepTransition::Retry { step, reason } => {
                if let Err(err) = self.registrations.save(&state).await {
                    tracing::warn!(session_id = %call.session_id, error = %err, "registration state save failed");
                    return AdvanceRegistrationResult::failed(replies::registration_failed(), Some(&before));
                }
                tracing::info!(session_id = %call.session_id, step = step.step, "registration step retried");
                AdvanceRegistrationResult::from_state(
                    replies::step_retry(step, reason.as_deref()),
                    RegistrationOutcome::Retry,
                    &state,
                )
            }
            StepTransition::Advanced { collected, next } => {
                if let Err(err) = self.registrations.save(&state).await {
                    tracing::warn!(session_id = %call.session_id, error = %err, "registration state save failed");
                    return AdvanceRegistrationResult::failed(replies::registration_failed(), Some(&before));
                }
                tracing::info!(
                    session_id = %call.session_id,
                    field = %current.field,
                    next_step = next.step,
                    "registration step advanced"
                );
                AdvanceRegistrationResult::from_state(
                    replies::step_advanced(current, collected.as_ref(), next),
                    RegistrationOutcome::Advanced,
                    &state,
                )
            }
            StepTransition::ReadyToFinalize { .. } => self.finalize(state, &before, call).await,
        }
    }

    async fn start(
        &self,
        cmd: &AdvanceRegistrationCommand,
        context: &[Turn],
        call: &CallContext,
    ) -> AdvanceRegistrationResult {
        let state = RegistrationState::new(call.session_id.clone());
        let Some(first_step) = state.current_step() else {
            return AdvanceRegistrationResult::failed(replies::registration_start_over(), None);
        };

        if let Err(err) = self.registrations.save(&state).await {
            tracing::warn!(session_id = %call.session_id, error = %err, "registration state save failed");
            return AdvanceRegistrationResult::failed(replies::registration_failed(), None);
        }
        tracing::info!(session_id = %call.session_id, "registration started");

        let reply = self
            .synthesizer
            .synthesize(
                ReplyKind::RegistrationGreeting {
                    message: &cmd.message,
                    first_step,
                },
                context,
                call,
            )
            .await;

        AdvanceRegistrationResult::from_state(reply, RegistrationOutcome::Started, &state)
    }

    async fn finalize(
        &self,
        mut state: RegistrationState,
        before: &RegistrationState,
        call: &CallContext,
    ) -> AdvanceRegistrationResult {
        if let Err(err) = state.ensure_required_collected() {
            tracing::warn!(session_id = %call.session_id, error = %err, "registration incomplete at finalization");
            return AdvanceRegistrationResult::failed(replies::registration_start_over(), Some(before));
        }

        // The id is stored with the state before the record is written, so a
        // repeated turn reuses it instead of creating a second space.
        let id = self.spaces.next_id().await;
        if let Err(err) = state.begin_finalization(id.clone()) {
            tracing::warn!(session_id = %call.session_id, error = %err, "registration finalization rejected");
            return AdvanceRegistrationResult::failed(replies::registration_start_over(), Some(before));
        }
        if let Err(err) = self.registrations.save(&state).await {
            tracing::warn!(session_id = %call.session_id, error = %err, "registration state save failed");
            return AdvanceRegistrationResult::failed(replies::registration_failed(), Some(before));
        }

        self.commit(state, id, call).await
    }

    /// Writes the record under the reserved id, then clears the state.
    /// Repeating it overwrites the same record.
    async fn commit(
        &self,
        state: RegistrationState,
        id: SpaceId,
        call: &CallContext,
    ) -> AdvanceRegistrationResult {
        let record = match SpaceRecord::from_collected(id, &state.collected) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(session_id = %call.session_id, error = %err, "space record could not be built");
                return AdvanceRegistrationResult::failed(replies::registration_failed(), Some(&state));
            }
        };

        if let Err(err) = self.spaces.save(&record).await {
            tracing::warn!(session_id = %call.session_id, error = %err, "space record save failed");
            return AdvanceRegistrationResult::failed(replies::registration_failed(), Some(&state));
        }

        if let Err(err) = self.registrations.delete(&call.session_id).await {
            tracing::warn!(
                session_id = %call.session_id,
                space_id = %record.id,
                error = %err,
                "registration state cleanup failed"
            );
        }

        tracing::info!(session_id = %call.session_id, space_id = %record.id, "registration completed");

        let mut result = AdvanceRegistrationResult::from_state(
            replies::registration_completed(&record),
            RegistrationOutcome::Completed,
            &state,
        );
        result.space = Some(record);
        result
    }
}
