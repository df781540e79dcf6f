//! Registration state and its transitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{SessionId, SpaceId, Timestamp};

use super::extraction::FieldExtraction;
use super::fields::{CollectedData, FieldName, FieldValue};
use super::steps::{self, RegistrationStep};

/// How a registration turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// A new registration was opened.
    Started,
    /// A value was accepted and the next step was asked.
    Advanced,
    /// The answer was rejected; the same step was asked again.
    Retry,
    /// The space was saved.
    Completed,
    /// The turn could not be processed; state left as it was.
    Failed,
}

/// Errors raised by registration transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("Registration step {0} does not exist")]
    StepNotFound(u32),

    #[error("Expected a value for '{expected}', got '{actual}'")]
    FieldMismatch { expected: FieldName, actual: FieldName },

    #[error("Required field '{0}' was never collected")]
    MissingRequired(FieldName),
}

/// Result of applying one extraction to a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTransition {
    /// The value was stored and `next` is now being asked.
    Advanced {
        collected: Option<FieldValue>,
        next: &'static RegistrationStep,
    },
    /// The last step was collected; the space can be finalized.
    ReadyToFinalize { collected: Option<FieldValue> },
    /// The answer was rejected; the session stays on `step`.
    Retry {
        step: &'static RegistrationStep,
        reason: Option<String>,
    },
}

/// Progress of one session through the registration steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationState {
    pub session_id: SessionId,
    /// 1-based step currently being asked.
    pub step: u32,
    #[serde(default)]
    pub collected: CollectedData,
    #[serde(default = "steps::required_fields")]
    pub required_fields: Vec<FieldName>,
    /// Id reserved for the record once every step is collected. While set,
    /// the record is written under this id and nothing more is collected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_space_id: Option<SpaceId>,
    pub updated_at: Timestamp,
}

impl RegistrationState {
    /// Opens a registration at step 1.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            step: 1,
            collected: CollectedData::default(),
            required_fields: steps::required_fields(),
            pending_space_id: None,
            updated_at: Timestamp::now(),
        }
    }

    /// Reserves `id` for the finished record.
    pub fn begin_finalization(&mut self, id: SpaceId) -> Result<(), RegistrationError> {
        if !self.is_complete() {
            return Err(RegistrationError::StepNotFound(self.step));
        }
        self.ensure_required_collected()?;
        self.pending_space_id = Some(id);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// True once an id is reserved and only the record write remains.
    pub fn is_finalizing(&self) -> bool {
        self.pending_space_id.is_some()
    }

    /// The step currently being asked, or `None` once past the last step.
    pub fn current_step(&self) -> Option<&'static RegistrationStep> {
        steps::step_for(self.step)
    }

    pub fn is_complete(&self) -> bool {
        self.step > steps::total_steps()
    }

    /// Applies an extraction to the current step.
    ///
    /// Invalid extractions, and empty answers to required steps, leave the
    /// step number and collected data untouched. Empty answers to optional
    /// steps advance without storing anything.
    pub fn apply_extraction(
        &mut self,
        extraction: FieldExtraction,
    ) -> Result<StepTransition, RegistrationError> {
        let current = self
            .current_step()
            .ok_or(RegistrationError::StepNotFound(self.step))?;

        self.updated_at = Timestamp::now();

        if !extraction.is_valid {
            return Ok(StepTransition::Retry {
                step: current,
                reason: extraction.error_message,
            });
        }

        let collected = match extraction.value.filter(|v| !v.is_empty()) {
            Some(value) => {
                if value.field() != current.field {
                    return Err(RegistrationError::FieldMismatch {
                        expected: current.field,
                        actual: value.field(),
                    });
                }
                self.collected.apply(value.clone());
                Some(value)
            }
            None if current.required => {
                return Ok(StepTransition::Retry {
                    step: current,
                    reason: None,
                });
            }
            None => None,
        };

        self.step += 1;

        Ok(match self.current_step() {
            Some(next) => StepTransition::Advanced { collected, next },
            None => StepTransition::ReadyToFinalize { collected },
        })
    }

    /// Checks that every required field holds a value.
    pub fn ensure_required_collected(&self) -> Result<(), RegistrationError> {
        match self
            .required_fields
            .iter()
            .find(|field| self.collected.get(**field).is_none())
        {
            Some(missing) => Err(RegistrationError::MissingRequired(*missing)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registration::fields::OpeningHours;

    fn session() -> SessionId {
        SessionId::new("sess-1").unwrap()
    }

    fn answer(step: &RegistrationStep) -> FieldValue {
        match step.field {
            FieldName::SpaceName => FieldValue::SpaceName("스튜디오 A".to_string()),
            FieldName::Address => FieldValue::Address("인천 연수구".to_string()),
            FieldName::SpaceType => FieldValue::SpaceType("실내 스튜디오".to_string()),
            FieldName::Capacity => FieldValue::Capacity(20),
            FieldName::Amenities => FieldValue::Amenities(vec!["오디오".to_string()]),
            FieldName::OpeningHours => FieldValue::OpeningHours(OpeningHours::closed()),
            FieldName::Contact => FieldValue::Contact("010-1234-5678".to_string()),
        }
    }

    #[test]
    fn new_state_starts_at_step_one() {
        let state = RegistrationState::new(session());
        assert_eq!(state.step, 1);
        assert_eq!(state.current_step().map(|s| s.field), Some(FieldName::SpaceName));
        assert!(!state.is_complete());
    }

    #[test]
    fn valid_value_advances_and_is_stored() {
        let mut state = RegistrationState::new(session());
        let transition = state
            .apply_extraction(FieldExtraction::valid(FieldValue::SpaceName(
                "스튜디오 A".to_string(),
            )))
            .unwrap();

        assert_eq!(state.step, 2);
        assert_eq!(state.collected.space_name.as_deref(), Some("스튜디오 A"));
        match transition {
            StepTransition::Advanced { next, .. } => assert_eq!(next.field, FieldName::Address),
            other => panic!("unexpected transition {:?}", other),
        }
    }

    #[test]
    fn invalid_extraction_keeps_step_and_data() {
        let mut state = RegistrationState::new(session());
        let before = state.collected.clone();

        let transition = state
            .apply_extraction(FieldExtraction::invalid(Some("이름이 없습니다".to_string())))
            .unwrap();

        assert_eq!(state.step, 1);
        assert_eq!(state.collected, before);
        assert_eq!(
            transition,
            StepTransition::Retry {
                step: &steps::REGISTRATION_STEPS[0],
                reason: Some("이름이 없습니다".to_string()),
            }
        );
    }

    #[test]
    fn empty_answer_to_required_step_retries() {
        let mut state = RegistrationState::new(session());
        let transition = state.apply_extraction(FieldExtraction::empty()).unwrap();

        assert_eq!(state.step, 1);
        assert!(matches!(transition, StepTransition::Retry { reason: None, .. }));
    }

    #[test]
    fn empty_answer_to_optional_step_advances() {
        let mut state = RegistrationState::new(session());
        state.step = 5;

        let transition = state.apply_extraction(FieldExtraction::empty()).unwrap();

        assert_eq!(state.step, 6);
        assert_eq!(state.collected.amenities, None);
        assert!(matches!(
            transition,
            StepTransition::Advanced { collected: None, .. }
        ));
    }

    #[test]
    fn wrong_field_is_rejected() {
        let mut state = RegistrationState::new(session());
        let result = state.apply_extraction(FieldExtraction::valid(FieldValue::Capacity(3)));

        assert_eq!(
            result,
            Err(RegistrationError::FieldMismatch {
                expected: FieldName::SpaceName,
                actual: FieldName::Capacity,
            })
        );
        assert_eq!(state.step, 1);
    }

    #[test]
    fn last_step_is_ready_to_finalize() {
        let mut state = RegistrationState::new(session());
        for step in steps::REGISTRATION_STEPS.iter() {
            let transition = state
                .apply_extraction(FieldExtraction::valid(answer(step)))
                .unwrap();
            if step.step == steps::total_steps() {
                assert!(matches!(transition, StepTransition::ReadyToFinalize { .. }));
            }
        }

        assert!(state.is_complete());
        assert_eq!(state.ensure_required_collected(), Ok(()));
    }

    #[test]
    fn finalization_reserves_id_only_when_complete() {
        let mut state = RegistrationState::new(session());
        assert_eq!(
            state.begin_finalization(SpaceId::from_sequence(1)),
            Err(RegistrationError::StepNotFound(1))
        );
        assert!(!state.is_finalizing());

        for step in steps::REGISTRATION_STEPS.iter() {
            state
                .apply_extraction(FieldExtraction::valid(answer(step)))
                .unwrap();
        }
        state.begin_finalization(SpaceId::from_sequence(3)).unwrap();

        assert!(state.is_finalizing());
        let json = serde_json::to_string(&state).unwrap();
        let restored: RegistrationState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.pending_space_id, Some(SpaceId::from_sequence(3)));
    }

    #[test]
    fn applying_past_the_end_fails() {
        let mut state = RegistrationState::new(session());
        state.step = steps::total_steps() + 1;

        assert_eq!(
            state.apply_extraction(FieldExtraction::empty()),
            Err(RegistrationError::StepNotFound(8))
        );
    }

    #[test]
    fn missing_required_field_is_reported() {
        let mut state = RegistrationState::new(session());
        state.collected.space_name = Some("스튜디오 A".to_string());

        assert_eq!(
            state.ensure_required_collected(),
            Err(RegistrationError::MissingRequired(FieldName::Address))
        );
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = RegistrationState::new(session());
        state.collected.capacity = Some(12);
        state.step = 5;

        let json = serde_json::to_string(&state).unwrap();
        let restored: RegistrationState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
