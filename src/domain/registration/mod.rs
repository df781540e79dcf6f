//! Step-by-step space registration.

mod extraction;
mod fields;
mod state;
mod steps;

pub use extraction::{parse_extraction_response, FieldExtraction, MAX_RESPONSE_LENGTH};
pub use fields::{CollectedData, DayHours, FieldName, FieldValue, OpeningHours, MAX_CAPACITY};
pub use state::{RegistrationError, RegistrationOutcome, RegistrationState, StepTransition};
pub use steps::{required_fields, step_for, total_steps, RegistrationStep, REGISTRATION_STEPS};
