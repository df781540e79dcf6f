//! Step-by-step space registration.

mod advance_registration;

pub use advance_registration::{
    AdvanceRegistrationCommand, AdvanceRegistrationHandler, AdvanceRegistrationResult,
};
