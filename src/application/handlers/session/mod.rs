//! Read-only session queries.

mod get_history;
mod get_registration_progress;

pub use get_history::{GetHistoryHandler, GetHistoryQuery};
pub use get_registration_progress::{
    GetRegistrationProgressHandler, GetRegistrationProgressQuery, RegistrationProgress,
};
