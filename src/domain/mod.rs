//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, validation errors)
//! - `intent` - Closed intent set and label normalization
//! - `conversation` - Bounded per-session turn history
//! - `registration` - Step catalogue, typed field values, registration state machine
//! - `space` - Finalized space records and keyword search
//! - `replies` - Fixed reply templates and gateway fallbacks
//!
//! Nothing in here performs I/O.

pub mod conversation;
pub mod foundation;
pub mod intent;
pub mod registration;
pub mod replies;
pub mod space;
