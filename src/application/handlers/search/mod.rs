//! Keyword search over stored spaces.

mod search_spaces;

pub use search_spaces::{SearchSpacesCommand, SearchSpacesHandler, SearchSpacesResult};
