//! Registered spaces and keyword search over them.

mod record;
mod search;

pub use record::{BookingPolicy, SensorFlags, SpaceRecord};
pub use search::{
    extract_keywords, filter_records, search_records, KeywordKind, SearchKeyword, SearchMode,
    SpaceListing, SEARCH_KEYWORDS,
};
