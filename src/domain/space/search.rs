//! Keyword search over registered spaces.
//!
//! A message is reduced to the recognized keywords it mentions. A record is
//! kept when any of those keywords appears in the part of the record the
//! keyword describes. Messages with no recognized keyword match nothing.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SpaceId;
use crate::domain::registration::OpeningHours;

use super::record::{BookingPolicy, SensorFlags, SpaceRecord};

/// How a search result set was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchMode {
    Keyword,
    /// Storage failed; the result set is empty.
    Error,
}

/// What part of a record a keyword is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    Region,
    Amenity,
    Setting,
}

/// A recognized search term and the spellings that refer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchKeyword {
    pub term: &'static str,
    pub kind: KeywordKind,
    pub aliases: &'static [&'static str],
}

impl SearchKeyword {
    const fn new(term: &'static str, kind: KeywordKind, aliases: &'static [&'static str]) -> Self {
        Self { term, kind, aliases }
    }

    fn spellings(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.term).chain(self.aliases.iter().copied())
    }

    fn found_in(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.spellings().any(|s| text.contains(s))
    }

    fn matches(&self, record: &SpaceRecord) -> bool {
        match self.kind {
            KeywordKind::Region => self.found_in(&record.address),
            KeywordKind::Amenity => record.amenities.iter().any(|a| self.found_in(a)),
            KeywordKind::Setting => {
                self.found_in(&record.space_type)
                    || record.amenities.iter().any(|a| self.found_in(a))
            }
        }
    }
}

/// Keywords the search understands. Aliases are lowercase.
pub static SEARCH_KEYWORDS: [SearchKeyword; 15] = [
    SearchKeyword::new("서울", KeywordKind::Region, &["seoul"]),
    SearchKeyword::new("부산", KeywordKind::Region, &["busan"]),
    SearchKeyword::new("인천", KeywordKind::Region, &["incheon"]),
    SearchKeyword::new("대구", KeywordKind::Region, &["daegu"]),
    SearchKeyword::new("대전", KeywordKind::Region, &["daejeon"]),
    SearchKeyword::new("광주", KeywordKind::Region, &["gwangju"]),
    SearchKeyword::new("울산", KeywordKind::Region, &["ulsan"]),
    SearchKeyword::new("세종", KeywordKind::Region, &["sejong"]),
    SearchKeyword::new("수원", KeywordKind::Region, &["suwon"]),
    SearchKeyword::new("송도", KeywordKind::Region, &["songdo"]),
    SearchKeyword::new("오디오", KeywordKind::Amenity, &["audio", "스피커", "speaker"]),
    SearchKeyword::new("마이크", KeywordKind::Amenity, &["microphone", "mic"]),
    SearchKeyword::new("프로젝터", KeywordKind::Amenity, &["projector", "빔"]),
    SearchKeyword::new("실내", KeywordKind::Setting, &["indoor"]),
    SearchKeyword::new("야외", KeywordKind::Setting, &["outdoor", "옥외"]),
];

/// Recognized keywords mentioned in a message, in table order.
pub fn extract_keywords(message: &str) -> Vec<&'static SearchKeyword> {
    SEARCH_KEYWORDS.iter().filter(|k| k.found_in(message)).collect()
}

/// Records matching any of `keywords`. No keywords, no results.
pub fn filter_records<'a>(
    records: &'a [SpaceRecord],
    keywords: &[&'static SearchKeyword],
) -> Vec<&'a SpaceRecord> {
    if keywords.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| keywords.iter().any(|k| k.matches(record)))
        .collect()
}

/// A space as shown in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceListing {
    pub space_id: SpaceId,
    pub name: String,
    pub address: String,
    pub space_type: String,
    pub capacity: u32,
    pub amenities: Vec<String>,
    pub opening_hours: OpeningHours,
    pub contact: String,
    pub booking_policy: BookingPolicy,
    pub sensors: SensorFlags,
}

impl From<&SpaceRecord> for SpaceListing {
    fn from(record: &SpaceRecord) -> Self {
        Self {
            space_id: record.id.clone(),
            name: record.name.clone(),
            address: record.address.clone(),
            space_type: record.space_type.clone(),
            capacity: record.capacity,
            amenities: record.amenities.clone(),
            opening_hours: record.opening_hours.clone(),
            contact: record.contact.clone(),
            booking_policy: record.booking_policy,
            sensors: record.sensors,
        }
    }
}

/// Runs the keyword search and maps hits to listings.
pub fn search_records(records: &[SpaceRecord], message: &str) -> Vec<SpaceListing> {
    let keywords = extract_keywords(message);
    filter_records(records, &keywords)
        .into_iter()
        .map(SpaceListing::from)
        .collect()
}
