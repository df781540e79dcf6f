//! Field vocabulary of the registration flow.
//!
//! Every collectable field has exactly one [`FieldName`] and exactly one
//! [`FieldValue`] variant carrying its natural type, and [`CollectedData`]
//! holds one typed slot per field. Adding a field means touching each
//! exhaustive match below, which is the point.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Upper bound accepted for a space's capacity.
pub const MAX_CAPACITY: u32 = 10_000;

/// Name of a field collected by the registration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    SpaceName,
    Address,
    SpaceType,
    Capacity,
    Amenities,
    OpeningHours,
    Contact,
}

impl FieldName {
    /// Wire name, also used in extraction prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::SpaceName => "space_name",
            FieldName::Address => "address",
            FieldName::SpaceType => "space_type",
            FieldName::Capacity => "capacity",
            FieldName::Amenities => "amenities",
            FieldName::OpeningHours => "opening_hours",
            FieldName::Contact => "contact",
        }
    }

    /// Human-readable label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::SpaceName => "공간 이름",
            FieldName::Address => "주소",
            FieldName::SpaceType => "공간 유형",
            FieldName::Capacity => "수용 인원",
            FieldName::Amenities => "편의시설",
            FieldName::OpeningHours => "운영 시간",
            FieldName::Contact => "연락처",
        }
    }

    /// JSON shape the extraction prompt asks the gateway to produce.
    pub fn value_format(&self) -> &'static str {
        match self {
            FieldName::SpaceName
            | FieldName::Address
            | FieldName::SpaceType
            | FieldName::Contact => "문자열",
            FieldName::Capacity => "정수 (명 단위)",
            FieldName::Amenities => "문자열 배열 (예: [\"오디오\", \"마이크\"])",
            FieldName::OpeningHours => {
                "요일(monday..sunday)별 객체. 각 요일은 {\"status\":\"closed\"} 또는 \
                 {\"status\":\"open\",\"open\":\"HH:MM\",\"close\":\"HH:MM\"}"
            }
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opening state of a single day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayHours {
    #[default]
    Closed,
    Open { open: String, close: String },
}

impl DayHours {
    /// Creates an open day, validating `HH:MM` times.
    pub fn open(open: impl Into<String>, close: impl Into<String>) -> Result<Self, ValidationError> {
        let hours = DayHours::Open {
            open: open.into(),
            close: close.into(),
        };
        hours.validate()?;
        Ok(hours)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let DayHours::Open { open, close } = self {
            for time in [open, close] {
                NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
                    ValidationError::invalid_format(
                        FieldName::OpeningHours.as_str(),
                        format!("expected HH:MM, got '{}'", time),
                    )
                })?;
            }
        }
        Ok(())
    }

    fn summary(&self) -> String {
        match self {
            DayHours::Closed => "휴무".to_string(),
            DayHours::Open { open, close } => format!("{}-{}", open, close),
        }
    }
}

/// Weekly opening hours. Days not mentioned are closed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl OpeningHours {
    /// Closed every day; the default for spaces that never stated hours.
    pub fn closed() -> Self {
        Self::default()
    }

    /// Days paired with their Korean short label, Monday first.
    pub fn days(&self) -> [(&'static str, &DayHours); 7] {
        [
            ("월", &self.monday),
            ("화", &self.tuesday),
            ("수", &self.wednesday),
            ("목", &self.thursday),
            ("금", &self.friday),
            ("토", &self.saturday),
            ("일", &self.sunday),
        ]
    }

    /// Validates every open day's times.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.days().iter().try_for_each(|(_, day)| day.validate())
    }

    /// One-line summary, e.g. `월 09:00-18:00, ..., 일 휴무`.
    pub fn summary(&self) -> String {
        self.days()
            .iter()
            .map(|(label, day)| format!("{} {}", label, day.summary()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A validated value for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    SpaceName(String),
    Address(String),
    SpaceType(String),
    Capacity(u32),
    Amenities(Vec<String>),
    OpeningHours(OpeningHours),
    Contact(String),
}

impl FieldValue {
    /// Field this value belongs to.
    pub fn field(&self) -> FieldName {
        match self {
            FieldValue::SpaceName(_) => FieldName::SpaceName,
            FieldValue::Address(_) => FieldName::Address,
            FieldValue::SpaceType(_) => FieldName::SpaceType,
            FieldValue::Capacity(_) => FieldName::Capacity,
            FieldValue::Amenities(_) => FieldName::Amenities,
            FieldValue::OpeningHours(_) => FieldName::OpeningHours,
            FieldValue::Contact(_) => FieldName::Contact,
        }
    }

    /// True when the value carries no information.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::SpaceName(s)
            | FieldValue::Address(s)
            | FieldValue::SpaceType(s)
            | FieldValue::Contact(s) => s.trim().is_empty(),
            FieldValue::Capacity(n) => *n == 0,
            FieldValue::Amenities(items) => items.is_empty(),
            FieldValue::OpeningHours(_) => false,
        }
    }

    /// Converts a loosely-typed JSON value into the typed value for `field`.
    ///
    /// Accepts the shapes text-completion models tend to produce: numbers
    /// as strings (`"20명"`), comma-separated lists instead of arrays.
    pub fn from_json(field: FieldName, value: &Value) -> Result<Self, ValidationError> {
        match field {
            FieldName::SpaceName => json_text(field, value).map(FieldValue::SpaceName),
            FieldName::Address => json_text(field, value).map(FieldValue::Address),
            FieldName::SpaceType => json_text(field, value).map(FieldValue::SpaceType),
            FieldName::Contact => json_text(field, value).map(FieldValue::Contact),
            FieldName::Capacity => json_capacity(value).map(FieldValue::Capacity),
            FieldName::Amenities => json_list(field, value).map(FieldValue::Amenities),
            FieldName::OpeningHours => {
                let hours: OpeningHours = serde_json::from_value(value.clone()).map_err(|e| {
                    ValidationError::invalid_format(field.as_str(), e.to_string())
                })?;
                hours.validate()?;
                Ok(FieldValue::OpeningHours(hours))
            }
        }
    }

    /// Text shown when confirming the collected value back to the user.
    pub fn display(&self) -> String {
        match self {
            FieldValue::SpaceName(s)
            | FieldValue::Address(s)
            | FieldValue::SpaceType(s)
            | FieldValue::Contact(s) => s.clone(),
            FieldValue::Capacity(n) => format!("{}명", n),
            FieldValue::Amenities(items) => items.join(", "),
            FieldValue::OpeningHours(hours) => hours.summary(),
        }
    }
}

fn json_text(field: FieldName, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ValidationError::invalid_format(field.as_str(), "expected text")),
    }
}

fn json_capacity(value: &Value) -> Result<u32, ValidationError> {
    let field = FieldName::Capacity.as_str();
    let raw = match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ValidationError::invalid_format(field, "expected a whole number"))?,
        Value::String(s) => match number_runs(s).as_slice() {
            [single] => single
                .parse::<u64>()
                .map_err(|_| ValidationError::invalid_format(field, "expected a whole number"))?,
            [] => return Err(ValidationError::invalid_format(field, "expected a whole number")),
            _ => return Err(ValidationError::invalid_format(field, "expected a single number")),
        },
        _ => return Err(ValidationError::invalid_format(field, "expected a whole number")),
    };

    if raw == 0 || raw > u64::from(MAX_CAPACITY) {
        return Err(ValidationError::out_of_range(
            field,
            1,
            i64::from(MAX_CAPACITY),
            i64::try_from(raw).unwrap_or(i64::MAX),
        ));
    }
    Ok(raw as u32)
}

/// Splits text into its runs of ASCII digits. A comma between two digits is a
/// thousands separator, so "1,200명" is one run.
fn number_runs(text: &str) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if c == ',' && !current.is_empty() && chars.peek().is_some_and(|n| n.is_ascii_digit())
        {
            continue;
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn json_list(field: FieldName, value: &Value) -> Result<Vec<String>, ValidationError> {
    let items: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Value::String(s) => s.split([',', '、', '/']).map(str::to_string).collect(),
        _ => return Err(ValidationError::invalid_format(field.as_str(), "expected a list")),
    };

    let mut cleaned: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !cleaned.iter().any(|c| c == item) {
            cleaned.push(item.to_string());
        }
    }
    Ok(cleaned)
}

/// Values collected so far, one typed slot per field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl CollectedData {
    /// Stores a value in its field's slot, replacing any previous value.
    pub fn apply(&mut self, value: FieldValue) {
        match value {
            FieldValue::SpaceName(v) => self.space_name = Some(v),
            FieldValue::Address(v) => self.address = Some(v),
            FieldValue::SpaceType(v) => self.space_type = Some(v),
            FieldValue::Capacity(v) => self.capacity = Some(v),
            FieldValue::Amenities(v) => self.amenities = Some(v),
            FieldValue::OpeningHours(v) => self.opening_hours = Some(v),
            FieldValue::Contact(v) => self.contact = Some(v),
        }
    }

    /// Reads the value stored for `field`, if any.
    pub fn get(&self, field: FieldName) -> Option<FieldValue> {
        match field {
            FieldName::SpaceName => self.space_name.clone().map(FieldValue::SpaceName),
            FieldName::Address => self.address.clone().map(FieldValue::Address),
            FieldName::SpaceType => self.space_type.clone().map(FieldValue::SpaceType),
            FieldName::Capacity => self.capacity.map(FieldValue::Capacity),
            FieldName::Amenities => self.amenities.clone().map(FieldValue::Amenities),
            FieldName::OpeningHours => self.opening_hours.clone().map(FieldValue::OpeningHours),
            FieldName::Contact => self.contact.clone().map(FieldValue::Contact),
        }
    }

    /// Names of the fields that hold a value, in catalogue order.
    pub fn collected_fields(&self) -> Vec<FieldName> {
        [
            FieldName::SpaceName,
            FieldName::Address,
            FieldName::SpaceType,
            FieldName::Capacity,
            FieldName::Amenities,
            FieldName::OpeningHours,
            FieldName::Contact,
        ]
        .into_iter()
        .filter(|field| self.get(*field).is_some())
        .collect()
    }
}
