//! Finalized space records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SpaceId, Timestamp};
use crate::domain::registration::{CollectedData, FieldName, OpeningHours, RegistrationError};

/// Booking rules. Registration never asks for these; new spaces allow nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingPolicy {
    pub cancellation_allowed: bool,
    pub modification_allowed: bool,
    pub deposit_required: bool,
}

/// Installed sensors. Unknown until a device is paired, so all off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorFlags {
    pub noise: bool,
    pub occupancy: bool,
    pub temperature: bool,
}

/// A registered space.
///
/// Deserialization fills every absent field with its default so records
/// written by other tools still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceRecord {
    pub id: SpaceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub space_type: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub opening_hours: OpeningHours,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub booking_policy: BookingPolicy,
    #[serde(default)]
    pub sensors: SensorFlags,
    #[serde(default = "Timestamp::now")]
    pub created_at: Timestamp,
}

impl SpaceRecord {
    /// Builds the record for a completed registration.
    ///
    /// Optional fields never answered fall back to their defaults: no
    /// amenities, closed every day.
    pub fn from_collected(id: SpaceId, collected: &CollectedData) -> Result<Self, RegistrationError> {
        fn required<T: Clone>(slot: &Option<T>, field: FieldName) -> Result<T, RegistrationError> {
            slot.clone().ok_or(RegistrationError::MissingRequired(field))
        }

        Ok(Self {
            id,
            name: required(&collected.space_name, FieldName::SpaceName)?,
            address: required(&collected.address, FieldName::Address)?,
            space_type: required(&collected.space_type, FieldName::SpaceType)?,
            capacity: required(&collected.capacity, FieldName::Capacity)?,
            amenities: collected.amenities.clone().unwrap_or_default(),
            opening_hours: collected.opening_hours.clone().unwrap_or_default(),
            contact: required(&collected.contact, FieldName::Contact)?,
            booking_policy: BookingPolicy::default(),
            sensors: SensorFlags::default(),
            created_at: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registration::{DayHours, FieldValue};
    use serde_json::json;

    fn complete_data() -> CollectedData {
        let mut data = CollectedData::default();
        data.apply(FieldValue::SpaceName("스튜디오 A".to_string()));
        data.apply(FieldValue::Address("인천 연수구 송도동".to_string()));
        data.apply(FieldValue::SpaceType("실내 스튜디오".to_string()));
        data.apply(FieldValue::Capacity(20));
        data.apply(FieldValue::Contact("010-1234-5678".to_string()));
        data
    }

    #[test]
    fn from_collected_applies_defaults_for_unanswered_fields() {
        let record = SpaceRecord::from_collected(SpaceId::from_sequence(1), &complete_data()).unwrap();

        assert_eq!(record.name, "스튜디오 A");
        assert_eq!(record.capacity, 20);
        assert!(record.amenities.is_empty());
        assert_eq!(record.opening_hours, OpeningHours::closed());
        assert_eq!(record.booking_policy, BookingPolicy::default());
        assert!(!record.booking_policy.cancellation_allowed);
        assert!(!record.sensors.noise);
    }

    #[test]
    fn from_collected_keeps_optional_answers() {
        let mut data = complete_data();
        data.apply(FieldValue::Amenities(vec!["오디오".to_string()]));
        let mut hours = OpeningHours::closed();
        hours.monday = DayHours::open("09:00", "18:00").unwrap();
        data.apply(FieldValue::OpeningHours(hours.clone()));

        let record = SpaceRecord::from_collected(SpaceId::from_sequence(2), &data).unwrap();
        assert_eq!(record.amenities, vec!["오디오".to_string()]);
        assert_eq!(record.opening_hours, hours);
    }

    #[test]
    fn from_collected_requires_required_fields() {
        let mut data = complete_data();
        data.contact = None;

        assert_eq!(
            SpaceRecord::from_collected(SpaceId::from_sequence(3), &data),
            Err(RegistrationError::MissingRequired(FieldName::Contact))
        );
    }

    #[test]
    fn sparse_records_deserialize_with_defaults() {
        let record: SpaceRecord = serde_json::from_value(json!({
            "id": "space_9",
            "name": "옥상 정원",
            "address": "서울 마포구",
            "booking_policy": {"deposit_required": true}
        }))
        .unwrap();

        assert_eq!(record.capacity, 0);
        assert!(record.amenities.is_empty());
        assert!(record.booking_policy.deposit_required);
        assert!(!record.booking_policy.cancellation_allowed);
        assert_eq!(record.sensors, SensorFlags::default());
    }
}
