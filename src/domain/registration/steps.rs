//! Registration step catalogue.
//!
//! Steps are numbered from 1 and asked in order. The catalogue is fixed at
//! compile time; a session's `step` value is always an index into it, or
//! one past the end once every field has been collected.

use super::fields::FieldName;

/// One question asked during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationStep {
    /// 1-based position in the catalogue.
    pub step: u32,
    pub field: FieldName,
    /// What the user is asked to provide.
    pub description: &'static str,
    pub required: bool,
    /// Sample answer shown alongside the prompt.
    pub example: &'static str,
}

/// The ordered registration steps.
pub static REGISTRATION_STEPS: [RegistrationStep; 7] = [
    RegistrationStep {
        step: 1,
        field: FieldName::SpaceName,
        description: "공간의 이름",
        required: true,
        example: "스튜디오 A",
    },
    RegistrationStep {
        step: 2,
        field: FieldName::Address,
        description: "공간의 주소 (도로명 또는 지번)",
        required: true,
        example: "인천광역시 연수구 송도과학로 32",
    },
    RegistrationStep {
        step: 3,
        field: FieldName::SpaceType,
        description: "공간 유형 (스튜디오, 회의실, 연습실 등)과 실내/야외 여부",
        required: true,
        example: "실내 녹음 스튜디오",
    },
    RegistrationStep {
        step: 4,
        field: FieldName::Capacity,
        description: "최대 수용 인원",
        required: true,
        example: "20명",
    },
    RegistrationStep {
        step: 5,
        field: FieldName::Amenities,
        description: "제공하는 편의시설이나 장비",
        required: false,
        example: "오디오, 마이크, 프로젝터",
    },
    RegistrationStep {
        step: 6,
        field: FieldName::OpeningHours,
        description: "요일별 운영 시간",
        required: false,
        example: "평일 09:00-18:00, 주말 휴무",
    },
    RegistrationStep {
        step: 7,
        field: FieldName::Contact,
        description: "연락처 (전화번호 또는 이메일)",
        required: true,
        example: "010-1234-5678",
    },
];

/// Number of steps in the catalogue.
pub fn total_steps() -> u32 {
    REGISTRATION_STEPS.len() as u32
}

/// Looks up a step by its 1-based number.
pub fn step_for(step: u32) -> Option<&'static RegistrationStep> {
    let index = usize::try_from(step.checked_sub(1)?).ok()?;
    REGISTRATION_STEPS.get(index)
}

/// Fields that must be collected before a space can be finalized.
pub fn required_fields() -> Vec<FieldName> {
    REGISTRATION_STEPS
        .iter()
        .filter(|s| s.required)
        .map(|s| s.field)
        .collect()
}
