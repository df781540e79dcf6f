//! Fixed reply texts.
//!
//! Registration prompts are always built from these templates. Search and
//! generic replies use them only when the text-completion gateway fails, so
//! every function here must return non-empty text.

use crate::domain::registration::{FieldValue, RegistrationStep};
use crate::domain::space::{SpaceListing, SpaceRecord};

/// Asks for a step's value.
pub fn step_prompt(step: &RegistrationStep) -> String {
    let optional = if step.required { "" } else { " (선택 항목이라 없으면 '없음'이라고 답해 주세요)" };
    format!(
        "[{}단계] {}을(를) 알려주세요.{} 예: {}",
        step.step, step.description, optional, step.example
    )
}

pub fn registration_intro() -> String {
    "공간 등록을 도와드릴게요! 몇 가지 정보를 차례대로 여쭤보겠습니다.".to_string()
}

/// First reply of a new registration.
pub fn registration_greeting(first: &RegistrationStep) -> String {
    format!("{}\n{}", registration_intro(), step_prompt(first))
}

/// Confirms a collected value and asks for the next step.
pub fn step_advanced(
    completed: &RegistrationStep,
    collected: Option<&FieldValue>,
    next: &RegistrationStep,
) -> String {
    let confirmation = match collected {
        Some(value) => format!("{}: '{}' 확인했습니다.", completed.field.label(), value.display()),
        None => format!("{}은(는) 건너뛰었습니다.", completed.field.label()),
    };
    format!("{}\n{}", confirmation, step_prompt(next))
}

/// Re-asks a step after an unusable answer.
pub fn step_retry(step: &RegistrationStep, reason: Option<&str>) -> String {
    let reason = reason
        .map(|r| format!(" ({})", r))
        .unwrap_or_default();
    format!(
        "입력하신 내용에서 {}을(를) 확인하지 못했어요{}. 다시 알려주세요.\n{}",
        step.field.label(),
        reason,
        step_prompt(step)
    )
}

/// Announces a saved space.
pub fn registration_completed(record: &SpaceRecord) -> String {
    let amenities = if record.amenities.is_empty() {
        "없음".to_string()
    } else {
        record.amenities.join(", ")
    };
    format!(
        "공간 등록이 완료되었습니다! (ID: {})\n- 이름: {}\n- 주소: {}\n- 유형: {}\n- 수용 인원: {}명\n- 편의시설: {}\n- 운영 시간: {}\n- 연락처: {}",
        record.id,
        record.name,
        record.address,
        record.space_type,
        record.capacity,
        amenities,
        record.opening_hours.summary(),
        record.contact
    )
}

/// Apology when a registration turn could not be processed.
pub fn registration_failed() -> String {
    "죄송합니다. 요청을 처리하는 중 문제가 발생했어요. 잠시 후 같은 내용을 다시 보내 주세요.".to_string()
}

/// Reply when the stored registration is in a state no step describes.
pub fn registration_start_over() -> String {
    "죄송합니다. 등록 진행 상태를 확인할 수 없어요. 처음부터 다시 시작해 주세요.".to_string()
}

/// Search reply used when the gateway is unavailable.
pub fn search_results(listings: &[SpaceListing]) -> String {
    match listings.first() {
        None => search_no_results(),
        Some(first) if listings.len() == 1 => {
            format!("'{}'({}) 공간을 찾았습니다.", first.name, first.address)
        }
        Some(first) => format!(
            "'{}'({}) 등 {}개의 공간을 찾았습니다.",
            first.name,
            first.address,
            listings.len()
        ),
    }
}

pub fn search_no_results() -> String {
    "죄송합니다. 조건에 맞는 공간을 찾지 못했어요. 지역이나 필요한 장비(오디오, 마이크, 프로젝터 등)를 넣어 다시 검색해 보세요.".to_string()
}

pub fn search_failed() -> String {
    "죄송합니다. 공간을 검색하는 중 문제가 발생했어요. 잠시 후 다시 시도해 주세요.".to_string()
}

/// Profile reply used when the gateway is unavailable.
pub fn profile_intro() -> String {
    "프로필 생성을 도와드릴게요. 이름과 관심 있는 공간 유형을 알려주세요.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registration::{step_for, FieldValue};
    use crate::domain::space::search_records;
    use serde_json::json;

    #[test]
    fn step_prompt_mentions_description_and_example() {
        let step = step_for(1).unwrap();
        let prompt = step_prompt(step);
        assert!(prompt.contains("공간의 이름"));
        assert!(prompt.contains("스튜디오 A"));
        assert!(prompt.starts_with("[1단계]"));
    }

    #[test]
    fn optional_steps_explain_how_to_skip() {
        assert!(step_prompt(step_for(5).unwrap()).contains("없음"));
        assert!(!step_prompt(step_for(4).unwrap()).contains("없음"));
    }

    #[test]
    fn advanced_confirms_value_and_prompts_next() {
        let reply = step_advanced(
            step_for(1).unwrap(),
            Some(&FieldValue::SpaceName("스튜디오 A".to_string())),
            step_for(2).unwrap(),
        );
        assert!(reply.contains("'스튜디오 A' 확인했습니다"));
        assert!(reply.contains("공간의 주소"));
    }

    #[test]
    fn retry_includes_reason_when_present() {
        let reply = step_retry(step_for(4).unwrap(), Some("숫자가 필요합니다"));
        assert!(reply.contains("숫자가 필요합니다"));
        assert!(reply.contains("최대 수용 인원"));
    }

    #[test]
    fn search_fallback_names_first_hit() {
        let record = serde_json::from_value(json!({
            "id": "space_1",
            "name": "스튜디오 A",
            "address": "인천 연수구",
            "amenities": ["오디오"]
        }))
        .unwrap();
        let listings = search_records(&[record], "인천");

        let reply = search_results(&listings);
        assert!(reply.contains("스튜디오 A"));
    }

    #[test]
    fn fallbacks_are_never_empty() {
        assert!(!search_results(&[]).is_empty());
        assert!(!search_failed().is_empty());
        assert!(!registration_failed().is_empty());
        assert!(!registration_start_over().is_empty());
        assert!(!profile_intro().is_empty());
    }
}
