//! Parsing of field-extraction replies.
//!
//! The gateway is asked to answer with a JSON object of the form
//! `{"extractedValue": ..., "isValid": bool, "errorMessage": string|null}`.
//! Replies are often wrapped in prose or markdown fences, so the object is
//! located first and then parsed. Anything that cannot be parsed into a
//! typed value for the expected field is reported as invalid; parse
//! failures never advance a registration.

use serde::Deserialize;
use serde_json::Value;

use super::fields::{FieldName, FieldValue};

/// Maximum reply length considered for parsing (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Outcome of extracting one field from a user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExtraction {
    /// The typed value, absent when the user gave nothing usable.
    pub value: Option<FieldValue>,
    pub is_valid: bool,
    pub error_message: Option<String>,
}

impl FieldExtraction {
    /// A valid extraction carrying a value.
    pub fn valid(value: FieldValue) -> Self {
        Self {
            value: Some(value),
            is_valid: true,
            error_message: None,
        }
    }

    /// A valid extraction that produced no value (e.g. "없어요" for an optional field).
    pub fn empty() -> Self {
        Self {
            value: None,
            is_valid: true,
            error_message: None,
        }
    }

    /// An invalid extraction.
    pub fn invalid(message: Option<String>) -> Self {
        Self {
            value: None,
            is_valid: false,
            error_message: message,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractionPayload {
    #[serde(default)]
    extracted_value: Value,
    #[serde(default)]
    is_valid: bool,
    #[serde(default)]
    error_message: Option<String>,
}

/// Parses a gateway reply into a typed extraction for `field`.
pub fn parse_extraction_response(field: FieldName, response: &str) -> FieldExtraction {
    if response.len() > MAX_RESPONSE_LENGTH {
        return FieldExtraction::invalid(None);
    }

    let cleaned: String = response
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect();

    let Some(json) = locate_json_object(&cleaned) else {
        return FieldExtraction::invalid(None);
    };

    let payload: ExtractionPayload = match serde_json::from_str(json) {
        Ok(payload) => payload,
        Err(_) => return FieldExtraction::invalid(None),
    };

    let error_message = payload
        .error_message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    if !payload.is_valid {
        return FieldExtraction::invalid(error_message);
    }

    if payload.extracted_value.is_null() {
        return FieldExtraction::empty();
    }

    match FieldValue::from_json(field, &payload.extracted_value) {
        Ok(value) if value.is_empty() => FieldExtraction::empty(),
        Ok(value) => FieldExtraction::valid(value),
        Err(_) => FieldExtraction::invalid(error_message),
    }
}

/// Finds the first JSON object in `s`, preferring a fenced code block.
fn locate_json_object(s: &str) -> Option<&str> {
    let trimmed = s.trim();

    for fence in ["```json", "```"] {
        if let Some(start) = trimmed.find(fence) {
            let body_start = start + fence.len();
            if let Some(len) = trimmed[body_start..].find("```") {
                let body = trimmed[body_start..body_start + len].trim();
                if body.starts_with('{') {
                    return Some(body);
                }
            }
        }
    }

    let start = trimmed.find('{')?;
    balanced_object(trimmed, start)
}

/// Returns the brace-balanced object starting at byte offset `start`.
fn balanced_object(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_object() {
        let extraction = parse_extraction_response(
            FieldName::SpaceName,
            r#"{"extractedValue": "스튜디오 A", "isValid": true, "errorMessage": null}"#,
        );
        assert_eq!(
            extraction,
            FieldExtraction::valid(FieldValue::SpaceName("스튜디오 A".to_string()))
        );
    }

    #[test]
    fn parses_object_inside_korean_prose() {
        let reply = "추출 결과입니다: {\"extractedValue\": \"인천 연수구 송도동\", \"isValid\": true} 감사합니다.";
        let extraction = parse_extraction_response(FieldName::Address, reply);
        assert_eq!(
            extraction.value,
            Some(FieldValue::Address("인천 연수구 송도동".to_string()))
        );
    }

    #[test]
    fn parses_fenced_block() {
        let reply = "```json\n{\"extractedValue\": 25, \"isValid\": true}\n```";
        let extraction = parse_extraction_response(FieldName::Capacity, reply);
        assert_eq!(extraction.value, Some(FieldValue::Capacity(25)));
    }

    #[test]
    fn braces_inside_strings_do_not_end_the_object() {
        let reply = r#"{"extractedValue": "스튜디오 {B}", "isValid": true}"#;
        let extraction = parse_extraction_response(FieldName::SpaceName, reply);
        assert_eq!(
            extraction.value,
            Some(FieldValue::SpaceName("스튜디오 {B}".to_string()))
        );
    }

    #[test]
    fn invalid_flag_carries_message() {
        let reply = r#"{"extractedValue": null, "isValid": false, "errorMessage": "주소가 불완전합니다"}"#;
        let extraction = parse_extraction_response(FieldName::Address, reply);
        assert!(!extraction.is_valid);
        assert_eq!(extraction.error_message.as_deref(), Some("주소가 불완전합니다"));
    }

    #[test]
    fn unparseable_reply_is_invalid() {
        for reply in ["", "잘 모르겠어요", "{\"extractedValue\": ", "[1, 2]"] {
            let extraction = parse_extraction_response(FieldName::SpaceName, reply);
            assert!(!extraction.is_valid, "reply {:?} should be invalid", reply);
            assert_eq!(extraction.value, None);
        }
    }

    #[test]
    fn untyped_value_is_invalid() {
        let reply = r#"{"extractedValue": "스무 명 정도", "isValid": true}"#;
        let extraction = parse_extraction_response(FieldName::Capacity, reply);
        assert!(!extraction.is_valid);
    }

    #[test]
    fn null_or_blank_value_is_empty_but_valid() {
        let null_reply = r#"{"extractedValue": null, "isValid": true}"#;
        assert_eq!(
            parse_extraction_response(FieldName::Amenities, null_reply),
            FieldExtraction::empty()
        );

        let blank_reply = r#"{"extractedValue": [], "isValid": true}"#;
        assert_eq!(
            parse_extraction_response(FieldName::Amenities, blank_reply),
            FieldExtraction::empty()
        );
    }
}
