//! Error mapping shared by the HTTP-backed providers.

use crate::ports::AIError;

/// Maps a reqwest send failure to an [`AIError`].
pub(super) fn send_error(err: reqwest::Error, timeout_secs: u64) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: u32::try_from(timeout_secs).unwrap_or(u32::MAX),
        }
    } else if err.is_connect() {
        AIError::network(format!("Connection failed: {}", err))
    } else {
        AIError::network(err.to_string())
    }
}

/// Maps a non-success HTTP status and its body to an [`AIError`].
pub(super) fn error_for_status(status: u16, body: &str, default_retry_after: u32) -> AIError {
    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(body).unwrap_or(default_retry_after)),
        400 if body.contains("content_filter") || body.contains("content_policy") => {
            AIError::content_filtered(body)
        }
        400 | 404 | 422 => AIError::InvalidRequest(body.to_string()),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Reads "try again in Ns" out of a provider error body.
fn parse_retry_after(body: &str) -> Option<u32> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = parsed.get("error")?.get("message")?.as_str()?;
    let marker = "try again in ";
    let rest = &message[message.find(marker)? + marker.len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication_failed() {
        assert!(matches!(
            error_for_status(401, "", 30),
            AIError::AuthenticationFailed
        ));
    }

    #[test]
    fn rate_limit_reads_retry_after_from_message() {
        let body = r#"{"error":{"message":"Rate limit exceeded. Please try again in 12 seconds."}}"#;
        assert!(matches!(
            error_for_status(429, body, 30),
            AIError::RateLimited { retry_after_secs: 12 }
        ));
    }

    #[test]
    fn rate_limit_falls_back_to_default() {
        let body = r#"{"error":{"message":"Slow down"}}"#;
        assert!(matches!(
            error_for_status(429, body, 60),
            AIError::RateLimited { retry_after_secs: 60 }
        ));
    }

    #[test]
    fn server_errors_are_unavailable() {
        assert!(matches!(
            error_for_status(503, "overloaded", 30),
            AIError::Unavailable { .. }
        ));
    }

    #[test]
    fn bad_request_is_invalid_request() {
        assert!(matches!(
            error_for_status(400, "bad field", 30),
            AIError::InvalidRequest(_)
        ));
    }
}
