//! Mapping of failed responses to user-facing notifications

use reqwest::StatusCode;

/// Shown when the server rejects the credential
pub const UNAUTHORIZED_NOTICE: &str = "Unauthorized. Please log in again.";

/// Shown for any 5xx response
pub const SERVER_ERROR_NOTICE: &str = "Server error. Please try again later.";

/// Shown for 4xx responses that carry no usable message
pub const FALLBACK_NOTICE: &str = "Something went wrong.";

/// Extract the server-provided `message` field from an error body.
///
/// Returns `None` for bodies that are not JSON objects, and for messages that
/// are missing, not strings, or empty.
pub fn server_message(body: &str) -> Option<String> {
    // Error bodies look like `{"error": ..., "message": ...}`
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    match parsed.as_object()?.get("message")? {
        serde_json::Value::String(message) if !message.is_empty() => Some(message.clone()),
        _ => None,
    }
}

/// Notification text for a failed response, evaluated in order:
/// 401, then any status from 500 up, then the remaining 4xx range.
///
/// Statuses below 400 produce nothing.
pub fn status_notice(status: StatusCode, server_message: Option<&str>) -> Option<String> {
    let code = status.as_u16();
    if status == StatusCode::UNAUTHORIZED {
        // No redirect to a login page happens here; callers use
        // `ClientError::is_auth_expired` to react.
        Some(UNAUTHORIZED_NOTICE.to_string())
    } else if code >= 500 {
        Some(SERVER_ERROR_NOTICE.to_string())
    } else if code >= 400 {
        Some(
            server_message
                .filter(|message| !message.is_empty())
                .unwrap_or(FALLBACK_NOTICE)
                .to_string(),
        )
    } else {
        None
    }
}
