use reqwest::StatusCode;
use thiserror::Error;

/// Common errors that can occur in admin API HTTP requests
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// HTTP request could not complete (connection, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-success status
    #[error("HTTP {}: {}", .status.as_u16(), describe_api_error(.status, .message))]
    Api {
        status: StatusCode,
        /// Human-readable message from the error body, if the body carried one
        message: Option<String>,
    },

    /// Success status, but the body was not what the caller expected
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl CommonRequestError {
    /// HTTP status of an `Api` error.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Server message if present, canonical status text otherwise.
fn describe_api_error(status: &StatusCode, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => status.canonical_reason().unwrap_or("unknown status").to_string(),
    }
}

/// Parse error response from HTTP status and body
pub fn parse_error_response(status: StatusCode, body: &bytes::Bytes) -> CommonRequestError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| extract_error_message(&json));

    CommonRequestError::Api { status, message }
}

/// Extract error message from the JSON error shapes admin APIs use
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    // Flat format: {"message": "..."}
    if let Some(msg) = json.get("message").and_then(serde_json::Value::as_str) {
        return Some(msg.to_string());
    }

    // Nested format: {"error": {"message": "..."}}
    json.get("error")
        .and_then(|error| error.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_message_is_extracted() {
        let body = bytes::Bytes::from_static(br#"{"message":"Invalid page size"}"#);
        match parse_error_response(StatusCode::BAD_REQUEST, &body) {
            CommonRequestError::Api { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message.as_deref(), Some("Invalid page size"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nested_message_is_extracted() {
        let body = bytes::Bytes::from_static(br#"{"error":{"code":500,"message":"db down"}}"#);
        let err = parse_error_response(StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert!(matches!(err, CommonRequestError::Api { message: Some(ref m), .. } if m == "db down"));
    }

    #[test]
    fn non_json_body_has_no_message() {
        let body = bytes::Bytes::from_static(b"<html>Bad Gateway</html>");
        let err = parse_error_response(StatusCode::BAD_GATEWAY, &body);
        assert!(matches!(err, CommonRequestError::Api { message: None, .. }));
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn non_string_message_is_ignored() {
        let body = bytes::Bytes::from_static(br#"{"message":42}"#);
        let err = parse_error_response(StatusCode::BAD_REQUEST, &body);
        assert!(matches!(err, CommonRequestError::Api { message: None, .. }));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }
}
