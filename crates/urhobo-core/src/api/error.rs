//! Error taxonomy for backend calls.
//!
//! Every failure carries a human-readable message; no structured error codes
//! leave this module.

use std::fmt;

use serde_json::Value;

/// Message shown for transport-level failures.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
/// Message shown when a 401 carries no payload message.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired";
/// Message shown when a success payload cannot be decoded.
pub const PARSE_ERROR_MESSAGE: &str = "Unexpected response from server";

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Backend answered with a non-success status
    Request,
    /// Connection, timeout or other transport failure
    Network,
    /// Backend answered 401; the session has been cleared
    Unauthorized,
    /// Success status but the body did not match the expected shape
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Request => write!(f, "request"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// One-line message suitable for display
    pub message: String,
    /// HTTP status, when the backend answered
    pub status: Option<u16>,
    /// Whether `message` came from the response payload
    from_payload: bool,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            from_payload: false,
        }
    }

    pub fn network() -> Self {
        Self::new(ApiErrorKind::Network, NETWORK_ERROR_MESSAGE)
    }

    pub fn parse() -> Self {
        Self::new(ApiErrorKind::Parse, PARSE_ERROR_MESSAGE)
    }

    /// Builds an error from a non-success response.
    ///
    /// The payload's `message` field is surfaced verbatim when present,
    /// otherwise `fallback` is used. A bare 401 always reads "Session expired".
    pub fn from_status(status: u16, body: &str, fallback: &str) -> Self {
        let kind = if status == 401 {
            ApiErrorKind::Unauthorized
        } else {
            ApiErrorKind::Request
        };
        let payload = server_message(body);
        let from_payload = payload.is_some();
        let message = payload.unwrap_or_else(|| match kind {
            ApiErrorKind::Unauthorized => SESSION_EXPIRED_MESSAGE.to_string(),
            _ => fallback.to_string(),
        });
        Self {
            kind,
            message,
            status: Some(status),
            from_payload,
        }
    }

    /// Replaces a request fallback with a caller-specific one.
    ///
    /// Payload messages and network/parse messages are kept.
    #[must_use]
    pub fn or_fallback(mut self, fallback: &str) -> Self {
        if self.kind == ApiErrorKind::Request && !self.from_payload {
            self.message = fallback.to_string();
        }
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for backend calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Extracts `message` from a JSON error payload.
///
/// Accepts both a string and an array of strings (validation pipes on the
/// backend answer with the latter).
fn server_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    match json.get("message")? {
        Value::String(msg) if !msg.trim().is_empty() => Some(msg.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_wins_over_fallback() {
        let err = ApiError::from_status(400, r#"{"message":"Email not found"}"#, "Login failed");
        assert_eq!(err.kind, ApiErrorKind::Request);
        assert_eq!(err.message, "Email not found");
        assert_eq!(err.status, Some(400));
    }

    #[test]
    fn test_fallback_used_without_payload_message() {
        let err = ApiError::from_status(500, "<html>oops</html>", "Login failed");
        assert_eq!(err.message, "Login failed");

        let err = ApiError::from_status(422, r#"{"error":"x"}"#, "Update failed");
        assert_eq!(err.message, "Update failed");
    }

    #[test]
    fn test_array_messages_are_joined() {
        let err = ApiError::from_status(
            400,
            r#"{"message":["email must be an email","password too short"]}"#,
            "Registration failed",
        );
        assert_eq!(err.message, "email must be an email, password too short");
    }

    #[test]
    fn test_unauthorized_kind() {
        let err = ApiError::from_status(401, "", "");
        assert!(err.is_unauthorized());
        assert_eq!(err.message, SESSION_EXPIRED_MESSAGE);
    }

    #[test]
    fn test_bare_unauthorized_ignores_operation_fallback() {
        let err = ApiError::from_status(401, "", "Failed to fetch details");
        assert_eq!(err.message, SESSION_EXPIRED_MESSAGE);

        let err = ApiError::from_status(401, r#"{"message":"jwt expired"}"#, "Login failed");
        assert_eq!(err.message, "jwt expired");
    }

    #[test]
    fn test_or_fallback_keeps_payload_message() {
        let generic = ApiError::from_status(500, "", "Failed to send reset email");
        assert_eq!(
            generic.or_fallback("Failed to resend code").message,
            "Failed to resend code"
        );

        let payload = ApiError::from_status(429, r#"{"message":"Slow down"}"#, "x");
        assert_eq!(payload.or_fallback("Failed to resend code").message, "Slow down");

        assert_eq!(
            ApiError::network().or_fallback("Failed to resend code").message,
            NETWORK_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_network_message() {
        assert_eq!(ApiError::network().to_string(), NETWORK_ERROR_MESSAGE);
    }
}
