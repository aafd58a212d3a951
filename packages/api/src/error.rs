//! Error types for every backend call and for local file validation.

use serde::Deserialize;
use thiserror::Error;

/// A file that failed the client-side checks. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File is empty")]
    Empty,
    #[error("Unsupported image format ({0}). Allowed: JPG, PNG, GIF, WebP")]
    UnsupportedType(String),
    #[error("File size exceeds {}MB", .max / (1024 * 1024))]
    TooLarge { size: u64, max: u64 },
}

/// Errors returned by [`crate::ApiClient`] and the session operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// A 2xx response whose body could not be decoded.
    #[error("Unexpected response from server: {0}")]
    Parse(String),

    #[error("Upload aborted")]
    Aborted,
}

impl ApiError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }

    /// True for a 401 from the backend, i.e. no valid session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Server { status: 401, .. })
    }

    /// Build a [`ApiError::Server`] from a non-2xx status and its raw body.
    ///
    /// Prefers the `error` field of a `{error, code?}` body and falls back to
    /// `HTTP <status>: <reason>` when the body is absent or malformed.
    pub fn from_response(status: u16, reason: Option<&str>, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) if !parsed.error.trim().is_empty() => ApiError::Server {
                status,
                message: parsed.error,
                code: parsed.code.filter(|c| !c.is_empty()),
            },
            _ => ApiError::Server {
                status,
                message: format!("HTTP {}: {}", status, reason.unwrap_or("Unknown Status")),
                code: None,
            },
        }
    }
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_error_body_wins() {
        let err = ApiError::from_response(
            400,
            Some("Bad Request"),
            br#"{"error":"username already exists","code":"USERNAME_EXISTS"}"#,
        );
        assert_eq!(
            err,
            ApiError::Server {
                status: 400,
                message: "username already exists".to_string(),
                code: Some("USERNAME_EXISTS".to_string()),
            }
        );
        assert_eq!(err.to_string(), "username already exists");
    }

    #[test]
    fn test_fallback_to_status_text() {
        let err = ApiError::from_response(502, Some("Bad Gateway"), b"<html>oops</html>");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");

        let err = ApiError::from_response(500, Some("Internal Server Error"), b"");
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");

        let err = ApiError::from_response(418, None, br#"{"error":""}"#);
        assert_eq!(err.to_string(), "HTTP 418: Unknown Status");
    }

    #[test]
    fn test_unauthorized_predicate() {
        let err = ApiError::from_response(401, Some("Unauthorized"), br#"{"error":"Unauthorized"}"#);
        assert!(err.is_unauthorized());
        assert!(!ApiError::Aborted.is_unauthorized());
    }

    #[test]
    fn test_validation_messages() {
        let too_large = ValidationError::TooLarge {
            size: 15 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        };
        assert_eq!(too_large.to_string(), "File size exceeds 10MB");
        let err: ApiError = ValidationError::Empty.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "File is empty");
    }
}
