//! Error types for the backend connector.

use serde::{Deserialize, Serialize};

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Failures a single backend call can end in.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level failure (connection refused, reset, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Backend error (status {status}): {message}")]
    Status {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// The call exceeded its deadline.
    #[error("Request timed out")]
    Timeout,

    /// The service answered 2xx but the body was not the expected JSON.
    #[error("Malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// HTTP status of the failed call, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create a status error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(body) {
            Self::Status {
                status,
                message: error_response.error,
                details: error_response.details,
            }
        } else {
            Self::Status {
                status,
                message: body.to_string(),
                details: None,
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Error body returned by the collaborator services.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "detail")]
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_json_body() {
        let err = BackendError::from_response(403, r#"{"error":"premium required"}"#);
        match err {
            BackendError::Status { status, message, .. } => {
                assert_eq!(status, 403);
                assert_eq!(message, "premium required");
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_response_detail_alias() {
        let err = BackendError::from_response(404, r#"{"detail":"Chapter not found"}"#);
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Chapter not found"));
    }

    #[test]
    fn test_from_response_plain_body() {
        let err = BackendError::from_response(502, "bad gateway");
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_timeout_has_no_status() {
        assert_eq!(BackendError::Timeout.status(), None);
    }
}
