//! Error types for searchjobs
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while executing a search job
#[derive(Debug, Error)]
pub enum SearchJobsError {
    /// The caller's cancellation signal fired before or during polling
    #[error("search job execution cancelled")]
    Cancelled,

    /// Network/backend failure during start/status/poll/cancel
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Backend answered 2xx but the payload was not what we expected
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchJobsError {
    /// True for cancellations, which callers typically swallow silently
    /// while still logging transport failures.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchJobsError::Cancelled)
    }
}

/// Result type alias for searchjobs operations
pub type Result<T> = std::result::Result<T, SearchJobsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let err = SearchJobsError::Cancelled;
        assert_eq!(err.to_string(), "search job execution cancelled");
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_api_error_display() {
        let err = SearchJobsError::Api {
            status: 404,
            message: "no such job".to_string(),
        };
        assert_eq!(err.to_string(), "API error 404: no such job");
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_invalid_response_display() {
        let err = SearchJobsError::InvalidResponse("missing id field".to_string());
        assert_eq!(err.to_string(), "invalid response: missing id field");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: SearchJobsError = json_err.into();
        assert!(matches!(err, SearchJobsError::Json(_)));
        assert!(!err.is_cancelled());
    }
}
