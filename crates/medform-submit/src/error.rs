//! Error types for form submission.

use thiserror::Error;

/// Why a submission failed.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Network(String),

    /// The exchange took longer than the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server responded {status} {reason}")]
    Status { status: u16, reason: String },

    /// The response body was not valid JSON.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type alias for submission operations.
pub type Result<T> = std::result::Result<T, SubmitError>;
