//! Errors returned by the backend client.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The backend could not be reached (DNS, connection, CORS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status. `message` is the
    /// backend's own explanation, passed through untouched.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("response did not include a user")]
    MissingUser,
}

impl ApiError {
    /// Whether retrying later could succeed without user action.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
