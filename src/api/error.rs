//! API error types and classification

use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by the REST wrappers
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// The backend could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no message"))]
    Http {
        status: u16,
        message: Option<String>,
        errors: Vec<String>,
    },

    /// 2xx response carrying `success: false`
    #[error("Request rejected: {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        message: Option<String>,
        errors: Vec<String>,
    },

    /// The body was not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// `success: true` without the expected `data`
    #[error("Response carried no data")]
    MissingData,

    /// Request could not be built or sent
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The session token could not be persisted
    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),
}

/// Category an [`ApiError`] falls into at the point of display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400/422 or `success: false`
    Validation,
    /// 401: the session is gone
    Auth,
    /// 409
    Conflict,
    /// 429
    RateLimited,
    /// 5xx
    Server,
    /// Connection failure or timeout
    Network,
    Unexpected,
}

impl ApiError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Timeout | ApiError::Network(_) => ErrorKind::Network,
            ApiError::Http { status, .. } => match *status {
                400 | 422 => ErrorKind::Validation,
                401 => ErrorKind::Auth,
                409 => ErrorKind::Conflict,
                429 => ErrorKind::RateLimited,
                500..=599 => ErrorKind::Server,
                _ => ErrorKind::Unexpected,
            },
            ApiError::Rejected { .. } => ErrorKind::Validation,
            ApiError::Request(e) if e.is_timeout() || e.is_connect() => ErrorKind::Network,
            ApiError::Decode(_)
            | ApiError::MissingData
            | ApiError::Request(_)
            | ApiError::Store(_) => ErrorKind::Unexpected,
        }
    }

    /// HTTP status, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided message, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } | ApiError::Rejected { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }

    /// Server-provided validation messages
    pub fn server_errors(&self) -> &[String] {
        match self {
            ApiError::Http { errors, .. } | ApiError::Rejected { errors, .. } => errors.as_slice(),
            _ => &[],
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Network(err.to_string())
        } else {
            ApiError::Request(err)
        }
    }
}

/// Result type alias for API calls
pub type ApiResult<T> = Result<T, ApiError>;
