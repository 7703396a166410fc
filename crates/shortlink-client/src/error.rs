//! Error types for the short-link admin client.

use shortlink_common::{DomainFailure, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered but the envelope code was not the success sentinel.
    /// Displays as the backend's own message.
    #[error("{message}")]
    Domain { code: String, message: String },

    /// HTTP 401. The session was expired locally before this was returned.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The HTTP response had a non-2xx status code other than 401.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// An error from the underlying HTTP client (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session fields failed the token/username consistency check.
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// Durable session storage could not be read or written.
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// The call's cancellation token fired before it settled.
    #[error("Request cancelled")]
    Cancelled,
}

impl From<DomainFailure> for ClientError {
    fn from(f: DomainFailure) -> Self {
        Self::Domain { code: f.code, message: f.message }
    }
}

impl ClientError {
    /// True for failures that ended the session (401 or a broken session record).
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::InvalidSession(_))
    }

    /// Backend error code, for domain failures only.
    pub fn domain_code(&self) -> Option<&str> {
        match self {
            Self::Domain { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
