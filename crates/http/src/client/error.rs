//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Authentication failed
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Forbidden
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Resource not found
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// Bad request
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Any other 4xx status
    #[error("Client error {status}: {message}")]
    ClientStatus { status: StatusCode, message: String },

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: StatusCode, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request descriptor could not be turned into a request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest { message },
            401 => Self::AuthenticationFailed { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound { message },
            402..=499 => Self::ClientStatus { status, message },
            _ => Self::ServerError { status, message },
        }
    }

    /// HTTP status carried by this error, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Request(err) => err.status(),
            Self::AuthenticationFailed { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden { .. } => Some(StatusCode::FORBIDDEN),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::BadRequest { .. } => Some(StatusCode::BAD_REQUEST),
            Self::ClientStatus { status, .. } | Self::ServerError { status, .. } => Some(*status),
            Self::Serialization(_) | Self::InvalidRequest(_) | Self::Configuration(_) => None,
        }
    }

    /// Message attached to a status error
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::AuthenticationFailed { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::BadRequest { message }
            | Self::ClientStatus { message, .. }
            | Self::ServerError { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the server rejected the stored credential
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Whether the request ran into the configured timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(err) if err.is_timeout())
    }
}
