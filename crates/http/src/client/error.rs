//! Client error types

use thiserror::Error;

/// Client error types
///
/// The `Display` text of each variant is what callers see in a response
/// envelope's `error` field.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The timeout guard fired before the server answered
    #[error("Request timed out")]
    Timeout,

    /// Connection could not be established
    #[error("Network connection failed, check your connection: {0}")]
    Network(String),

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// Refresh failed, or the retry after a refresh was rejected again
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Response parsed but lacks something the client needs
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Credential storage failed
    #[error("Token store error: {0}")]
    Store(#[from] storefront_core::Error),
}

impl ClientError {
    /// Map a transport error to its user-facing class
    pub fn classify(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Network(error.to_string())
        } else {
            Self::Request(error)
        }
    }

    /// Create error from an HTTP status code
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}
