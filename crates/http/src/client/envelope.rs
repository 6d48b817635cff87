//! Response envelope handed back to every caller

use super::error::ClientError;
use serde::{Deserialize, Serialize};

/// Outcome of a request chain.
///
/// At most one of `data` and `error` is populated. `status` is the HTTP
/// status of the last response, or `0` when no response arrived at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: u16,
}

impl<T> ResponseEnvelope<T> {
    /// Status reported for transport-level failures
    pub const TRANSPORT_STATUS: u16 = 0;

    /// A response arrived; `data` is `None` when the body was empty or not JSON
    pub const fn success(status: u16, data: Option<T>) -> Self {
        Self {
            data,
            error: None,
            status,
        }
    }

    /// A response arrived but is reported as an error
    pub fn failure(status: u16, error: &ClientError) -> Self {
        Self {
            data: None,
            error: Some(error.to_string()),
            status,
        }
    }

    /// No response arrived
    pub fn transport(error: &ClientError) -> Self {
        Self::failure(Self::TRANSPORT_STATUS, error)
    }

    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_session_expired(&self) -> bool {
        self.error
            .as_deref()
            .is_some_and(|error| error == ClientError::SessionExpired.to_string())
    }
}
