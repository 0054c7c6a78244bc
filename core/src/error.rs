//! Error types for the Watson client core.
//!
//! # Design
//! Argument and configuration errors are returned synchronously from
//! `Service::invoke` before anything is dispatched. Everything that can only
//! be known after the round-trip (transport failures, non-2xx statuses,
//! undecodable bodies) travels inside the `Completion` instead.
//!
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Http` with the raw status
//! code, the service's error message and the body for debugging.

use thiserror::Error;

/// Errors produced while building, dispatching or decoding a service call.
#[derive(Debug, Clone, Error)]
pub enum WatsonError {
    /// A required parameter was absent or empty, or an unknown parameter was
    /// supplied. Raised before any network activity.
    #[error("invalid argument `{parameter}` for {operation}: {reason}")]
    InvalidArgument {
        operation: String,
        parameter: String,
        reason: String,
    },

    /// Credentials, base URL or runtime are missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// DNS, connection, TLS or I/O failure while talking to the service.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service returned 404.
    #[error("resource not found")]
    NotFound { body: String },

    /// The service returned a non-2xx status other than 404.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("decode failed: {0}")]
    Decode(String),

    /// A request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl WatsonError {
    pub(crate) fn missing(operation: &str, parameter: &str) -> Self {
        WatsonError::InvalidArgument {
            operation: operation.to_string(),
            parameter: parameter.to_string(),
            reason: "required parameter is missing or empty".to_string(),
        }
    }

    /// HTTP status carried by the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            WatsonError::NotFound { .. } => Some(404),
            WatsonError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type WatsonResult<T> = Result<T, WatsonError>;
