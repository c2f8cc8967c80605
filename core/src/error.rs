//! Error types for the database client adapter.
//!
//! # Design
//! A missing client is not an error: `get_by_id` reports it as `Ok(None)`
//! and `delete` reports a failed removal as `Ok(false)`. Everything else a
//! collaborator reports lands here and is returned to the caller unchanged.
//! Transport failures are split into `Transport` (the request never produced
//! a response) and `HttpError` (the service answered with an unexpected
//! status), with the raw status code and body kept for debugging.

use thiserror::Error;

/// Errors returned by `DatabaseClientAdapter` operations and by the
/// `DatabaseClientApi` build/parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be executed (connection refused, DNS, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The service returned a non-2xx status where success was expected.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body was not valid JSON or not the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// True for failures of the round trip itself, as opposed to failures
    /// to encode or decode JSON.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::HttpError { .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        assert!(ApiError::Transport("refused".into()).is_transport());
        assert!(ApiError::HttpError { status: 500, body: String::new() }.is_transport());
        assert!(!ApiError::DeserializationError("eof".into()).is_transport());
        assert!(!ApiError::SerializationError("nan".into()).is_transport());
    }

    #[test]
    fn http_error_display_carries_status_and_body() {
        let err = ApiError::HttpError {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }
}
