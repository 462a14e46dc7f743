//! Request, transport and API error types.
//!
//! - [`InvalidRequestError`]: the request could not be built (no network activity happened)
//! - [`TransportError`]: the HTTP exchange itself failed
//! - [`ApiError`]: the API answered with a non-2xx status
//!
//! # Example
//!
//! ```rust
//! use sosocio_api::clients::InvalidRequestError;
//!
//! let error = InvalidRequestError::ConflictingParameters {
//!     parameter: "limit".to_string(),
//! };
//! assert!(error.to_string().contains("limit"));
//! ```

use thiserror::Error;

use crate::clients::classify::ErrorCode;

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// The endpoint has no path component.
    #[error("Invalid endpoint '{endpoint}': an endpoint must contain a path.")]
    InvalidEndpoint {
        /// The rejected endpoint.
        endpoint: String,
    },

    /// The same parameter was supplied in the endpoint query string and in the arguments.
    #[error("Parameter '{parameter}' is set both in the endpoint query string and in the call arguments. Supply it through one of them only.")]
    ConflictingParameters {
        /// The parameter supplied twice.
        parameter: String,
    },

    /// An entry in the `files` collection cannot be uploaded.
    #[error("Invalid file entry at index {index}: {reason}")]
    InvalidFileEntry {
        /// Zero-based position in the `files` collection.
        index: usize,
        /// What is wrong with the entry.
        reason: String,
    },
}

/// Error returned when the HTTP exchange fails (DNS, connect, timeout, upload I/O).
///
/// Transport errors are fatal in every mode, including debug mode.
#[derive(Debug, Error)]
#[error("Transport error: {message}")]
pub struct TransportError {
    /// Human readable description of the failure.
    pub message: String,
    /// Underlying cause, if any.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Creates a transport error without an underlying cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error wrapping an underlying cause.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` if the failure was a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.source
            .as_ref()
            .and_then(|source| source.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self::with_source(error.to_string(), error)
    }
}

/// Error returned when the API responds with a non-2xx status outside debug mode.
///
/// Carries the status, the classified code and message, and the raw body so
/// the failure can be diagnosed without re-issuing the call.
///
/// # Example
///
/// ```rust
/// use sosocio_api::clients::ApiError;
/// use sosocio_api::ErrorCode;
///
/// let error = ApiError {
///     status: 404,
///     code: ErrorCode::Text("not_found".to_string()),
///     message: "missing".to_string(),
///     body: r#"{"error":{"code":"not_found","message":"missing"}}"#.to_string(),
/// };
/// assert_eq!(error.to_string(), "API error 404 (not_found): missing");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("API error {status} ({code}): {message}")]
pub struct ApiError {
    /// The HTTP status code.
    pub status: u16,
    /// Error code from the body, or the status code.
    pub code: ErrorCode,
    /// Error message from the body, or the trimmed body text.
    pub message: String,
    /// The raw response body.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_parameters_names_parameter() {
        let error = InvalidRequestError::ConflictingParameters {
            parameter: "where".to_string(),
        };
        assert!(error.to_string().contains("'where'"));
    }

    #[test]
    fn test_invalid_endpoint_message() {
        let error = InvalidRequestError::InvalidEndpoint {
            endpoint: "?limit=5".to_string(),
        };
        assert!(error.to_string().contains("?limit=5"));
        assert!(error.to_string().contains("must contain a path"));
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = TransportError::with_source("cannot read upload", io);
        assert_eq!(error.to_string(), "Transport error: cannot read upload");
        assert!(std::error::Error::source(&error).is_some());
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_api_error_with_numeric_code() {
        let error = ApiError {
            status: 500,
            code: ErrorCode::Number(500),
            message: "Internal Server Error".to_string(),
            body: "Internal Server Error".to_string(),
        };
        assert_eq!(error.to_string(), "API error 500 (500): Internal Server Error");
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let _: &dyn std::error::Error = &InvalidRequestError::InvalidEndpoint {
            endpoint: String::new(),
        };
        let _: &dyn std::error::Error = &TransportError::new("down");
    }
}
