//! Error types for the Sosocio API client.
//!
//! This module contains the configuration error type and the unified
//! [`Error`] returned by [`SosocioClient::api`](crate::SosocioClient::api).
//!
//! # Error Handling
//!
//! Configuration constructors return `Result<T, ConfigError>` so invalid
//! input is rejected before any request is built. Request-level failures are
//! grouped in [`Error`]:
//!
//! - [`Error::Config`]: invalid configuration or tunable values
//! - [`Error::InvalidRequest`]: the endpoint or arguments cannot form a request
//! - [`Error::Transport`]: the HTTP call itself failed (always fatal)
//! - [`Error::Api`]: the API answered with a non-2xx status (outside debug mode)
//!
//! # Example
//!
//! ```rust
//! use sosocio_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::clients::{ApiError, InvalidRequestError, TransportError};

/// Errors that can occur while configuring the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Sosocio API key.")]
    EmptyApiKey,

    /// API secret cannot be empty.
    #[error("API secret cannot be empty. Please provide a valid Sosocio API secret.")]
    EmptyApiSecret,

    /// An API secret was configured without the key it is paired with.
    #[error("An API secret was provided without an API key. The secret is only sent together with its key.")]
    SecretWithoutKey,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// API URL is invalid.
    #[error("Invalid API URL '{url}'. Please provide an absolute URL with scheme (e.g., 'https://api.sosocio.com').")]
    InvalidApiUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Timeout must be a positive whole number of seconds.
    #[error("Invalid timeout of {seconds} seconds. The timeout must be a positive whole number of seconds.")]
    InvalidTimeout {
        /// The rejected value.
        seconds: u64,
    },

    /// The CA bundle could not be loaded.
    #[error("Could not load certificate bundle '{}': {reason}", path.display())]
    InvalidCertificate {
        /// Path of the bundle.
        path: PathBuf,
        /// Why loading failed.
        reason: String,
    },
}

/// Unified error type for [`SosocioClient`](crate::SosocioClient) calls.
///
/// # Example
///
/// ```rust,ignore
/// use sosocio_api::{Error, HttpMethod};
///
/// match client.api("/albums", HttpMethod::Get, serde_json::json!({})).await {
///     Ok(response) => println!("{:?}", response.body),
///     Err(Error::Api(e)) => println!("API error {}: {}", e.code, e.message),
///     Err(Error::Transport(e)) => println!("Network failure: {e}"),
///     Err(e) => println!("Request not sent: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or tunable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request could not be built.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// The HTTP call failed before a response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API returned a non-2xx response.
    #[error(transparent)]
    Api(#[from] ApiError),
}
