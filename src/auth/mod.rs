//! Authentication modes for the Sosocio API.
//!
//! The API accepts three credential shapes, modeled by [`AuthMode`]:
//!
//! - [`AuthMode::KeyAndSecret`]: legacy paired `apiKey` / `apiSecret` headers
//! - [`AuthMode::Key`]: a single `X-Api-Key` header plus `X-Requested-With`
//! - [`AuthMode::Anonymous`]: no authentication headers
//!
//! # Example
//!
//! ```rust
//! use sosocio_api::{ApiKey, AuthMode};
//!
//! let mode = AuthMode::Key(ApiKey::new("my-key").unwrap());
//! let headers = mode.headers();
//! assert_eq!(headers[0], ("X-Api-Key".to_string(), "my-key".to_string()));
//! ```

use crate::config::{ApiKey, ApiSecret};
use crate::error::ConfigError;

/// Header carrying the key in key-only mode.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// How requests authenticate against the API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// No credentials are sent.
    #[default]
    Anonymous,
    /// Key-only authentication.
    Key(ApiKey),
    /// Legacy paired key and secret.
    KeyAndSecret(ApiKey, ApiSecret),
}

impl AuthMode {
    /// Derives the mode from optional credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SecretWithoutKey`] if only a secret is given.
    pub fn from_credentials(
        key: Option<ApiKey>,
        secret: Option<ApiSecret>,
    ) -> Result<Self, ConfigError> {
        match (key, secret) {
            (Some(key), Some(secret)) => Ok(Self::KeyAndSecret(key, secret)),
            (Some(key), None) => Ok(Self::Key(key)),
            (None, None) => Ok(Self::Anonymous),
            (None, Some(_)) => Err(ConfigError::SecretWithoutKey),
        }
    }

    /// Returns the headers this mode adds to every request.
    #[must_use]
    pub fn headers(&self) -> Vec<(String, String)> {
        match self {
            Self::Anonymous => Vec::new(),
            Self::Key(key) => vec![
                (API_KEY_HEADER.to_string(), key.as_ref().to_string()),
                ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
            ],
            Self::KeyAndSecret(key, secret) => vec![
                ("apiKey".to_string(), key.as_ref().to_string()),
                ("apiSecret".to_string(), secret.as_ref().to_string()),
            ],
        }
    }
}
