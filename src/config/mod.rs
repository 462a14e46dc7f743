//! Configuration types for the Sosocio API client.
//!
//! # Overview
//!
//! - [`SosocioConfig`]: The configuration struct holding all client settings
//! - [`SosocioConfigBuilder`]: A builder for constructing [`SosocioConfig`] instances
//! - [`ApiUrl`]: A validated base server URL
//! - [`ApiKey`]: A validated API key newtype
//! - [`ApiSecret`]: A validated API secret newtype with masked debug output
//!
//! # Example
//!
//! ```rust
//! use sosocio_api::{SosocioConfig, ApiUrl, ApiKey};
//!
//! let config = SosocioConfig::builder()
//!     .api_url(ApiUrl::new("https://api.sosocio.com").unwrap())
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{ApiKey, ApiSecret, ApiUrl};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::AuthMode;
use crate::clients::MimeType;
use crate::error::ConfigError;

/// Overall request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection establishment timeout.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the Sosocio API client.
///
/// # Example
///
/// ```rust
/// use sosocio_api::{SosocioConfig, ApiUrl, ApiKey, ApiSecret, AuthMode};
///
/// let config = SosocioConfig::builder()
///     .api_url(ApiUrl::new("https://api.sosocio.com").unwrap())
///     .api_key(ApiKey::new("key").unwrap())
///     .api_secret(ApiSecret::new("secret").unwrap())
///     .debug(true)
///     .build()
///     .unwrap();
///
/// assert!(config.debug());
/// assert!(matches!(config.auth(), AuthMode::KeyAndSecret(..)));
/// ```
#[derive(Clone, Debug)]
pub struct SosocioConfig {
    api_url: ApiUrl,
    auth: AuthMode,
    bundle_certificate: Option<PathBuf>,
    debug: bool,
    mime_type: MimeType,
    timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl SosocioConfig {
    /// Creates a new builder for constructing a `SosocioConfig`.
    #[must_use]
    pub fn builder() -> SosocioConfigBuilder {
        SosocioConfigBuilder::new()
    }

    /// Returns the base API URL.
    #[must_use]
    pub const fn api_url(&self) -> &ApiUrl {
        &self.api_url
    }

    /// Returns the authentication mode derived from the credentials.
    #[must_use]
    pub const fn auth(&self) -> &AuthMode {
        &self.auth
    }

    /// Returns the custom CA bundle path, if configured.
    ///
    /// When `None`, the root certificates bundled with the TLS stack are used.
    #[must_use]
    pub fn bundle_certificate(&self) -> Option<&Path> {
        self.bundle_certificate.as_deref()
    }

    /// Returns whether debug mode is active.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the negotiated response mime type.
    #[must_use]
    pub const fn mime_type(&self) -> &MimeType {
        &self.mime_type
    }

    /// Returns the overall request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    pub(crate) fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub(crate) fn set_mime_type(&mut self, mime_type: MimeType) {
        self.mime_type = mime_type;
    }

    pub(crate) fn set_timeout(&mut self, seconds: u64) -> Result<(), ConfigError> {
        self.timeout = validate_timeout(seconds)?;
        Ok(())
    }
}

// Verify SosocioConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SosocioConfig>();
};

fn validate_timeout(seconds: u64) -> Result<Duration, ConfigError> {
    if seconds == 0 {
        return Err(ConfigError::InvalidTimeout { seconds });
    }
    Ok(Duration::from_secs(seconds))
}

/// Builder for constructing [`SosocioConfig`] instances.
///
/// `api_url` is the only required field.
///
/// # Defaults
///
/// - credentials: none (anonymous)
/// - `bundle_certificate`: `None` (bundled roots)
/// - `debug`: `false`
/// - `mime_type`: [`MimeType::Json`]
/// - `timeout_secs`: 60
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct SosocioConfigBuilder {
    api_url: Option<ApiUrl>,
    api_key: Option<ApiKey>,
    api_secret: Option<ApiSecret>,
    bundle_certificate: Option<PathBuf>,
    debug: Option<bool>,
    mime_type: Option<MimeType>,
    timeout_secs: Option<u64>,
    user_agent_prefix: Option<String>,
}

impl SosocioConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base API URL (required).
    #[must_use]
    pub fn api_url(mut self, url: ApiUrl) -> Self {
        self.api_url = Some(url);
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the legacy API secret. Requires an API key.
    #[must_use]
    pub fn api_secret(mut self, secret: ApiSecret) -> Self {
        self.api_secret = Some(secret);
        self
    }

    /// Sets a PEM CA bundle used to verify the server certificate.
    #[must_use]
    pub fn bundle_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.bundle_certificate = Some(path.into());
        self
    }

    /// Enables or disables debug mode.
    ///
    /// In debug mode non-2xx responses are returned as an
    /// [`ErrorRecord`](crate::ErrorRecord) on the response instead of an error.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Sets the mime type requested via `Accept` and used to decode bodies.
    #[must_use]
    pub fn mime_type(mut self, mime_type: MimeType) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    /// Sets the overall request timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout_secs = Some(seconds);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`SosocioConfig`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRequiredField`] if `api_url` is not set
    /// - [`ConfigError::SecretWithoutKey`] if a secret is set without a key
    /// - [`ConfigError::InvalidTimeout`] if the timeout is zero
    pub fn build(self) -> Result<SosocioConfig, ConfigError> {
        let api_url = self
            .api_url
            .ok_or(ConfigError::MissingRequiredField { field: "api_url" })?;
        let auth = AuthMode::from_credentials(self.api_key, self.api_secret)?;
        let timeout = validate_timeout(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))?;

        Ok(SosocioConfig {
            api_url,
            auth,
            bundle_certificate: self.bundle_certificate,
            debug: self.debug.unwrap_or(false),
            mime_type: self.mime_type.unwrap_or_default(),
            timeout,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_url() -> ApiUrl {
        ApiUrl::new("https://api.sosocio.com").unwrap()
    }

    #[test]
    fn test_builder_requires_api_url() {
        let result = SosocioConfigBuilder::new()
            .api_key(ApiKey::new("key").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_url" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = SosocioConfig::builder().api_url(api_url()).build().unwrap();

        assert_eq!(config.auth(), &AuthMode::Anonymous);
        assert!(!config.debug());
        assert_eq!(config.mime_type(), &MimeType::Json);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.bundle_certificate().is_none());
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = SosocioConfig::builder()
            .api_url(api_url())
            .timeout_secs(0)
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidTimeout { seconds: 0 })
        ));
    }

    #[test]
    fn test_builder_rejects_secret_without_key() {
        let result = SosocioConfig::builder()
            .api_url(api_url())
            .api_secret(ApiSecret::new("secret").unwrap())
            .build();

        assert!(matches!(result, Err(ConfigError::SecretWithoutKey)));
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = SosocioConfig::builder()
            .api_url(api_url())
            .api_key(ApiKey::new("key").unwrap())
            .bundle_certificate("/etc/ssl/sosocio.pem")
            .debug(true)
            .mime_type(MimeType::Csv)
            .timeout_secs(15)
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        assert!(matches!(config.auth(), AuthMode::Key(_)));
        assert_eq!(
            config.bundle_certificate(),
            Some(Path::new("/etc/ssl/sosocio.pem"))
        );
        assert!(config.debug());
        assert_eq!(config.mime_type(), &MimeType::Csv);
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_set_timeout_validates() {
        let mut config = SosocioConfig::builder().api_url(api_url()).build().unwrap();
        assert!(config.set_timeout(0).is_err());
        assert_eq!(config.timeout(), Duration::from_secs(60));
        config.set_timeout(5).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SosocioConfig>();
    }
}
