//! The Sosocio API client.
//!
//! This module provides [`SosocioClient`], which composes the request,
//! sends it through a [`Transport`], classifies the status and normalizes
//! the response into an [`ApiResponse`].

use serde_json::Value;

use crate::clients::classify::{classify, Classification};
use crate::clients::errors::ApiError;
use crate::clients::http_request::{encode, EncodedRequest, HttpMethod, MimeType};
use crate::clients::http_response::{normalize, ApiResponse};
use crate::clients::query::{compose, normalize_endpoint};
use crate::clients::transport::{ReqwestTransport, Transport};
use crate::config::SosocioConfig;
use crate::error::{ConfigError, Error};

/// Client for the Sosocio REST API.
///
/// Every call returns its own [`ApiResponse`], so pagination, total record
/// count and debug-mode errors never leak between calls and the client can
/// be shared across tasks.
///
/// # Debug Mode
///
/// Outside debug mode a non-2xx response is returned as [`Error::Api`]. In
/// debug mode the call succeeds and the classified failure is available via
/// [`ApiResponse::error`]. Transport failures are errors in both modes.
///
/// # Example
///
/// ```rust,ignore
/// use sosocio_api::{SosocioClient, SosocioConfig, ApiUrl, ApiKey, HttpMethod};
/// use serde_json::json;
///
/// let config = SosocioConfig::builder()
///     .api_url(ApiUrl::new("https://api.sosocio.com").unwrap())
///     .api_key(ApiKey::new("my-key").unwrap())
///     .build()
///     .unwrap();
///
/// let client = SosocioClient::new(config)?;
///
/// let albums = client
///     .api("/albums", HttpMethod::Get, &json!({"where": {"status": "published"}}))
///     .await?;
/// println!("{} albums, next page: {:?}", albums.total_records().unwrap_or("?"), albums.pagination.next);
/// ```
#[derive(Debug)]
pub struct SosocioClient<T = ReqwestTransport> {
    config: SosocioConfig,
    transport: T,
}

// Verify SosocioClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SosocioClient>();
};

impl SosocioClient<ReqwestTransport> {
    /// Creates a client that sends requests with `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the CA bundle cannot be loaded, or
    /// [`Error::Transport`] if the HTTP client cannot be initialized.
    pub fn new(config: SosocioConfig) -> Result<Self, Error> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> SosocioClient<T> {
    /// Creates a client that sends requests through the given transport.
    #[must_use]
    pub const fn with_transport(config: SosocioConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &SosocioConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Sets the mime type used for `Accept` and for decoding responses.
    pub fn set_mime_type(&mut self, mime_type: MimeType) {
        self.config.set_mime_type(mime_type);
    }

    /// Sets the overall request timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if `seconds` is zero.
    pub fn set_timeout(&mut self, seconds: u64) -> Result<(), ConfigError> {
        self.config.set_timeout(seconds)
    }

    /// Enables or disables debug mode.
    pub fn set_debug(&mut self, debug: bool) {
        self.config.set_debug(debug);
    }

    /// Returns the headers sent with every request: `Accept` and the auth headers.
    #[must_use]
    pub fn default_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![(
            "Accept".to_string(),
            self.config.mime_type().as_str().to_string(),
        )];
        headers.extend(self.config.auth().headers());
        headers
    }

    /// Builds the request for a call without sending it.
    ///
    /// For GET, `args` are conditions merged into the query string. For
    /// other methods they are the request body, optionally with `files`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the endpoint has no path, a
    /// parameter is supplied twice, or a file entry is malformed.
    pub fn build_request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        args: &Value,
    ) -> Result<EncodedRequest, Error> {
        let endpoint = if method == HttpMethod::Get {
            compose(endpoint, args)?
        } else {
            endpoint.to_string()
        };
        let endpoint = normalize_endpoint(&endpoint)?;
        let url = self.config.api_url().join(&endpoint);

        Ok(encode(
            method,
            url,
            args,
            &self.default_headers(),
            self.config.timeout(),
        )?)
    }

    /// Calls the API.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] before any network activity, see [`Self::build_request`]
    /// - [`Error::Transport`] if no response was received
    /// - [`Error::Api`] for non-2xx responses outside debug mode
    pub async fn api(
        &self,
        endpoint: &str,
        method: HttpMethod,
        args: &Value,
    ) -> Result<ApiResponse, Error> {
        let request = self.build_request(endpoint, method, args)?;
        tracing::debug!("Sending {} request to {}", request.method, request.url);

        let raw = self.transport.send(request).await?;

        let error = match classify(raw.status, &raw.body) {
            Classification::Success => None,
            Classification::Failure(record) if self.config.debug() => {
                tracing::warn!(
                    "Sosocio API call to {} failed with status {} ({}): {}",
                    endpoint,
                    raw.status,
                    record.code,
                    record.message
                );
                Some(record)
            }
            Classification::Failure(record) => {
                return Err(ApiError {
                    status: raw.status,
                    code: record.code,
                    message: record.message,
                    body: raw.body,
                }
                .into());
            }
        };

        let (body, pagination, total_records) = normalize(&raw, self.config.mime_type());

        Ok(ApiResponse {
            status: raw.status,
            body,
            pagination,
            total_records,
            error,
        })
    }

    /// Sends a GET request with the given conditions.
    ///
    /// # Errors
    ///
    /// See [`Self::api`].
    pub async fn get(&self, endpoint: &str, conditions: &Value) -> Result<ApiResponse, Error> {
        self.api(endpoint, HttpMethod::Get, conditions).await
    }

    /// Sends a POST request with the given body.
    ///
    /// # Errors
    ///
    /// See [`Self::api`].
    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<ApiResponse, Error> {
        self.api(endpoint, HttpMethod::Post, body).await
    }

    /// Sends a PUT request with the given body.
    ///
    /// # Errors
    ///
    /// See [`Self::api`].
    pub async fn put(&self, endpoint: &str, body: &Value) -> Result<ApiResponse, Error> {
        self.api(endpoint, HttpMethod::Put, body).await
    }

    /// Sends a DELETE request with the given body.
    ///
    /// # Errors
    ///
    /// See [`Self::api`].
    pub async fn delete(&self, endpoint: &str, body: &Value) -> Result<ApiResponse, Error> {
        self.api(endpoint, HttpMethod::Delete, body).await
    }
}
