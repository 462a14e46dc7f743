//! HTTP transport for encoded requests.
//!
//! [`Transport`] is the seam between request building and the network. The
//! default [`ReqwestTransport`] sends requests with `reqwest`; tests and
//! embedders can provide their own implementation.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Version};

use crate::clients::errors::TransportError;
use crate::clients::http_request::{sniff_mime, EncodedRequest, MultipartField, RequestBody};
use crate::clients::http_response::RawResponse;
use crate::config::{SosocioConfig, CONNECT_TIMEOUT_SECS};
use crate::error::{ConfigError, Error};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Executes one encoded request and returns the raw response.
///
/// Implementations must produce exactly one [`RawResponse`] per request, or a
/// [`TransportError`] when no response was received.
pub trait Transport: Send + Sync {
    /// Sends the request.
    fn send(
        &self,
        request: EncodedRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// [`Transport`] backed by a `reqwest` client.
///
/// The client carries the connect timeout, the user agent and the CA roots;
/// the overall timeout is applied per request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    user_agent: String,
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};

impl ReqwestTransport {
    /// Creates a transport for the given configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the CA bundle cannot be read or parsed
    /// - [`Error::Transport`] if the TLS backend cannot be initialized
    pub fn new(config: &SosocioConfig) -> Result<Self, Error> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}sosocio-api-rust/{SDK_VERSION}");

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent.clone());

        if let Some(path) = config.bundle_certificate() {
            builder = builder.add_root_certificate(load_certificate(path)?);
        }

        let client = builder.build().map_err(TransportError::from)?;

        Ok(Self { client, user_agent })
    }

    /// Returns the user agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

fn load_certificate(path: &Path) -> Result<reqwest::Certificate, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidCertificate {
        path: path.to_path_buf(),
        reason,
    };
    let pem = std::fs::read(path).map_err(|error| invalid(error.to_string()))?;
    reqwest::Certificate::from_pem(&pem).map_err(|error| invalid(error.to_string()))
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: EncodedRequest) -> Result<RawResponse, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes()).map_err(
            |error| TransportError::with_source(format!("invalid method {}", request.method), error),
        )?;

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        builder = match request.body {
            RequestBody::None => builder,
            RequestBody::Json(json) => builder.body(json),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields).await?),
        };

        let res = builder.send().await?;

        let status = res.status();
        let header_block = header_block(res.version(), status, res.headers());
        let body = res.text().await?;

        Ok(RawResponse {
            status: status.as_u16(),
            header_block,
            body,
        })
    }
}

/// Rebuilds the status line and header lines. Values that are not valid
/// UTF-8 are decoded lossily so a present header never reads as empty.
fn header_block(version: Version, status: StatusCode, headers: &HeaderMap) -> String {
    let mut block = format!("{version:?} {status}\r\n");
    for (name, value) in headers {
        block.push_str(name.as_str());
        block.push_str(": ");
        block.push_str(&String::from_utf8_lossy(value.as_bytes()));
        block.push_str("\r\n");
    }
    block
}

/// The detected content type wins over the declared one.
fn part_mime<'a>(bytes: &[u8], declared: &'a str) -> &'a str {
    sniff_mime(bytes).unwrap_or(declared)
}

/// Reads every upload into a multipart form. File handles are closed before sending.
async fn build_form(fields: Vec<MultipartField>) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for field in fields {
        let bytes = tokio::fs::read(&field.path).await.map_err(|error| {
            TransportError::with_source(
                format!("cannot read upload {}", field.path.display()),
                error,
            )
        })?;
        let mime = part_mime(&bytes, &field.mime_type).to_string();
        if mime != field.mime_type {
            tracing::debug!(
                "Detected {} for upload {} declared as {}",
                mime,
                field.path.display(),
                field.mime_type
            );
        }
        let part = Part::bytes(bytes)
            .file_name(field.file_name)
            .mime_str(&mime)?;
        form = form.part(field.name, part);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiUrl;

    fn config() -> SosocioConfig {
        SosocioConfig::builder()
            .api_url(ApiUrl::new("https://api.sosocio.com").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_user_agent_format() {
        let transport = ReqwestTransport::new(&config()).unwrap();
        assert!(transport.user_agent().starts_with("sosocio-api-rust/"));
        assert!(transport.user_agent().ends_with(SDK_VERSION));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = SosocioConfig::builder()
            .api_url(ApiUrl::new("https://api.sosocio.com").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();
        let transport = ReqwestTransport::new(&config).unwrap();
        assert!(transport.user_agent().starts_with("MyApp/1.0 | sosocio-api-rust/"));
    }

    #[test]
    fn test_missing_certificate_bundle_is_config_error() {
        let config = SosocioConfig::builder()
            .api_url(ApiUrl::new("https://api.sosocio.com").unwrap())
            .bundle_certificate("/nonexistent/ca-bundle.pem")
            .build()
            .unwrap();
        let result = ReqwestTransport::new(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidCertificate { .. }))
        ));
    }

    #[test]
    fn test_header_block_decodes_non_utf8_values_lossily() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-pagination-next",
            reqwest::header::HeaderValue::from_bytes(b"/items?name=caf\xc3\xa9&bad=\xff").unwrap(),
        );
        headers.insert(
            "x-total-records",
            reqwest::header::HeaderValue::from_static("3"),
        );

        let raw = RawResponse {
            status: 200,
            header_block: header_block(Version::HTTP_11, StatusCode::OK, &headers),
            body: String::new(),
        };

        assert!(raw.header_block.starts_with("HTTP/1.1 200 OK\r\n"));
        let parsed = raw.headers();
        assert_eq!(
            parsed.get("x-pagination-next").map(String::as_str),
            Some("/items?name=caf\u{e9}&bad=\u{fffd}")
        );
        assert_eq!(parsed.get("x-total-records").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_detected_mime_wins_over_declared_type() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert_eq!(part_mime(png, "application/octet-stream"), "image/png");
        assert_eq!(part_mime(b"plain text", "text/plain"), "text/plain");
    }

    #[tokio::test]
    async fn test_readable_upload_builds_form_and_keeps_file() {
        let path = std::env::temp_dir().join(format!("sosocio-form-{}.bin", std::process::id()));
        tokio::fs::write(&path, b"%PDF-1.7\n").await.unwrap();
        let fields = vec![MultipartField {
            name: "file0".to_string(),
            path: path.clone(),
            mime_type: "application/octet-stream".to_string(),
            file_name: "doc.bin".to_string(),
        }];

        let form = build_form(fields).await.unwrap();

        assert!(!form.boundary().is_empty());
        assert!(path.exists());
        tokio::fs::remove_file(path).await.unwrap();
    }

    #[tokio::test]
    async fn test_unreadable_upload_is_transport_error() {
        let fields = vec![MultipartField {
            name: "file0".to_string(),
            path: "/nonexistent/upload.png".into(),
            mime_type: "image/png".to_string(),
            file_name: "upload.png".to_string(),
        }];
        let error = build_form(fields).await.unwrap_err();
        assert!(error.message.contains("/nonexistent/upload.png"));
    }
}
