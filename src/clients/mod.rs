//! HTTP client types for Sosocio API communication.
//!
//! This module implements the request pipeline:
//!
//! - [`compose`]: merges GET conditions into the endpoint query string
//! - [`encode`]: chooses a JSON or multipart body and builds the header set
//! - [`Transport`]: sends an [`EncodedRequest`] and returns a [`RawResponse`]
//! - [`classify`]: decides between success and an [`ErrorRecord`]
//! - [`normalize`]: extracts pagination headers and decodes the body
//! - [`SosocioClient`]: runs the pipeline and returns an [`ApiResponse`]
//!
//! # Example
//!
//! ```rust,ignore
//! use sosocio_api::clients::SosocioClient;
//! use sosocio_api::{SosocioConfig, ApiUrl, HttpMethod};
//! use serde_json::json;
//!
//! let config = SosocioConfig::builder()
//!     .api_url(ApiUrl::new("https://api.sosocio.com").unwrap())
//!     .debug(true)
//!     .build()
//!     .unwrap();
//! let client = SosocioClient::new(config)?;
//!
//! let response = client.api("/albums/42", HttpMethod::Get, &json!({})).await?;
//! if let Some(error) = response.error() {
//!     println!("{}: {}", error.code, error.message);
//! }
//! ```

mod classify;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod query;
mod transport;

pub use classify::{classify, Classification, ErrorCode, ErrorRecord};
pub use errors::{ApiError, InvalidRequestError, TransportError};
pub use http_client::SosocioClient;
pub use http_request::{
    encode, encode_body, sniff_mime, EncodedRequest, HttpMethod, MimeType, MultipartField,
    RequestBody, DEFAULT_UPLOAD_MIME,
};
pub use http_response::{
    normalize, ApiResponse, Pagination, RawResponse, ResponseBody, PAGINATION_NEXT_HEADER,
    PAGINATION_PREVIOUS_HEADER, TOTAL_RECORDS_HEADER,
};
pub use query::{compose, normalize_endpoint};
pub use transport::{ReqwestTransport, Transport, SDK_VERSION};
