//! # Sosocio API Rust Client
//!
//! A Rust client for the Sosocio REST API. It builds request URLs, attaches
//! authentication headers, encodes JSON or multipart bodies, executes the
//! call, and normalizes the response into an [`ApiResponse`].
//!
//! ## Overview
//!
//! - Typed configuration via [`SosocioConfig`] and [`SosocioConfigBuilder`]
//! - Explicit authentication modes via [`AuthMode`]
//! - Query composition with conflict detection between endpoint and conditions
//! - JSON bodies, or multipart uploads when the input carries `files`
//! - Pagination and total-record headers returned with every response
//! - Debug mode that reports API failures as an [`ErrorRecord`] instead of an error
//!
//! ## Quick Start
//!
//! ```rust
//! use sosocio_api::{SosocioConfig, ApiUrl, ApiKey};
//!
//! let config = SosocioConfig::builder()
//!     .api_url(ApiUrl::new("https://api.sosocio.com").unwrap())
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use sosocio_api::{SosocioClient, HttpMethod};
//! use serde_json::json;
//!
//! let client = SosocioClient::new(config)?;
//!
//! // GET: arguments are conditions merged into the query string
//! let page = client
//!     .api("/photos", HttpMethod::Get, &json!({"where": {"album_id": 7}, "limit": 20}))
//!     .await?;
//! println!("total: {:?}, next: {:?}", page.total_records(), page.pagination.next);
//!
//! // POST with files: sent as multipart fields file0, file1, ...
//! client
//!     .api("/photos", HttpMethod::Post, &json!({
//!         "files": [{"tmp_name": "/tmp/upload-1", "name": "beach.jpg"}]
//!     }))
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No per-call state on the client**: every call returns its own metadata
//! - **Fail-fast validation**: configuration and endpoint errors occur before any network activity
//! - **No retries**: a failed attempt is final; retry policy belongs to the caller

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;

pub use auth::AuthMode;
pub use config::{ApiKey, ApiSecret, ApiUrl, SosocioConfig, SosocioConfigBuilder};
pub use error::{ConfigError, Error};

pub use clients::{
    ApiError, ApiResponse, EncodedRequest, ErrorCode, ErrorRecord, HttpMethod,
    InvalidRequestError, MimeType, Pagination, RawResponse, RequestBody, ResponseBody,
    ReqwestTransport, SosocioClient, Transport, TransportError,
};
