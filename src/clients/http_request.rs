//! Request encoding for the Sosocio API.
//!
//! This module turns a method and the caller's input data into an
//! [`EncodedRequest`]: a URL, a header set and a body that is either a JSON
//! document or a set of multipart file fields, never both.

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::clients::errors::InvalidRequestError;

/// Mime type assigned to uploads whose entry declares no type.
pub const DEFAULT_UPLOAD_MIME: &str = "application/octet-stream";

/// HTTP methods accepted by [`SosocioClient::api`](crate::SosocioClient::api).
///
/// Methods other than GET, POST, PUT and DELETE are passed through as
/// [`HttpMethod::Other`] and never carry a body.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum HttpMethod {
    /// Retrieve resources; arguments become query conditions.
    #[default]
    Get,
    /// Create resources.
    Post,
    /// Update resources.
    Put,
    /// Remove resources.
    Delete,
    /// Any other method, stored uppercase.
    Other(String),
}

impl HttpMethod {
    /// Returns the uppercase method name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Other(method) => method,
        }
    }

    /// Returns `true` if the call arguments are encoded as a request body.
    #[must_use]
    pub const fn carries_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = s.trim().to_uppercase();
        Ok(match method.as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            _ => Self::Other(method),
        })
    }
}

/// Mime type requested from the API and used to decode the response body.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum MimeType {
    /// `application/json`, decoded as JSON.
    #[default]
    Json,
    /// `text/csv`, returned as raw text.
    Csv,
    /// Any other type. Decoded as JSON unless it names a CSV variant.
    Other(String),
}

impl MimeType {
    /// Returns the value sent in the `Accept` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Other(mime) => mime,
        }
    }

    /// Returns `true` if response bodies are returned verbatim instead of JSON-decoded.
    #[must_use]
    pub fn is_csv_like(&self) -> bool {
        match self {
            Self::Json => false,
            Self::Csv => true,
            Self::Other(mime) => mime.to_ascii_lowercase().contains("csv"),
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MimeType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mime = s.trim();
        Ok(match mime.to_ascii_lowercase().as_str() {
            "application/json" => Self::Json,
            "text/csv" => Self::Csv,
            _ => Self::Other(mime.to_string()),
        })
    }
}

/// One uploaded file in a multipart body.
///
/// The file at `path` belongs to the caller; it is read while sending and
/// never moved or deleted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipartField {
    /// Synthetic field name: `file0`, `file1`, ...
    pub name: String,
    /// Local path of the file to upload.
    pub path: PathBuf,
    /// Declared mime type. The transport sends the detected type instead
    /// when the content starts with a known signature.
    pub mime_type: String,
    /// File name reported to the API.
    pub file_name: String,
}

/// Body of an encoded request.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// A serialized JSON document.
    Json(String),
    /// Multipart file fields.
    Multipart(Vec<MultipartField>),
}

/// A request ready for the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedRequest {
    /// Absolute URL including the query string.
    pub url: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Headers in sending order.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: RequestBody,
    /// Overall timeout for the exchange.
    pub timeout: Duration,
}

impl EncodedRequest {
    /// Returns the first header with the given name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Encodes a request for `url`.
///
/// `headers` are the per-client headers (auth and `Accept`); a
/// `Content-Type: application/json` header is added for JSON bodies.
///
/// # Errors
///
/// Returns [`InvalidRequestError::InvalidFileEntry`] if a `files` entry
/// cannot be turned into a multipart field.
pub fn encode(
    method: HttpMethod,
    url: impl Into<String>,
    input: &Value,
    headers: &[(String, String)],
    timeout: Duration,
) -> Result<EncodedRequest, InvalidRequestError> {
    let body = encode_body(&method, input)?;

    let mut headers = headers.to_vec();
    if matches!(body, RequestBody::Json(_)) {
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
    }

    Ok(EncodedRequest {
        url: url.into(),
        method,
        headers,
        body,
        timeout,
    })
}

/// Chooses between multipart, JSON and no body for the given input.
///
/// # Errors
///
/// Returns [`InvalidRequestError::InvalidFileEntry`] for malformed `files` entries.
pub fn encode_body(method: &HttpMethod, input: &Value) -> Result<RequestBody, InvalidRequestError> {
    if !method.carries_body() {
        return Ok(RequestBody::None);
    }

    let Value::Object(fields) = input else {
        return Ok(json_body_unless_empty(input));
    };

    let Some(files) = fields.get("files") else {
        return Ok(json_body_unless_empty(input));
    };

    let entries = file_entries(files)?;
    if !entries.is_empty() {
        let parts = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| multipart_field(index, entry))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(RequestBody::Multipart(parts));
    }

    // An empty `files` collection is dropped; the rest is sent as JSON.
    let rest: Map<String, Value> = fields
        .iter()
        .filter(|(key, _)| key.as_str() != "files")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Ok(json_body_unless_empty(&Value::Object(rest)))
}

fn json_body_unless_empty(input: &Value) -> RequestBody {
    let empty = match input {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        RequestBody::None
    } else {
        RequestBody::Json(input.to_string())
    }
}

fn file_entries(files: &Value) -> Result<Vec<&Value>, InvalidRequestError> {
    match files {
        Value::Array(entries) => Ok(entries.iter().collect()),
        Value::Object(entries) => Ok(entries.values().collect()),
        Value::Null => Ok(Vec::new()),
        _ => Err(InvalidRequestError::InvalidFileEntry {
            index: 0,
            reason: "'files' must be an array or an object of file entries".to_string(),
        }),
    }
}

fn multipart_field(index: usize, entry: &Value) -> Result<MultipartField, InvalidRequestError> {
    let path = entry
        .get("tmp_name")
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| InvalidRequestError::InvalidFileEntry {
            index,
            reason: "missing 'tmp_name'".to_string(),
        })?;

    let file_name = entry
        .get("name")
        .and_then(Value::as_str)
        .map(String::from)
        .or_else(|| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| format!("file{index}"));

    let mime_type = entry
        .get("type")
        .and_then(Value::as_str)
        .filter(|mime| !mime.is_empty())
        .unwrap_or(DEFAULT_UPLOAD_MIME)
        .to_string();

    Ok(MultipartField {
        name: format!("file{index}"),
        path,
        mime_type,
        file_name,
    })
}

/// Detects the mime type of file content from its leading bytes.
///
/// Returns `None` when the signature is unknown.
#[must_use]
pub fn sniff_mime(header: &[u8]) -> Option<&'static str> {
    let signatures: [(&[u8], &'static str); 8] = [
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"%PDF-", "application/pdf"),
        (b"PK\x03\x04", "application/zip"),
        (b"II*\x00", "image/tiff"),
        (b"MM\x00*", "image/tiff"),
    ];

    if let Some((_, mime)) = signatures
        .iter()
        .find(|(signature, _)| header.starts_with(signature))
    {
        return Some(*mime);
    }

    if header.len() >= 12 && &header[..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    None
}
