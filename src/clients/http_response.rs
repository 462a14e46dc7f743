//! Response types for the Sosocio API client.
//!
//! This module provides the raw transport response, the header-derived
//! pagination metadata, and the per-call [`ApiResponse`] envelope.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::classify::ErrorRecord;
use crate::clients::http_request::MimeType;

/// Header carrying the link to the previous page.
pub const PAGINATION_PREVIOUS_HEADER: &str = "x-pagination-previous";
/// Header carrying the link to the next page.
pub const PAGINATION_NEXT_HEADER: &str = "x-pagination-next";
/// Header carrying the total number of records.
pub const TOTAL_RECORDS_HEADER: &str = "x-total-records";

/// A response as delivered by the transport: status, header block and body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The header block, one header per line, optionally preceded by the status line.
    pub header_block: String,
    /// The response body text.
    pub body: String,
}

impl RawResponse {
    /// Parses the header block into a map of lowercase names to values.
    ///
    /// Lines are split on the first `:`; lines without one (such as the
    /// status line) are ignored. Later duplicates replace earlier ones.
    #[must_use]
    pub fn headers(&self) -> HashMap<String, String> {
        self.header_block
            .split('\n')
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
            .collect()
    }
}

/// Links to adjacent pages, taken from the pagination headers.
///
/// `None` means the header was absent, which is distinct from an empty value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Link to the previous page.
    pub previous: Option<String>,
    /// Link to the next page.
    pub next: Option<String>,
}

/// A decoded response body.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// A JSON document.
    Json(Value),
    /// Raw text: CSV responses, or bodies that are not valid JSON.
    Text(String),
}

impl ResponseBody {
    /// Returns the JSON document, if this body is JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the raw text, if this body is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// Splits a raw response into decoded body, pagination and total record count.
///
/// CSV-like mime types return the body verbatim. Everything else is decoded
/// as JSON, an empty body yielding `{}`. A body that is not valid JSON is
/// kept as text.
#[must_use]
pub fn normalize(raw: &RawResponse, mime_type: &MimeType) -> (ResponseBody, Pagination, Option<String>) {
    let headers = raw.headers();

    let pagination = Pagination {
        previous: headers.get(PAGINATION_PREVIOUS_HEADER).cloned(),
        next: headers.get(PAGINATION_NEXT_HEADER).cloned(),
    };
    let total_records = headers.get(TOTAL_RECORDS_HEADER).cloned();

    (decode_body(&raw.body, mime_type), pagination, total_records)
}

fn decode_body(body: &str, mime_type: &MimeType) -> ResponseBody {
    if mime_type.is_csv_like() {
        return ResponseBody::Text(body.to_string());
    }

    if body.trim().is_empty() {
        return ResponseBody::Json(Value::Object(serde_json::Map::new()));
    }

    match serde_json::from_str(body) {
        Ok(value) => ResponseBody::Json(value),
        Err(error) => {
            tracing::warn!("Response body requested as {} is not valid JSON: {}", mime_type, error);
            ResponseBody::Text(body.to_string())
        }
    }
}

/// The outcome of one API call.
///
/// Pagination, total record count and the debug-mode error describe only
/// the call that produced this value.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The decoded body.
    pub body: ResponseBody,
    /// Pagination links.
    pub pagination: Pagination,
    /// Value of the `X-Total-Records` header.
    pub total_records: Option<String>,
    /// The classified error, set only for non-2xx responses in debug mode.
    pub error: Option<ErrorRecord>,
}

impl ApiResponse {
    /// Returns the debug-mode error record, if the call failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorRecord> {
        self.error.as_ref()
    }

    /// Returns the pagination links.
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Returns the `X-Total-Records` header value.
    #[must_use]
    pub fn total_records(&self) -> Option<&str> {
        self.total_records.as_deref()
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(header_block: &str, body: &str) -> RawResponse {
        RawResponse {
            status: 200,
            header_block: header_block.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_pagination_and_total_records_from_headers() {
        let response = raw("x-total-records: 42\nx-pagination-next: /items?page=2", "[]");
        let (_, pagination, total) = normalize(&response, &MimeType::Json);

        assert_eq!(total, Some("42".to_string()));
        assert_eq!(pagination.next, Some("/items?page=2".to_string()));
        assert_eq!(pagination.previous, None);
    }

    #[test]
    fn test_header_names_are_case_insensitive_and_status_line_ignored() {
        let response = raw(
            "HTTP/1.1 200 OK\r\nX-Pagination-Previous: https://api.sosocio.com/items?page=1\r\nX-Total-Records: 7\r\n\r\n",
            "{}",
        );
        let (_, pagination, total) = normalize(&response, &MimeType::Json);

        assert_eq!(
            pagination.previous,
            Some("https://api.sosocio.com/items?page=1".to_string())
        );
        assert_eq!(pagination.next, None);
        assert_eq!(total, Some("7".to_string()));
    }

    #[test]
    fn test_empty_header_value_is_distinct_from_absent() {
        let response = raw("x-pagination-next:\n", "{}");
        let (_, pagination, total) = normalize(&response, &MimeType::Json);
        assert_eq!(pagination.next, Some(String::new()));
        assert_eq!(total, None);
    }

    #[test]
    fn test_empty_json_body_is_empty_object() {
        let (body, _, _) = normalize(&raw("", ""), &MimeType::Json);
        assert_eq!(body, ResponseBody::Json(json!({})));
    }

    #[test]
    fn test_csv_body_is_returned_verbatim() {
        let csv = "id,title\n1,\"Summer\"\n";
        let (body, _, _) = normalize(&raw("", csv), &MimeType::Csv);
        assert_eq!(body.as_text(), Some(csv));
    }

    #[test]
    fn test_unknown_mime_type_attempts_json() {
        let mime = MimeType::Other("application/hal+json".to_string());
        let (body, _, _) = normalize(&raw("", r#"{"id":1}"#), &mime);
        assert_eq!(body.as_json(), Some(&json!({"id": 1})));
    }

    #[test]
    fn test_invalid_json_is_kept_as_text() {
        let (body, _, _) = normalize(&raw("", "<html>oops</html>"), &MimeType::Json);
        assert_eq!(body, ResponseBody::Text("<html>oops</html>".to_string()));
    }

    #[test]
    fn test_header_values_keep_colons() {
        let response = raw("x-pagination-next: https://api.sosocio.com:8443/items?page=3", "");
        assert_eq!(
            response.headers().get("x-pagination-next"),
            Some(&"https://api.sosocio.com:8443/items?page=3".to_string())
        );
    }

    #[test]
    fn test_api_response_accessors() {
        let response = ApiResponse {
            status: 201,
            body: ResponseBody::Json(json!({})),
            pagination: Pagination::default(),
            total_records: Some("3".to_string()),
            error: None,
        };
        assert!(response.is_ok());
        assert_eq!(response.total_records(), Some("3"));
        assert!(response.error().is_none());
        assert_eq!(response.pagination(), &Pagination::default());
    }
}
