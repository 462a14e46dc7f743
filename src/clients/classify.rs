//! Classification of HTTP statuses into success or a structured error.
//!
//! The classifier never fails: a body that is not JSON is treated as having
//! no structured error, and the trimmed text becomes the message.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error code reported by the API, or the HTTP status when the body has none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    /// A symbolic code such as `not_found`.
    Text(String),
    /// A numeric code (HTTP status or numeric API code).
    Number(i64),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(code) => f.write_str(code),
            Self::Number(code) => write!(f, "{code}"),
        }
    }
}

/// A failed call, as exposed in debug mode.
///
/// # Example
///
/// ```rust
/// use sosocio_api::{ErrorCode, ErrorRecord};
///
/// let record = ErrorRecord {
///     code: ErrorCode::Text("not_found".to_string()),
///     message: "missing".to_string(),
/// };
/// assert_eq!(record.code.to_string(), "not_found");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
}

/// Outcome of classifying one response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    /// 2xx status.
    Success,
    /// Any other status.
    Failure(ErrorRecord),
}

/// Classifies a response by status, extracting `error.code` / `error.message`
/// from a JSON body when present.
#[must_use]
pub fn classify(status: u16, raw_body: &str) -> Classification {
    if (200..300).contains(&status) {
        return Classification::Success;
    }

    let parsed: Option<Value> = serde_json::from_str(raw_body).ok();
    let error = parsed.as_ref().and_then(|body| body.get("error"));

    let code = error
        .and_then(|error| error.get("code"))
        .and_then(code_from_value)
        .unwrap_or(ErrorCode::Number(i64::from(status)));

    let message = error
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map_or_else(|| raw_body.trim().to_string(), String::from);

    Classification::Failure(ErrorRecord { code, message })
}

fn code_from_value(value: &Value) -> Option<ErrorCode> {
    match value {
        Value::String(code) => Some(ErrorCode::Text(code.clone())),
        Value::Number(code) => code.as_i64().map(ErrorCode::Number),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2xx_is_success() {
        for status in [200, 201, 204, 299] {
            assert_eq!(classify(status, "not even json"), Classification::Success);
        }
    }

    #[test]
    fn test_structured_error_body_is_used() {
        let body = r#"{"error":{"code":"not_found","message":"missing"}}"#;
        assert_eq!(
            classify(404, body),
            Classification::Failure(ErrorRecord {
                code: ErrorCode::Text("not_found".to_string()),
                message: "missing".to_string(),
            })
        );
    }

    #[test]
    fn test_numeric_error_code_is_kept() {
        let body = r#"{"error":{"code":1042,"message":"quota exceeded"}}"#;
        let Classification::Failure(record) = classify(403, body) else {
            panic!("expected failure");
        };
        assert_eq!(record.code, ErrorCode::Number(1042));
        assert_eq!(record.message, "quota exceeded");
    }

    #[test]
    fn test_plain_text_body_falls_back_to_status() {
        let Classification::Failure(record) = classify(502, "  Bad Gateway\n") else {
            panic!("expected failure");
        };
        assert_eq!(record.code, ErrorCode::Number(502));
        assert_eq!(record.message, "Bad Gateway");
    }

    #[test]
    fn test_json_without_error_object_falls_back() {
        let Classification::Failure(record) = classify(400, r#"{"detail":"nope"}"#) else {
            panic!("expected failure");
        };
        assert_eq!(record.code, ErrorCode::Number(400));
        assert_eq!(record.message, r#"{"detail":"nope"}"#);
    }

    #[test]
    fn test_status_below_200_is_failure() {
        assert!(matches!(classify(101, ""), Classification::Failure(_)));
        assert!(matches!(classify(300, ""), Classification::Failure(_)));
    }

    #[test]
    fn test_error_record_serializes_code_untagged() {
        let record = ErrorRecord {
            code: ErrorCode::Number(404),
            message: "missing".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"code":404,"message":"missing"}"#
        );
    }
}
