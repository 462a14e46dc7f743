//! Query string composition for API endpoints.
//!
//! An endpoint may carry its own query string (`/albums?limit=5`) and a GET
//! call may add conditions as a JSON object. Both are merged into a single
//! `application/x-www-form-urlencoded` query, URL-embedded pairs first. A
//! parameter may come from one of the two sources only.
//!
//! # Example
//!
//! ```rust
//! use sosocio_api::clients::compose;
//! use serde_json::json;
//!
//! let url = compose("/albums", &json!({"where": {"a": 1}, "limit": 10})).unwrap();
//! assert_eq!(url, "/albums?where=%7B%22a%22%3A1%7D&limit=10");
//! ```

use serde_json::Value;
use url::{form_urlencoded, Url};

use crate::clients::errors::InvalidRequestError;

/// Condition keys whose values are sent as JSON documents.
const JSON_ENCODED_KEYS: [&str; 2] = ["where", "search"];

/// Merges `conditions` into the query string of `endpoint`.
///
/// Non-object conditions leave the endpoint untouched. `where` and `search`
/// values are JSON-encoded; other values are form-encoded with nested arrays
/// and objects flattened to `key[index]` / `key[name]`.
///
/// # Errors
///
/// - [`InvalidRequestError::InvalidEndpoint`] if the endpoint has no path
/// - [`InvalidRequestError::ConflictingParameters`] if a condition is also
///   present in the endpoint's own query string
pub fn compose(endpoint: &str, conditions: &Value) -> Result<String, InvalidRequestError> {
    let Value::Object(conditions) = conditions else {
        return Ok(endpoint.to_string());
    };

    let (path, embedded) = split_endpoint(endpoint)?;
    let mut pairs = parse_query(&embedded);

    if let Some(parameter) = conditions
        .keys()
        .find(|key| pairs.iter().any(|(name, _)| base_name(name) == key.as_str()))
    {
        return Err(InvalidRequestError::ConflictingParameters {
            parameter: parameter.clone(),
        });
    }

    for (key, value) in conditions {
        if JSON_ENCODED_KEYS.contains(&key.as_str()) {
            pairs.push((key.clone(), value.to_string()));
        } else {
            push_form_value(key.clone(), value, &mut pairs);
        }
    }

    Ok(join_query(&path, &pairs))
}

/// Validates the endpoint and re-encodes its embedded query string.
///
/// # Errors
///
/// Returns [`InvalidRequestError::InvalidEndpoint`] if the endpoint has no path.
pub fn normalize_endpoint(endpoint: &str) -> Result<String, InvalidRequestError> {
    let (path, embedded) = split_endpoint(endpoint)?;
    Ok(join_query(&path, &parse_query(&embedded)))
}

/// Splits an endpoint into path and query, discarding any fragment.
///
/// Absolute endpoints (`https://host/items?page=2`, `//host/items`) keep only
/// their path and query; scheme and host are replaced by the base URL.
fn split_endpoint(endpoint: &str) -> Result<(String, String), InvalidRequestError> {
    let invalid = || InvalidRequestError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
    };
    let without_fragment = endpoint.split('#').next().unwrap_or_default();

    if is_absolute(without_fragment) {
        if !has_path(without_fragment) {
            return Err(invalid());
        }
        let parsed = if without_fragment.starts_with("//") {
            Url::parse(&format!("https:{without_fragment}"))
        } else {
            Url::parse(without_fragment)
        }
        .map_err(|_| invalid())?;

        return Ok((
            parsed.path().to_string(),
            parsed.query().unwrap_or_default().to_string(),
        ));
    }

    let (path, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    if path.trim().is_empty() {
        return Err(invalid());
    }

    Ok((path.to_string(), query.to_string()))
}

fn is_absolute(endpoint: &str) -> bool {
    endpoint.starts_with("//")
        || endpoint.split_once("://").is_some_and(|(scheme, _)| {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        })
}

/// `https://host/items` has a path; `https://host` and `https://host?page=2` do not.
fn has_path(absolute: &str) -> bool {
    let after_scheme = absolute.split_once("//").map_or(absolute, |(_, rest)| rest);
    after_scheme
        .find(|c| matches!(c, '/' | '?'))
        .is_some_and(|index| after_scheme[index..].starts_with('/'))
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// `filter[0]` and `filter[name]` both belong to parameter `filter`.
fn base_name(name: &str) -> &str {
    name.split('[').next().unwrap_or(name)
}

fn push_form_value(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push((key, if *flag { "1" } else { "0" }.to_string())),
        Value::Number(number) => pairs.push((key, number.to_string())),
        Value::String(text) => pairs.push((key, text.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                push_form_value(format!("{key}[{index}]"), item, pairs);
            }
        }
        Value::Object(fields) => {
            for (name, field) in fields {
                push_form_value(format!("{key}[{name}]"), field, pairs);
            }
        }
    }
}

fn join_query(path: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{path}?{query}")
}
