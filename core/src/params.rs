//! Caller-supplied request parameters.
//!
//! Parameters are forwarded verbatim: the client never validates their
//! content, it only decides whether they travel as a query string or as a
//! JSON body.

use serde::Serialize;
use serde_json::{Map, Value};

/// Free-form key/value parameters for a single request.
pub type Params = Map<String, Value>;

/// Profile list that bulk lookups are filed under unless the caller overrides it.
pub const DEFAULT_PROFILE_LIST: &str = "API Bulk Lookup";

/// Build a `Params` map from a JSON object literal.
///
/// Anything other than an object yields an empty map.
pub fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

/// Flatten parameters into query pairs.
///
/// Strings pass through untouched, numbers and booleans are stringified,
/// arrays become one pair per element under the same key, nulls are dropped
/// and nested objects are sent as their JSON encoding.
pub fn query_pairs(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(v) = scalar(item) {
                        pairs.push((key.clone(), v));
                    }
                }
            }
            other => {
                if let Some(v) = scalar(other) {
                    pairs.push((key.clone(), v));
                }
            }
        }
    }
    pairs
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

/// Options for `bulk_lookup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkLookupOptions {
    /// Profile list the results are saved to.
    pub profile_list: String,
    /// Webhook notified when the batch completes; omitted when `None`.
    pub webhook_id: Option<String>,
}

impl Default for BulkLookupOptions {
    fn default() -> Self {
        Self {
            profile_list: DEFAULT_PROFILE_LIST.to_string(),
            webhook_id: None,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct BulkLookupBody<'a> {
    pub queries: &'a [Value],
    pub profile_list: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<&'a str>,
}
