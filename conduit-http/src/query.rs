//! Query string encoding for read-style requests

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

/// Characters left as-is in a query component. Space becomes `%20`, never `+`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode `data` as `key=value` pairs joined by `&`, in the map's insertion order.
///
/// Strings are used verbatim, numbers and booleans are stringified, arrays
/// repeat the key once per element, and `null` or nested objects encode as an
/// empty value. An empty map yields an empty string.
pub fn encode_query(data: &Map<String, Value>) -> String {
    let mut pairs = Vec::with_capacity(data.len());

    for (key, value) in data {
        let key = escape(key);
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push(format!("{}={}", key, escape(&scalar(item))));
                }
            }
            other => pairs.push(format!("{}={}", key, escape(&scalar(other)))),
        }
    }

    pairs.join("&")
}

fn escape(component: &str) -> String {
    utf8_percent_encode(component, QUERY_COMPONENT).to_string()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}
