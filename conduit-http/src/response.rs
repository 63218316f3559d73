//! Response types and outcome normalisation

use crate::errors::{ServiceError, LOCAL_FAILURE_STATUS};
use crate::transport::RawReply;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Result of one service call
pub type Outcome = Result<ServiceResponse, ServiceError>;

/// Response body, decoded when the service declared JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(JsonValue),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }

    /// The body as a JSON value; raw text becomes a JSON string
    pub fn to_json(&self) -> JsonValue {
        match self {
            ResponseBody::Json(value) => value.clone(),
            ResponseBody::Text(text) => JsonValue::String(text.clone()),
        }
    }
}

/// Status line and headers of a received response. Header names are lower-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// Successful outcome: the decoded body plus the raw response
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub body: ResponseBody,
    pub raw: RawResponse,
}

/// Any media type mentioning `json` (`application/json`, `application/problem+json`, ...)
pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}

/// Turn a complete reply into an outcome.
///
/// JSON content types are decoded (an empty body counts as `{}`); anything
/// else stays text. Only status 200 is a success.
pub fn normalize_response(reply: RawReply) -> Outcome {
    let raw = RawResponse {
        status: reply.status,
        headers: reply.headers,
    };

    let body = match raw.content_type() {
        Some(content_type) if is_json_content_type(content_type) => {
            let text = if reply.body.is_empty() { "{}" } else { reply.body.as_str() };
            match serde_json::from_str(text) {
                Ok(value) => ResponseBody::Json(value),
                Err(e) => {
                    return Err(ServiceError::Parse {
                        status: LOCAL_FAILURE_STATUS,
                        message: e.to_string(),
                        raw,
                    })
                }
            }
        }
        _ => ResponseBody::Text(reply.body),
    };

    if raw.status == 200 {
        Ok(ServiceResponse { body, raw })
    } else {
        Err(ServiceError::Status { body, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body_is_decoded() {
        let reply = RawReply::new(200)
            .with_header("Content-Type", "application/json; charset=utf-8")
            .with_body(r#"{"ok":true}"#);

        let response = normalize_response(reply).unwrap();
        assert_eq!(response.body, ResponseBody::Json(json!({"ok": true})));
        assert_eq!(response.raw.status, 200);
    }

    #[test]
    fn test_non_json_body_stays_text() {
        let reply = RawReply::new(200)
            .with_header("content-type", "text/plain")
            .with_body(r#"{"ok":true}"#);

        let response = normalize_response(reply).unwrap();
        assert_eq!(response.body.as_text(), Some(r#"{"ok":true}"#));
    }

    #[test]
    fn test_missing_content_type_stays_text() {
        let response = normalize_response(RawReply::new(200).with_body("pong")).unwrap();
        assert_eq!(response.body, ResponseBody::Text("pong".into()));
    }

    #[test]
    fn test_empty_json_body_is_empty_object() {
        let reply = RawReply::new(200).with_header("content-type", "application/json");
        let response = normalize_response(reply).unwrap();
        assert_eq!(response.body.as_json(), Some(&json!({})));
    }

    #[test]
    fn test_only_200_succeeds() {
        for status in [201, 204, 301, 404, 500] {
            let reply = RawReply::new(status).with_header("content-type", "application/json");
            let error = normalize_response(reply).unwrap_err();
            assert_eq!(error.status(), status);
        }
    }

    #[test]
    fn test_error_status_carries_decoded_body() {
        let reply = RawReply::new(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"missing"}"#);

        match normalize_response(reply) {
            Err(ServiceError::Status { body, raw }) => {
                assert_eq!(body.as_json(), Some(&json!({"error": "missing"})));
                assert_eq!(raw.status, 404);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let reply = RawReply::new(200)
            .with_header("content-type", "application/json")
            .with_body("{not json");

        match normalize_response(reply) {
            Err(ServiceError::Parse { status, raw, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(raw.status, 200);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let raw = RawResponse {
            status: 200,
            headers: HashMap::from([("x-trace".to_string(), "abc".to_string())]),
        };
        assert_eq!(raw.header("X-Trace"), Some("abc"));
    }
}
