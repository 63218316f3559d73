//! Per-call options and the request descriptor built from them

use crate::errors::ServiceError;
use crate::response::ServiceResponse;
use crate::types::{HttpMethod, Scheme};
use reqwest::header::HeaderMap;
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Notified once a call has settled, before the outcome is returned
pub type Callback = Box<dyn FnOnce(Result<&ServiceResponse, &ServiceError>) + Send>;

/// Optional inputs of a verb call
#[derive(Default)]
pub struct RequestOptions {
    /// Query parameters (read-style verbs) or JSON body (write-style verbs)
    pub data: Option<Map<String, JsonValue>>,

    /// Headers merged over the service defaults, in the order they were set.
    /// When two entries differ only in case, the later one wins.
    pub headers: Vec<(String, String)>,

    callback: Option<Callback>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: Map<String, JsonValue>) -> Self {
        self.data = Some(data);
        self
    }

    /// Add one data entry, keeping insertion order
    pub fn param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(name, value)| (name.into(), value.into())));
        self
    }

    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Result<&ServiceResponse, &ServiceError>) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub(crate) fn take_callback(&mut self) -> Option<Callback> {
        self.callback.take()
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("data", &self.data)
            .field("headers", &self.headers)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Everything needed to put one request on the wire
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    /// Action, plus the query string for read-style verbs
    pub path: String,
    pub method: HttpMethod,
    pub headers: HeaderMap,
    /// Serialised JSON body, write-style verbs only
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// `{scheme}://{host}:{port}{path}`
    pub fn url(&self) -> String {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let separator = if self.path.starts_with('/') { "" } else { "/" };

        format!(
            "{}://{}:{}{}{}",
            self.scheme, host, self.port, separator, self.path
        )
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
