//! Service client implementation

use crate::errors::ServiceError;
use crate::query::encode_query;
use crate::request::{RequestDescriptor, RequestOptions};
use crate::response::{normalize_response, Outcome};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{HttpMethod, Scheme};
use conduit_config::{HttpConfig, ServiceConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Client for one remote service.
///
/// Configuration is fixed at construction; calls share nothing else, so a
/// client can be used from many tasks at once.
#[derive(Clone)]
pub struct ServiceClient {
    name: String,
    host: String,
    port: u16,
    scheme: Scheme,
    default_headers: BTreeMap<String, String>,
    transport: Arc<dyn HttpTransport>,
}

impl ServiceClient {
    /// Create a client that talks to the network with default HTTP settings
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        Self::with_http_config(config, &HttpConfig::default())
    }

    /// Create a client that talks to the network with the given HTTP settings
    pub fn with_http_config(
        config: ServiceConfig,
        http: &HttpConfig,
    ) -> Result<Self, ServiceError> {
        let transport = ReqwestTransport::new(http)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(config: ServiceConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let scheme = Scheme::resolve(config.scheme.as_deref());
        debug!(
            "Creating client for service {} at {}://{}:{}",
            config.name, scheme, config.host, config.port
        );

        Self {
            name: config.name,
            host: config.host,
            port: config.port,
            scheme,
            default_headers: config.default_headers,
            transport,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    /// Build the request for `method` on `action` without sending it.
    ///
    /// Fails with a configuration error when the host, port or action is
    /// missing (checked in that order).
    pub fn build_request(
        &self,
        method: HttpMethod,
        action: &str,
        options: &RequestOptions,
    ) -> Result<RequestDescriptor, ServiceError> {
        if self.host.is_empty() {
            return Err(ServiceError::config("Host required"));
        }
        if self.port == 0 {
            return Err(ServiceError::config("Port required"));
        }
        if action.is_empty() {
            return Err(ServiceError::config("Action required"));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            insert_header(&mut headers, name, value)?;
        }
        for (name, value) in &options.headers {
            insert_header(&mut headers, name, value)?;
        }

        let (path, body) = if method.is_write_style() {
            let body = JsonValue::Object(options.data.clone().unwrap_or_default()).to_string();
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
            (action.to_string(), Some(body))
        } else {
            let query = options.data.as_ref().map(encode_query).unwrap_or_default();
            let path = if query.is_empty() {
                action.to_string()
            } else if action.contains('?') {
                format!("{}&{}", action, query)
            } else {
                format!("{}?{}", action, query)
            };
            (path, None)
        };

        Ok(RequestDescriptor {
            scheme: self.scheme,
            host: self.host.clone(),
            port: self.port,
            path,
            method,
            headers,
            body,
        })
    }

    /// Perform one request and settle its outcome.
    ///
    /// The callback in `options`, if any, sees the outcome after it is settled
    /// and before it is returned. Nothing is retried.
    pub async fn request(
        &self,
        method: HttpMethod,
        action: &str,
        mut options: RequestOptions,
    ) -> Outcome {
        let callback = options.take_callback();

        let outcome = match self.build_request(method, action, &options) {
            Ok(descriptor) => self.dispatch(&descriptor).await,
            Err(e) => {
                warn!("Request {} {} to service {} rejected: {}", method, action, self.name, e);
                Err(e)
            }
        };

        if let Some(callback) = callback {
            callback(outcome.as_ref());
        }

        outcome
    }

    async fn dispatch(&self, descriptor: &RequestDescriptor) -> Outcome {
        debug!(
            "Calling service {}: {} {}",
            self.name,
            descriptor.method,
            descriptor.url()
        );

        match self.transport.send(descriptor).await {
            Ok(reply) => {
                info!(
                    "Service {} responded with status {}",
                    self.name, reply.status
                );
                normalize_response(reply)
            }
            Err(e) => {
                error!(
                    "Transport error calling service {} at {}: {}",
                    self.name,
                    descriptor.url(),
                    e
                );
                Err(ServiceError::transport(e))
            }
        }
    }

    /// GET `action`, with `options.data` as the query string
    pub async fn get(&self, action: &str, options: RequestOptions) -> Outcome {
        self.request(HttpMethod::Get, action, options).await
    }

    /// HEAD `action`, with `options.data` as the query string
    pub async fn head(&self, action: &str, options: RequestOptions) -> Outcome {
        self.request(HttpMethod::Head, action, options).await
    }

    /// POST `options.data` as JSON to `action`
    pub async fn post(&self, action: &str, options: RequestOptions) -> Outcome {
        self.request(HttpMethod::Post, action, options).await
    }

    /// PUT `options.data` as JSON to `action`
    pub async fn put(&self, action: &str, options: RequestOptions) -> Outcome {
        self.request(HttpMethod::Put, action, options).await
    }

    /// PATCH `options.data` as JSON to `action`
    pub async fn patch(&self, action: &str, options: RequestOptions) -> Outcome {
        self.request(HttpMethod::Patch, action, options).await
    }

    /// DELETE `action`, with `options.data` as the query string
    pub async fn delete(&self, action: &str, options: RequestOptions) -> Outcome {
        self.request(HttpMethod::Delete, action, options).await
    }
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

// Later inserts replace earlier ones; header names compare case-insensitively.
fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), ServiceError> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ServiceError::InvalidHeader(name.to_string()))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|_| ServiceError::InvalidHeader(format!("{}: {}", name, value)))?;

    headers.insert(header_name, header_value);
    Ok(())
}
