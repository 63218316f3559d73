//! Transport seam between request building and the network

use crate::errors::{ServiceError, TransportError};
use crate::request::RequestDescriptor;
use conduit_config::HttpConfig;
use reqwest::{redirect, Client};
use serde_json::Value as JsonValue;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// A complete reply: status, lower-case headers, and the body read to the end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RawReply {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    /// Reply with a JSON body and matching content type
    pub fn json(status: u16, body: &JsonValue) -> Self {
        Self::new(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Sends one request and waits for its complete reply
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawReply, TransportError>;
}

/// Network transport backed by reqwest.
///
/// Redirects are not followed and idle connections are not kept for reuse.
/// There is no request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, ServiceError> {
        debug!("Creating HTTP transport with user agent {}", config.user_agent);
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(redirect::Policy::none())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| ServiceError::ClientInit(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawReply, TransportError> {
        let url = request.url();

        let mut builder = self
            .client
            .request(reqwest::Method::from(request.method), &url)
            .headers(request.headers.clone());

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let mut response = builder.send().await?;
        let status = response.status().as_u16();

        // Repeated headers are folded into one comma-separated value
        let mut headers: HashMap<String, String> = HashMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            match headers.entry(name.as_str().to_string()) {
                Entry::Occupied(mut existing) => {
                    let existing = existing.get_mut();
                    existing.push_str(", ");
                    existing.push_str(&value);
                }
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }

        let mut buffer = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            buffer.extend_from_slice(&chunk);
        }
        debug!("Read {} byte response body from {}", buffer.len(), url);

        Ok(RawReply {
            status,
            headers,
            body: String::from_utf8_lossy(&buffer).into_owned(),
        })
    }
}
