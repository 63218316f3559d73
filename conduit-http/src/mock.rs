//! In-memory transport for tests

use crate::errors::TransportError;
use crate::request::RequestDescriptor;
use crate::transport::{HttpTransport, RawReply};
use crate::types::HttpMethod;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Transport that answers from canned replies and records what it was sent.
///
/// Replies are keyed `"METHOD:URL"`. A reply registered without a query string
/// also answers requests to the same path with one. Unmatched requests fail
/// as transport errors.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, RawReply>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the reply for `method` on `url`
    pub fn add_reply(&self, method: HttpMethod, url: &str, reply: RawReply) {
        let key = format!("{}:{}", method.as_str(), url);
        debug!("Added mock reply for {}", key);
        lock(&self.replies).insert(key, reply);
    }

    /// Every request sent so far, oldest first
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        lock(&self.requests).clone()
    }

    pub fn clear(&self) {
        lock(&self.replies).clear();
        lock(&self.requests).clear();
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawReply, TransportError> {
        lock(&self.requests).push(request.clone());

        let url = request.url();
        let key = format!("{}:{}", request.method.as_str(), url);
        let replies = lock(&self.replies);

        if let Some(reply) = replies.get(&key) {
            return Ok(reply.clone());
        }

        if let Some((without_query, _)) = key.split_once('?') {
            if let Some(reply) = replies.get(without_query) {
                debug!("Matched mock reply for {} without its query", key);
                return Ok(reply.clone());
            }
        }

        Err(TransportError::Other(format!(
            "No mock reply available for {}",
            key
        )))
    }
}

// A panicking test thread must not hide the recorded state from others
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scheme;
    use reqwest::header::HeaderMap;

    fn request(method: HttpMethod, path: &str) -> RequestDescriptor {
        RequestDescriptor {
            scheme: Scheme::Http,
            host: "svc".to_string(),
            port: 80,
            path: path.to_string(),
            method,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_mock_matches_method_and_url() {
        let transport = MockTransport::new();
        transport.add_reply(
            HttpMethod::Get,
            "http://svc:80/ping",
            RawReply::new(200).with_body("pong"),
        );

        let reply = transport.send(&request(HttpMethod::Get, "/ping")).await.unwrap();
        assert_eq!(reply.body, "pong");

        assert!(transport.send(&request(HttpMethod::Post, "/ping")).await.is_err());
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_ignores_query_when_registered_without_one() {
        let transport = MockTransport::new();
        transport.add_reply(HttpMethod::Get, "http://svc:80/items", RawReply::new(200));

        let reply = transport.send(&request(HttpMethod::Get, "/items?page=2")).await;
        assert!(reply.is_ok());

        transport.clear();
        assert!(transport.requests().is_empty());
        assert!(transport.send(&request(HttpMethod::Get, "/items")).await.is_err());
    }
}
