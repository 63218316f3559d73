//! HTTP client for sibling services
//!
//! A [`ServiceClient`] wraps one remote service (host, port, scheme and default
//! headers) and exposes one method per HTTP verb. Read-style verbs (GET, HEAD,
//! DELETE) encode caller data as a query string; write-style verbs (POST, PUT,
//! PATCH) send it as a JSON body. Every call settles into a single
//! [`Outcome`], optionally reported to a callback as well.

pub mod client;
pub mod errors;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export main types for convenience
pub use client::ServiceClient;
pub use errors::{ServiceError, TransportError, LOCAL_FAILURE_STATUS};
pub use query::encode_query;
pub use request::{Callback, RequestDescriptor, RequestOptions};
pub use response::{normalize_response, Outcome, RawResponse, ResponseBody, ServiceResponse};
pub use transport::{HttpTransport, RawReply, ReqwestTransport};
pub use types::{HttpMethod, HttpMethodError, Scheme, SchemeError};

pub use conduit_config::{HttpConfig, ServiceConfig};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
