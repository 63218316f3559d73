//! Service call error types

use crate::response::{RawResponse, ResponseBody};
use serde_json::{json, Value as JsonValue};

/// Status reported for failures that happen on this side of the wire
pub const LOCAL_FAILURE_STATUS: u16 = 500;

/// Why a request never produced a response
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Error outcome of a service call
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Host, port or action missing; raised before any I/O
    #[error("{message}")]
    Config { code: u16, message: String },

    /// The service answered with a status other than 200
    #[error("Service responded with status {}", .raw.status)]
    Status { body: ResponseBody, raw: RawResponse },

    /// The response declared JSON but its body did not parse
    #[error("Failed to parse response: {message}")]
    Parse {
        status: u16,
        message: String,
        raw: RawResponse,
    },

    /// The connection failed or broke before the response completed
    #[error("Transport error: {error}")]
    Transport {
        status: u16,
        #[source]
        error: TransportError,
    },

    #[error("Failed to build HTTP client: {0}")]
    ClientInit(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl ServiceError {
    pub(crate) fn config(message: &str) -> Self {
        ServiceError::Config {
            code: LOCAL_FAILURE_STATUS,
            message: message.to_string(),
        }
    }

    pub(crate) fn transport(error: TransportError) -> Self {
        ServiceError::Transport {
            status: LOCAL_FAILURE_STATUS,
            error,
        }
    }

    /// Status of the failure: the response status for [`ServiceError::Status`], 500 otherwise
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::Config { code, .. } => *code,
            ServiceError::Status { raw, .. } => raw.status,
            ServiceError::Parse { status, .. } | ServiceError::Transport { status, .. } => *status,
            ServiceError::ClientInit(_) | ServiceError::InvalidHeader(_) => LOCAL_FAILURE_STATUS,
        }
    }

    /// The response metadata, when a response was received
    pub fn raw(&self) -> Option<&RawResponse> {
        match self {
            ServiceError::Status { raw, .. } | ServiceError::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// The error payload in its wire-compatible shape.
    ///
    /// A non-200 response yields its own body; local failures yield
    /// `{"type": 500, "message": ..}` (configuration), `{"status": 500, "message": ..}`
    /// (parse and setup) or `{"status": 500, "error": ..}` (transport).
    pub fn to_json(&self) -> JsonValue {
        match self {
            ServiceError::Config { code, message } => json!({ "type": code, "message": message }),
            ServiceError::Status { body, .. } => body.to_json(),
            ServiceError::Parse {
                status, message, ..
            } => json!({ "status": status, "message": message }),
            ServiceError::Transport { status, error } => {
                json!({ "status": status, "error": error.to_string() })
            }
            ServiceError::ClientInit(_) | ServiceError::InvalidHeader(_) => {
                json!({ "status": LOCAL_FAILURE_STATUS, "message": self.to_string() })
            }
        }
    }
}
