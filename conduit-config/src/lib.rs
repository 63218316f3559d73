//! Domain-driven configuration for conduit service clients
//!
//! Configuration is split by functional domain (services, http, logging),
//! with validation, defaults, and environment variable overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    http::HttpConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    services::{ServiceConfig, DEFAULT_SCHEME, SUPPORTED_SCHEMES},
    ConduitConfig,
};
