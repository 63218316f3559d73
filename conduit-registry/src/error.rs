use conduit_http::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Service type not covered: '{kind}' (service '{name}')")]
    UnsupportedServiceType { name: String, kind: String },

    #[error("Failed to create client for service '{name}': {source}")]
    Client {
        name: String,
        #[source]
        source: ServiceError,
    },

    #[error("Configuration error: {0}")]
    Configuration(#[from] conduit_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
