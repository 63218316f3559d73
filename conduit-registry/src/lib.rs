pub mod error;
pub mod registry;

// Re-export main types
pub use error::{RegistryError, Result};
pub use registry::ServiceRegistry;

pub mod prelude {
    pub use crate::{RegistryError, Result, ServiceRegistry};
    pub use conduit_config::ServiceConfig;
    pub use conduit_http::{RequestOptions, ServiceClient};
}
