//! Domain-specific configuration modules

pub mod http;
pub mod logging;
pub mod services;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration combining all domains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConduitConfig {
    /// HTTP client configuration
    pub http: http::HttpConfig,

    /// Logging configuration
    pub logging: logging::LoggingConfig,

    /// Remote services keyed by name
    pub services: BTreeMap<String, services::ServiceConfig>,
}

impl ConduitConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.http.validate()?;
        self.logging.validate()?;

        for (_, service) in self.named_services() {
            service.validate()?;
        }

        Ok(())
    }

    /// Service declarations with their names taken from the map keys
    pub fn named_services(&self) -> impl Iterator<Item = (String, services::ServiceConfig)> + '_ {
        self.services
            .iter()
            .map(|(name, service)| (name.clone(), service.clone().with_name(name.clone())))
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let mut config = ConduitConfig::default();
        config.services.insert(
            "users".to_string(),
            services::ServiceConfig::new("users.internal", 443).with_scheme("https"),
        );
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
