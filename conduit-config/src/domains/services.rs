//! Remote service declarations

use crate::error::ConfigResult;
use crate::validation::{
    validate_enum_choice, validate_header_name, validate_header_value, validate_positive,
    validate_required_string, Validatable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scheme used when a service does not declare one
pub const DEFAULT_SCHEME: &str = "https";

/// Service types that map onto an HTTP client
pub const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// Connection settings for one remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name, assigned from the registry key
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Host name or address of the service
    pub host: String,

    /// TCP port of the service
    pub port: u16,

    /// Connection scheme (`http` or `https`). Declared as `type` in configuration files.
    #[serde(
        default,
        rename = "type",
        alias = "scheme",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheme: Option<String>,

    /// Headers sent with every request unless the call overrides them
    #[serde(
        default = "default_headers",
        rename = "headers",
        alias = "default_headers"
    )]
    pub default_headers: BTreeMap<String, String>,
}

impl ServiceConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            name: String::new(),
            host: host.into(),
            port,
            scheme: None,
            default_headers: default_headers(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Add or replace a default header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Replace the whole default header set
    pub fn with_default_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.default_headers = headers;
        self
    }

    /// Declared service type, `https` when absent
    pub fn kind(&self) -> &str {
        self.scheme.as_deref().unwrap_or(DEFAULT_SCHEME)
    }

    /// Whether the declared type is one this crate can build a client for
    pub fn has_supported_kind(&self) -> bool {
        SUPPORTED_SCHEMES.contains(&self.kind())
    }
}

impl Validatable for ServiceConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.host, "host", self.domain_name())
            .map_err(|_| self.validation_error(format!("service '{}': host required", self.name)))?;

        validate_positive(self.port, "port", self.domain_name())
            .map_err(|_| self.validation_error(format!("service '{}': port required", self.name)))?;

        validate_enum_choice(self.kind(), &SUPPORTED_SCHEMES, "type", self.domain_name())?;

        for (name, value) in &self.default_headers {
            validate_header_name(name, self.domain_name())?;
            validate_header_value(name, value, self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "services"
    }
}

pub fn default_headers() -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_defaults() {
        let config = ServiceConfig::new("users.internal", 8443);
        assert_eq!(config.kind(), "https");
        assert!(config.has_supported_kind());
        assert_eq!(
            config.default_headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_service_config_from_yaml() {
        let yaml = r#"
host: billing
port: 8080
type: http
headers:
  X-Api-Key: secret
"#;
        let config: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.host, "billing");
        assert_eq!(config.port, 8080);
        assert_eq!(config.kind(), "http");
        // An explicit header set replaces the default one
        assert_eq!(config.default_headers.len(), 1);
        assert!(config.default_headers.contains_key("X-Api-Key"));
    }

    #[test]
    fn test_service_config_scheme_alias() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"host":"h","port":1,"scheme":"http"}"#).unwrap();
        assert_eq!(config.scheme.as_deref(), Some("http"));
    }

    #[test]
    fn test_service_config_requires_host_and_port_keys() {
        assert!(serde_yaml::from_str::<ServiceConfig>("port: 80").is_err());
        assert!(serde_yaml::from_str::<ServiceConfig>("host: h").is_err());
    }

    #[test]
    fn test_service_config_validation() {
        let config = ServiceConfig::new("h", 1).with_name("svc");
        assert!(config.validate().is_ok());

        assert!(ServiceConfig::new("", 1).validate().is_err());
        assert!(ServiceConfig::new("h", 0).validate().is_err());
        assert!(ServiceConfig::new("h", 1).with_scheme("rpc").validate().is_err());
        assert!(ServiceConfig::new("h", 1).with_scheme("HTTP").validate().is_err());
        assert!(ServiceConfig::new("h", 1)
            .with_header("Bad Header", "x")
            .validate()
            .is_err());
    }
}
