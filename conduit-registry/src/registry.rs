use conduit_config::{ConduitConfig, HttpConfig, ServiceConfig};
use conduit_http::{HttpTransport, ServiceClient, ServiceError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, Result};

/// Service clients keyed by service name.
///
/// The host application builds one registry at startup and hands it (or an
/// `Arc` of it) to whatever needs to call other services.
pub struct ServiceRegistry {
    services: RwLock<HashMap<String, Arc<ServiceClient>>>,
    http: HttpConfig,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::with_http_config(HttpConfig::default())
    }

    /// Registry whose clients use the given HTTP settings
    pub fn with_http_config(http: HttpConfig) -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            http,
            transport: None,
        }
    }

    /// Registry whose clients all share one transport
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            http: HttpConfig::default(),
            transport: Some(transport),
        }
    }

    /// Build a registry holding every service declared in `config`
    pub async fn from_config(config: &ConduitConfig) -> Result<Self> {
        config.validate_all()?;

        let registry = Self::with_http_config(config.http.clone());
        registry.configure(config.named_services()).await?;
        Ok(registry)
    }

    /// Register one client per declared service.
    ///
    /// Each entry takes its map key as its name. Only the `http` and `https`
    /// service types are accepted; a missing type means `https`. The batch is
    /// all-or-nothing: every entry is checked and every client built before
    /// any is registered, and the first failure leaves the registry
    /// untouched. Names already present are replaced. Returns the number of
    /// services registered.
    pub async fn configure<I>(&self, services: I) -> Result<usize>
    where
        I: IntoIterator<Item = (String, ServiceConfig)>,
    {
        let http = self.http.clone();
        self.configure_with_http(services, &http).await
    }

    /// Like [`configure`](Self::configure), but the clients of this batch are
    /// built with `http` instead of the registry's own HTTP settings. A
    /// registry created with a shared transport keeps using that transport.
    pub async fn configure_with_http<I>(&self, services: I, http: &HttpConfig) -> Result<usize>
    where
        I: IntoIterator<Item = (String, ServiceConfig)>,
    {
        let mut clients = Vec::new();

        for (name, config) in services {
            let config = config.with_name(name.clone());

            if !config.has_supported_kind() {
                warn!(
                    "Rejecting service configuration: {} has unsupported type {}",
                    name,
                    config.kind()
                );
                return Err(RegistryError::UnsupportedServiceType {
                    kind: config.kind().to_string(),
                    name,
                });
            }

            let client = self
                .build_client(config, http)
                .map_err(|source| RegistryError::Client {
                    name: name.clone(),
                    source,
                })?;
            clients.push((name, Arc::new(client)));
        }

        let count = clients.len();
        let mut registered = self.services.write().await;
        for (name, client) in clients {
            if registered.insert(name.clone(), client).is_some() {
                info!("Replaced service {} in registry", name);
            } else {
                info!("Added service {} to registry", name);
            }
        }

        Ok(count)
    }

    fn build_client(
        &self,
        config: ServiceConfig,
        http: &HttpConfig,
    ) -> std::result::Result<ServiceClient, ServiceError> {
        match &self.transport {
            Some(transport) => Ok(ServiceClient::with_transport(config, transport.clone())),
            None => ServiceClient::with_http_config(config, http),
        }
    }

    /// The client registered under `name`
    pub async fn get(&self, name: &str) -> Option<Arc<ServiceClient>> {
        let services = self.services.read().await;
        let client = services.get(name).cloned();
        if client.is_none() {
            debug!("Service {} not found in registry", name);
        }
        client
    }

    /// Every registered client by name. The map is a snapshot; the clients
    /// are the shared instances.
    pub async fn all(&self) -> HashMap<String, Arc<ServiceClient>> {
        self.services.read().await.clone()
    }

    /// Registered service names, sorted
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.services.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.services.read().await.is_empty()
    }

    pub async fn remove(&self, name: &str) -> Option<Arc<ServiceClient>> {
        let removed = self.services.write().await.remove(name);
        if removed.is_some() {
            info!("Removed service {} from registry", name);
        } else {
            warn!("Service {} not found in registry", name);
        }
        removed
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("http", &self.http)
            .field("shared_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}
