//! Shared server state.

use std::sync::Arc;

use exthub_core::RegistryStore;
use exthub_dispatch::{Aggregator, ExtensionClient};

/// State shared by every handler.
#[derive(Clone)]
pub struct ServerState {
    /// The extension registry.
    pub registry: Arc<dyn RegistryStore>,
    /// HTTP client for the extension protocol.
    pub client: Arc<ExtensionClient>,
    /// Fan-out scans across all registered extensions.
    pub aggregator: Arc<Aggregator>,
    /// Admin credential for registry writes. Writes are rejected while
    /// unset.
    pub api_key: Option<String>,
}

impl ServerState {
    /// Create server state over a registry and dispatch client.
    pub fn new(
        registry: Arc<dyn RegistryStore>,
        client: Arc<ExtensionClient>,
        api_key: Option<String>,
    ) -> Self {
        let aggregator = Arc::new(Aggregator::new(client.clone(), registry.clone()));
        Self {
            registry,
            client,
            aggregator,
            api_key,
        }
    }
}
