//! Fan-out aggregation across every registered extension.
//!
//! Both scans fan one probe out per registry record, concurrently, and
//! wait for all of them to settle rather than failing fast. Each
//! probe's result lands in its own output slot keyed by extension name,
//! so there is no shared mutable state between probes and no entry is
//! ever dropped because a sibling failed.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use exthub_core::{Capability, RegistryStore, Result};

use crate::client::ExtensionClient;

/// Well-known opt-in action name for the cross-extension due-item scan.
/// Extensions participate by advertising it in `/capabilities`.
pub const REMINDERS_ACTION: &str = "get_reminders";

/// Per-extension outcome of a capability scan.
///
/// Unreachable extensions are marked, not omitted, so callers can
/// render a liveness indicator per extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CapabilityProbe {
    /// Extension answered with a valid capability list (possibly empty).
    Online { capabilities: Vec<Capability> },
    /// Transport failure, timeout, error status, or malformed body.
    Unreachable { error: String },
}

/// One item merged out of a due-item scan.
///
/// The payload shape is extension-defined; well-known display fields
/// are read by lookup with a placeholder for anything absent, since
/// different extensions populate different subsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueItem {
    /// Name of the extension that produced the item.
    pub extension: String,
    /// The item as the extension returned it.
    pub record: Value,
}

impl DueItem {
    /// Placeholder rendered for absent display fields.
    pub const PLACEHOLDER: &'static str = "?";

    /// Read a well-known display field, defaulting to the placeholder.
    /// Non-string scalars render as their JSON text.
    pub fn field(&self, name: &str) -> String {
        match self.record.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar.to_string(),
            _ => Self::PLACEHOLDER.to_string(),
        }
    }

    /// Optional link for the item, when the extension provided one.
    pub fn link(&self) -> Option<&str> {
        self.record.get("url").and_then(Value::as_str)
    }
}

/// Composes dispatch calls across all registered extensions.
pub struct Aggregator {
    client: Arc<ExtensionClient>,
    registry: Arc<dyn RegistryStore>,
}

impl Aggregator {
    /// Create an aggregator over a registry and dispatch client.
    pub fn new(client: Arc<ExtensionClient>, registry: Arc<dyn RegistryStore>) -> Self {
        Self { client, registry }
    }

    /// Probe every registered extension for its live capability list.
    ///
    /// Returns exactly one entry per registry record regardless of how
    /// many extensions are unreachable. Probes run concurrently, so the
    /// scan completes within roughly one probe timeout rather than the
    /// sum of them. Output ordering is not significant.
    pub async fn list_all_capabilities(&self) -> Result<HashMap<String, CapabilityProbe>> {
        let records = self.registry.list().await?;
        debug!(count = records.len(), "scanning extension capabilities");

        let probes = records.into_iter().map(|record| {
            let client = self.client.clone();
            async move {
                let probe = match client.fetch_capabilities(&record.url).await {
                    Ok(capabilities) => CapabilityProbe::Online { capabilities },
                    Err(e) => CapabilityProbe::Unreachable {
                        error: e.to_string(),
                    },
                };
                (record.name, probe)
            }
        });

        Ok(join_all(probes).await.into_iter().collect())
    }

    /// Scan every registered extension for due items.
    ///
    /// Participation is opt-in by advertising [`REMINDERS_ACTION`] in
    /// `/capabilities`; participating extensions are invoked with empty
    /// parameters and successful `data` arrays are concatenated flat,
    /// preserving each extension's own item ordering. Failed and
    /// non-participating extensions contribute nothing, silently.
    pub async fn collect_due_items(&self) -> Result<Vec<DueItem>> {
        let records = self.registry.list().await?;

        let scans = records.into_iter().map(|record| {
            let client = self.client.clone();
            async move {
                let capabilities = client.fetch_capabilities(&record.url).await.ok()?;
                if !capabilities.iter().any(|c| c.name == REMINDERS_ACTION) {
                    return None;
                }

                let result = client
                    .execute(&record.url, REMINDERS_ACTION, Map::new())
                    .await;
                if !result.success {
                    debug!(extension = record.name, "due-item scan failed, skipping");
                    return None;
                }

                match result.data {
                    Some(Value::Array(items)) => Some(
                        items
                            .into_iter()
                            .map(|item| DueItem {
                                extension: record.name.clone(),
                                record: item,
                            })
                            .collect::<Vec<_>>(),
                    ),
                    _ => None,
                }
            }
        });

        Ok(join_all(scans).await.into_iter().flatten().flatten().collect())
    }
}
