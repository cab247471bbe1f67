//! Registry records and the store boundary.
//!
//! The registry is an opaque name-keyed store of extension records.
//! The hub never caches anything derived from it: capabilities are
//! fetched live on every query, so a record going stale only ever means
//! the extension shows up as unreachable.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{HubError, Result};
use crate::protocol::ExtensionInfo;

/// A registered extension.
///
/// Records are immutable once created; re-registration under the same
/// name is rejected, and removal plus registration yields a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    /// Unique human-chosen identifier (primary key in the registry).
    pub name: String,
    /// Base URL; protocol endpoints are resolved relative to it.
    /// Stored without a trailing slash.
    pub url: String,
    /// Registrar-supplied description.
    #[serde(default)]
    pub description: String,
    /// Display title captured from `/info` at registration time.
    pub title: String,
    /// Version captured from `/info` at registration time.
    pub version: String,
    /// Author captured from `/info`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Icon URL captured from `/info`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Homepage URL captured from `/info`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
    /// Immutable creation timestamp.
    pub registered_at: DateTime<Utc>,
}

impl ExtensionRecord {
    /// Create a record from registration input and the `/info` payload
    /// fetched during the preview step.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        info: ExtensionInfo,
    ) -> Self {
        let url = url.into();
        Self {
            name: name.into(),
            url: url.trim_end_matches('/').to_string(),
            description: description.into(),
            title: info.title,
            version: info.version,
            author: info.author,
            icon_url: info.icon_url,
            homepage_url: info.homepage_url,
            registered_at: Utc::now(),
        }
    }

    /// Validate the record.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(HubError::InvalidName("name cannot be empty".to_string()));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(HubError::InvalidUrl(format!(
                "'{}' is not an absolute http(s) URL",
                self.url
            )));
        }
        Ok(())
    }
}

/// Store boundary for the extension registry.
///
/// Persistence design is delegated to implementations; the hub only
/// relies on name uniqueness and name-sorted listing.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// List all records, sorted by name.
    async fn list(&self) -> Result<Vec<ExtensionRecord>>;

    /// Get one record by name.
    async fn get(&self, name: &str) -> Result<Option<ExtensionRecord>>;

    /// Insert a new record. Fails with [`HubError::DuplicateName`] when
    /// the name is already registered.
    async fn insert(&self, record: ExtensionRecord) -> Result<()>;

    /// Remove a record by name. Returns whether it existed.
    async fn remove(&self, name: &str) -> Result<bool>;
}

/// In-memory registry for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryRegistry {
    records: RwLock<HashMap<String, ExtensionRecord>>,
}

impl MemoryRegistry {
    /// Create an empty in-memory registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistryStore for MemoryRegistry {
    async fn list(&self) -> Result<Vec<ExtensionRecord>> {
        let mut records: Vec<ExtensionRecord> =
            self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    async fn get(&self, name: &str) -> Result<Option<ExtensionRecord>> {
        Ok(self.records.read().await.get(name).cloned())
    }

    async fn insert(&self, record: ExtensionRecord) -> Result<()> {
        record.validate()?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.name) {
            return Err(HubError::DuplicateName(record.name));
        }
        records.insert(record.name.clone(), record);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool> {
        Ok(self.records.write().await.remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> ExtensionInfo {
        ExtensionInfo {
            title: "Expense Tracker".to_string(),
            description: "Track expenses".to_string(),
            version: "1.0.0".to_string(),
            author: Some("Jo".to_string()),
            icon_url: None,
            homepage_url: None,
        }
    }

    #[test]
    fn test_record_strips_trailing_slash() {
        let record = ExtensionRecord::new(
            "expenses",
            "https://expenses.example.com/",
            "",
            sample_info(),
        );
        assert_eq!(record.url, "https://expenses.example.com");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_record_rejects_relative_url() {
        let record = ExtensionRecord::new("expenses", "expenses.example.com", "", sample_info());
        assert!(matches!(record.validate(), Err(HubError::InvalidUrl(_))));
    }

    #[test]
    fn test_record_rejects_empty_name() {
        let record = ExtensionRecord::new("", "http://x.example.com", "", sample_info());
        assert!(matches!(record.validate(), Err(HubError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_memory_registry_round_trip() {
        let registry = MemoryRegistry::new();
        let record = ExtensionRecord::new("b-ext", "http://b.example.com", "", sample_info());
        registry.insert(record.clone()).await.unwrap();
        registry
            .insert(ExtensionRecord::new(
                "a-ext",
                "http://a.example.com",
                "",
                sample_info(),
            ))
            .await
            .unwrap();

        let listed = registry.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        // Sorted by name.
        assert_eq!(listed[0].name, "a-ext");
        assert_eq!(listed[1].name, "b-ext");

        assert_eq!(registry.get("b-ext").await.unwrap(), Some(record));
        assert!(registry.remove("b-ext").await.unwrap());
        assert!(!registry.remove("b-ext").await.unwrap());
        assert_eq!(registry.get("b-ext").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_registry_rejects_duplicates() {
        let registry = MemoryRegistry::new();
        let record = ExtensionRecord::new("dup", "http://dup.example.com", "", sample_info());
        registry.insert(record.clone()).await.unwrap();

        let err = registry.insert(record).await.unwrap_err();
        assert!(matches!(err, HubError::DuplicateName(name) if name == "dup"));
    }
}
