//! redb-backed extension registry.
//!
//! Records are serialized as JSON into a single table keyed by
//! extension name, so the uniqueness invariant is the table key itself.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};
use tracing::info;

use exthub_core::{ExtensionRecord, HubError, RegistryStore};

use crate::error::Result;

// Extensions table: key = extension name, value = ExtensionRecord (JSON)
const EXTENSIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("extensions");

/// Persistent extension registry.
pub struct RedbRegistry {
    db: Arc<Database>,
}

impl RedbRegistry {
    /// Open (or create) a registry database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = if path.exists() {
            Database::open(path)?
        } else {
            Database::create(path)?
        };

        let registry = Self { db: Arc::new(db) };
        registry.ensure_tables()?;
        info!(path = %path.display(), "registry database ready");
        Ok(registry)
    }

    /// Ensure required tables exist.
    fn ensure_tables(&self) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(EXTENSIONS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ExtensionRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EXTENSIONS_TABLE)?;

        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, data) = entry?;
            let record: ExtensionRecord = serde_json::from_slice(data.value())?;
            records.push(record);
        }
        Ok(records)
    }

    fn load(&self, name: &str) -> Result<Option<ExtensionRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EXTENSIONS_TABLE)?;

        match table.get(name)? {
            Some(data) => Ok(Some(serde_json::from_slice(data.value())?)),
            None => Ok(None),
        }
    }

    fn save_new(&self, record: &ExtensionRecord) -> Result<bool> {
        let value = serde_json::to_vec(record)?;
        let write_txn = self.db.begin_write()?;
        let inserted = {
            let mut table = write_txn.open_table(EXTENSIONS_TABLE)?;
            if table.get(record.name.as_str())?.is_some() {
                false
            } else {
                table.insert(record.name.as_str(), value.as_slice())?;
                true
            }
        };
        write_txn.commit()?;
        Ok(inserted)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(EXTENSIONS_TABLE)?;
            // Bind before the block ends so the removed value's access
            // guard drops ahead of the table it borrows.
            let removed = table.remove(name)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(existed)
    }
}

#[async_trait]
impl RegistryStore for RedbRegistry {
    async fn list(&self) -> exthub_core::Result<Vec<ExtensionRecord>> {
        // redb iterates keys in order, so the listing is already
        // name-sorted.
        Ok(self.load_all().map_err(HubError::from)?)
    }

    async fn get(&self, name: &str) -> exthub_core::Result<Option<ExtensionRecord>> {
        Ok(self.load(name).map_err(HubError::from)?)
    }

    async fn insert(&self, record: ExtensionRecord) -> exthub_core::Result<()> {
        record.validate()?;
        let inserted = self.save_new(&record).map_err(HubError::from)?;
        if !inserted {
            return Err(HubError::DuplicateName(record.name));
        }
        Ok(())
    }

    async fn remove(&self, name: &str) -> exthub_core::Result<bool> {
        Ok(self.delete(name).map_err(HubError::from)?)
    }
}
