//! Embedded mark store backed by redb.

use std::path::Path;

use async_trait::async_trait;
use kondukt_core::{Error, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::store::{HwmStore, StoredHwm};

const HWM_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("hwm");

fn store_err<E: std::fmt::Display>(error: E) -> Error {
    Error::store(error.to_string())
}

/// A durable mark store in a single embedded database file.
///
/// Values are stored as JSON documents keyed by the mark's qualified
/// name, so the file stays inspectable with standard tooling.
pub struct RedbHwmStore {
    database: Database,
}

impl RedbHwmStore {
    /// Opens (or creates) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let database = Database::create(path).map_err(store_err)?;

        // Create the table up front so first reads see an empty table
        // instead of a missing one.
        let txn = database.begin_write().map_err(store_err)?;
        txn.open_table(HWM_TABLE).map_err(store_err)?;
        txn.commit().map_err(store_err)?;

        Ok(Self { database })
    }
}

impl std::fmt::Debug for RedbHwmStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbHwmStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl HwmStore for RedbHwmStore {
    async fn get(&self, name: &str) -> Result<Option<StoredHwm>> {
        let txn = self.database.begin_read().map_err(store_err)?;
        let table = txn.open_table(HWM_TABLE).map_err(store_err)?;

        let Some(guard) = table.get(name).map_err(store_err)? else {
            tracing::debug!(name, "no stored mark");
            return Ok(None);
        };

        let hwm: StoredHwm = serde_json::from_slice(guard.value())?;
        Ok(Some(hwm))
    }

    async fn save(&self, hwm: &StoredHwm) -> Result<()> {
        let name = hwm.qualified_name();
        let encoded = serde_json::to_vec(hwm)?;

        let txn = self.database.begin_write().map_err(store_err)?;
        {
            let mut table = txn.open_table(HWM_TABLE).map_err(store_err)?;
            table
                .insert(name.as_str(), encoded.as_slice())
                .map_err(store_err)?;
        }
        txn.commit().map_err(store_err)?;

        tracing::debug!(name, "saved mark");
        Ok(())
    }
}
