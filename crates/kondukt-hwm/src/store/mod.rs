//! High-water-mark persistence.

mod memory;
mod redb_store;

use async_trait::async_trait;
use kondukt_core::Result;
use serde::{Deserialize, Serialize};

use crate::column::ColumnHwm;
use crate::file_list::FileListHwm;

pub use memory::MemoryHwmStore;
pub use redb_store::RedbHwmStore;

/// A mark as persisted in a store, keyed by its qualified name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum StoredHwm {
    /// Column high-water mark
    Column(ColumnHwm),

    /// File-list high-water mark
    FileList(FileListHwm),
}

impl StoredHwm {
    /// Returns the store key for this mark.
    pub fn qualified_name(&self) -> String {
        match self {
            StoredHwm::Column(hwm) => hwm.qualified_name(),
            StoredHwm::FileList(hwm) => hwm.qualified_name(),
        }
    }
}

impl From<ColumnHwm> for StoredHwm {
    fn from(hwm: ColumnHwm) -> Self {
        StoredHwm::Column(hwm)
    }
}

impl From<FileListHwm> for StoredHwm {
    fn from(hwm: FileListHwm) -> Self {
        StoredHwm::FileList(hwm)
    }
}

/// Persistence for high-water marks.
///
/// Stores are keyed by the mark's qualified name, which the mark itself
/// provides, so one source cannot clobber another's progress.
#[async_trait]
pub trait HwmStore: Send + Sync {
    /// Loads the mark saved under `name`, if any.
    async fn get(&self, name: &str) -> Result<Option<StoredHwm>>;

    /// Saves `hwm` under its qualified name.
    async fn save(&self, hwm: &StoredHwm) -> Result<()>;
}
