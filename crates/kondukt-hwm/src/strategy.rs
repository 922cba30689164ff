//! Read strategies for incremental processing.
//!
//! Strategies are plain values passed to readers and transfer engines.
//! There is no ambient "current strategy": callers construct one, run
//! with it, and persist the advanced mark afterwards.

use kondukt_core::{Error, Result};

use crate::column::{ColumnHwm, ColumnSource};
use crate::file_list::{FileListHwm, FileSource};
use crate::store::{HwmStore, StoredHwm};
use crate::value::{HwmOffset, HwmValue};

/// How a read interacts with high-water-mark state.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ReadStrategy {
    /// Read everything; no state is consulted or advanced.
    Snapshot,

    /// Read only rows above the stored mark.
    Incremental {
        /// The mark loaded for this source (possibly empty on first run)
        hwm: ColumnHwm,

        /// Optional overlap window re-reading rows below the mark
        offset: Option<HwmOffset>,
    },
}

impl ReadStrategy {
    /// Loads an incremental strategy for `source` from the store.
    pub async fn incremental(
        store: &dyn HwmStore,
        source: ColumnSource,
        offset: Option<HwmOffset>,
    ) -> Result<Self> {
        let hwm = load_column_hwm(store, source).await?;
        Ok(ReadStrategy::Incremental { hwm, offset })
    }

    /// Returns the exclusive lower bound for the read, if any.
    ///
    /// `None` means an unrestricted read: either a snapshot strategy, or
    /// an incremental strategy before its first successful run.
    pub fn lower_bound(&self) -> Result<Option<HwmValue>> {
        match self {
            ReadStrategy::Snapshot => Ok(None),
            ReadStrategy::Incremental { hwm, offset } => match (&hwm.value, offset) {
                (None, _) => Ok(None),
                (Some(value), None) => Ok(Some(value.clone())),
                (Some(value), Some(offset)) => Ok(Some(value.minus(offset)?)),
            },
        }
    }
}

/// Loads the column mark for `source`, or an empty one.
///
/// A mark stored under the same name but with a different kind is an
/// error: the store returned state this strategy cannot advance.
pub async fn load_column_hwm(store: &dyn HwmStore, source: ColumnSource) -> Result<ColumnHwm> {
    match store.get(&source.qualified_name()).await? {
        None => Ok(ColumnHwm::new(source)),
        Some(StoredHwm::Column(hwm)) => Ok(hwm),
        Some(other) => Err(Error::store(format!(
            "mark '{}' has unexpected kind {:?}",
            source.qualified_name(),
            other
        ))),
    }
}

/// Loads the file-list mark for `source`, or an empty one.
pub async fn load_file_list_hwm(store: &dyn HwmStore, source: FileSource) -> Result<FileListHwm> {
    match store.get(&source.qualified_name()).await? {
        None => Ok(FileListHwm::new(source)),
        Some(StoredHwm::FileList(hwm)) => Ok(hwm),
        Some(other) => Err(Error::store(format!(
            "mark '{}' has unexpected kind {:?}",
            source.qualified_name(),
            other
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryHwmStore;
    use kondukt_core::RemotePath;

    fn source() -> ColumnSource {
        ColumnSource::new("pg://db:5432/app", "public.events", "event_id")
    }

    #[test]
    fn test_snapshot_has_no_lower_bound() {
        assert_eq!(ReadStrategy::Snapshot.lower_bound().unwrap(), None);
    }

    #[tokio::test]
    async fn test_incremental_first_run_has_no_lower_bound() {
        let store = MemoryHwmStore::new();
        let strategy = ReadStrategy::incremental(&store, source(), None).await.unwrap();
        assert_eq!(strategy.lower_bound().unwrap(), None);
    }

    #[tokio::test]
    async fn test_incremental_uses_stored_mark() {
        let store = MemoryHwmStore::new();
        let mut hwm = ColumnHwm::new(source());
        hwm.update(HwmValue::Int(500)).unwrap();
        store.save(&hwm.into()).await.unwrap();

        let strategy = ReadStrategy::incremental(&store, source(), None).await.unwrap();
        assert_eq!(strategy.lower_bound().unwrap(), Some(HwmValue::Int(500)));
    }

    #[tokio::test]
    async fn test_incremental_offset_widens_the_window() {
        let store = MemoryHwmStore::new();
        let mut hwm = ColumnHwm::new(source());
        hwm.update(HwmValue::Int(500)).unwrap();
        store.save(&hwm.into()).await.unwrap();

        let strategy = ReadStrategy::incremental(&store, source(), Some(HwmOffset::Int(100)))
            .await
            .unwrap();
        assert_eq!(strategy.lower_bound().unwrap(), Some(HwmValue::Int(400)));
    }

    #[tokio::test]
    async fn test_mark_kind_mismatch_is_an_error() {
        let store = MemoryHwmStore::new();

        // A column literally named "file_list" on a table named like a
        // directory collides with the file-list key space:
        // both qualify as "file_list#/incoming@localfs://".
        let column_source = ColumnSource::new("localfs://", "/incoming", "file_list");
        let file_source = FileSource::new("localfs://", RemotePath::new("/incoming"));
        assert_eq!(column_source.qualified_name(), file_source.qualified_name());

        let mut conflicting = FileListHwm::new(file_source);
        conflicting.update(RemotePath::new("/incoming/f"));
        store.save(&conflicting.into()).await.unwrap();

        let err = load_column_hwm(&store, column_source).await.unwrap_err();
        assert!(err.to_string().contains("unexpected kind"));
    }
}
