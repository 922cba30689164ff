//! In-memory mark store for tests and single-run pipelines.

use std::collections::HashMap;

use async_trait::async_trait;
use kondukt_core::Result;
use tokio::sync::Mutex;

use crate::store::{HwmStore, StoredHwm};

/// A process-local mark store.
///
/// Marks saved here do not survive the process; production pipelines use
/// [`crate::RedbHwmStore`].
#[derive(Debug, Default)]
pub struct MemoryHwmStore {
    marks: Mutex<HashMap<String, StoredHwm>>,
}

impl MemoryHwmStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HwmStore for MemoryHwmStore {
    async fn get(&self, name: &str) -> Result<Option<StoredHwm>> {
        let marks = self.marks.lock().await;
        Ok(marks.get(name).cloned())
    }

    async fn save(&self, hwm: &StoredHwm) -> Result<()> {
        let mut marks = self.marks.lock().await;
        marks.insert(hwm.qualified_name(), hwm.clone());
        Ok(())
    }
}
