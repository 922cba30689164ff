//! Transfer result accounting.

use std::fmt;
use std::path::PathBuf;

use kondukt_core::RemotePath;

/// A file that could not be transferred, with the failure text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTransfer {
    /// Source path of the failed file
    pub source: RemotePath,

    /// Failure description
    pub error: String,
}

/// Accounting for one transfer run.
///
/// Every file selected for the run lands in exactly one bucket, so
/// `total()` always equals the number of files attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferResult {
    /// Target paths written successfully
    pub successful: Vec<PathBuf>,

    /// Files that failed, with error text
    pub failed: Vec<FailedTransfer>,

    /// Source files skipped because the target existed (`ignore`)
    pub skipped: Vec<RemotePath>,

    /// Requested source files that no longer exist
    pub missing: Vec<RemotePath>,
}

impl TransferResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of files accounted for.
    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len() + self.skipped.len() + self.missing.len()
    }

    /// Returns `true` when nothing failed and nothing went missing.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.missing.is_empty()
    }
}

impl fmt::Display for TransferResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "total: {}, successful: {}, failed: {}, skipped: {}, missing: {}",
            self.total(),
            self.successful.len(),
            self.failed.len(),
            self.skipped.len(),
            self.missing.len()
        )?;

        for path in &self.successful {
            writeln!(f, "  successful: '{}'", path.display())?;
        }
        for failed in &self.failed {
            writeln!(f, "  failed: '{}' ({})", failed.source, failed.error)?;
        }
        for path in &self.skipped {
            writeln!(f, "  skipped: '{path}'")?;
        }
        for path in &self.missing {
            writeln!(f, "  missing: '{path}'")?;
        }
        Ok(())
    }
}
