//! Extraction operation reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of an archive extraction operation.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Canonical directory the archive was extracted into.
    pub target_dir: PathBuf,

    /// Number of entries processed.
    pub entries_processed: usize,

    /// Number of files extracted.
    pub files_extracted: usize,

    /// Number of directories created from directory entries.
    pub directories_created: usize,

    /// Total decompressed bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction operation.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates an empty report for `target_dir`.
    #[must_use]
    pub fn new(target_dir: PathBuf) -> Self {
        Self {
            target_dir,
            ..Self::default()
        }
    }

    /// Returns total number of items written.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }
}
