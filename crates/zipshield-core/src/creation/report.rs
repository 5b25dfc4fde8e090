//! Archive creation operation reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of an archive creation operation.
///
/// # Examples
///
/// ```
/// use zipshield_core::creation::CreationReport;
///
/// let mut report = CreationReport::default();
/// report.add_warning("skipped symlink: link");
/// assert!(report.has_warnings());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreationReport {
    /// Path of the created archive.
    pub archive_path: PathBuf,

    /// Number of file entries added.
    pub files_added: usize,

    /// Number of directory entries added.
    pub directories_added: usize,

    /// Total uncompressed bytes written into the archive.
    pub bytes_written: u64,

    /// Number of source paths skipped (symlinks, special files).
    pub files_skipped: usize,

    /// Duration of the creation operation.
    pub duration: Duration,

    /// Warnings generated during creation.
    pub warnings: Vec<String>,
}

impl CreationReport {
    /// Creates an empty report for `archive_path`.
    #[must_use]
    pub fn new(archive_path: PathBuf) -> Self {
        Self {
            archive_path,
            ..Self::default()
        }
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns total number of entries written.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_is_empty() {
        let report = CreationReport::new(PathBuf::from("out.zip"));
        assert_eq!(report.total_entries(), 0);
        assert!(!report.has_warnings());
        assert_eq!(report.archive_path, PathBuf::from("out.zip"));
    }

    #[test]
    fn test_total_entries() {
        let mut report = CreationReport::default();
        report.files_added = 3;
        report.directories_added = 1;
        assert_eq!(report.total_entries(), 4);
    }
}
