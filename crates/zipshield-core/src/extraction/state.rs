//! Per-extraction accumulated state.

use std::collections::HashSet;
use std::io;

use crate::ArchiveError;
use crate::Result;
use crate::types::DestDir;

/// Mutable state of one extraction call.
///
/// Created at the start of an extraction, passed by `&mut` through the entry
/// loop, and dropped when the call returns. Never shared between
/// extractions.
#[derive(Debug)]
pub struct ExtractionState {
    target_root: DestDir,
    entries_processed: usize,
    total_bytes: u64,
    names_seen: HashSet<String>,
}

impl ExtractionState {
    /// Creates empty state rooted at `target_root`.
    #[must_use]
    pub fn new(target_root: DestDir) -> Self {
        Self {
            target_root,
            entries_processed: 0,
            total_bytes: 0,
            names_seen: HashSet::new(),
        }
    }

    /// Returns the canonical extraction root.
    #[must_use]
    pub const fn target_root(&self) -> &DestDir {
        &self.target_root
    }

    /// Counts one more entry and returns the new count.
    pub fn record_entry(&mut self) -> usize {
        self.entries_processed = self.entries_processed.saturating_add(1);
        self.entries_processed
    }

    /// Number of entries seen so far.
    #[must_use]
    pub const fn entries_processed(&self) -> usize {
        self.entries_processed
    }

    /// Adds decompressed bytes and returns the new running total.
    ///
    /// # Errors
    ///
    /// Returns an error if the total would overflow `u64`.
    pub fn add_bytes(&mut self, bytes: u64) -> Result<u64> {
        self.total_bytes = self
            .total_bytes
            .checked_add(bytes)
            .ok_or_else(|| ArchiveError::Io(io::Error::other("byte count overflow")))?;
        Ok(self.total_bytes)
    }

    /// Total decompressed bytes so far.
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Names of the entries already extracted.
    #[must_use]
    pub const fn names_seen(&self) -> &HashSet<String> {
        &self.names_seen
    }

    /// Records an extracted entry name.
    pub fn insert_name(&mut self, name: String) {
        self.names_seen.insert(name);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state() -> (TempDir, ExtractionState) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("failed to create dest");
        (temp, ExtractionState::new(dest))
    }

    #[test]
    fn test_counters_start_empty() {
        let (_temp, state) = state();
        assert_eq!(state.entries_processed(), 0);
        assert_eq!(state.total_bytes(), 0);
        assert!(state.names_seen().is_empty());
    }

    #[test]
    fn test_record_entry_increments() {
        let (_temp, mut state) = state();
        assert_eq!(state.record_entry(), 1);
        assert_eq!(state.record_entry(), 2);
        assert_eq!(state.entries_processed(), 2);
    }

    #[test]
    fn test_add_bytes_monotonic() {
        let (_temp, mut state) = state();
        assert_eq!(state.add_bytes(10).unwrap(), 10);
        assert_eq!(state.add_bytes(0).unwrap(), 10);
        assert_eq!(state.add_bytes(5).unwrap(), 15);
    }

    #[test]
    fn test_add_bytes_overflow() {
        let (_temp, mut state) = state();
        state.add_bytes(u64::MAX).unwrap();
        assert!(state.add_bytes(1).is_err());
        assert_eq!(state.total_bytes(), u64::MAX);
    }

    #[test]
    fn test_names_seen() {
        let (_temp, mut state) = state();
        state.insert_name("a.txt".to_string());
        assert!(state.names_seen().contains("a.txt"));
    }
}
