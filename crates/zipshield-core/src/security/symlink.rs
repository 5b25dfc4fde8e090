//! Symbolic link entry rejection.

use crate::Result;
use crate::error::Violation;
use crate::types::EntryDescriptor;

/// Rejects entries whose stored Unix mode marks them as symbolic links.
///
/// No link entry is ever materialized, whatever its name or size.
///
/// # Errors
///
/// Returns `ArchiveError::SecurityViolation` for a symlink entry.
pub fn validate_not_symlink(entry: &EntryDescriptor) -> Result<()> {
    if entry.is_symlink() {
        return Err(Violation::SymlinkEntry {
            name: entry.name.clone(),
        }
        .into());
    }
    Ok(())
}
