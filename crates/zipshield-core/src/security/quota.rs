//! Archive-wide entry count and total size limits.

use crate::Result;
use crate::SecurityConfig;
use crate::error::Violation;

/// Validates the number of entries seen so far.
///
/// Fails only once `count` exceeds the maximum, so an archive holding
/// exactly `max_entry_count` entries is accepted.
///
/// # Errors
///
/// Returns `ArchiveError::SecurityViolation` if the count is exceeded.
pub fn validate_entry_count(count: usize, config: &SecurityConfig) -> Result<()> {
    if count > config.max_entry_count {
        return Err(Violation::EntryCount {
            current: count,
            max: config.max_entry_count,
        }
        .into());
    }
    Ok(())
}

/// Validates the cumulative number of decompressed bytes.
///
/// # Errors
///
/// Returns `ArchiveError::SecurityViolation` if `total` exceeds
/// `max_total_size`.
pub fn validate_total_decompressed_size(total: u64, config: &SecurityConfig) -> Result<()> {
    if total > config.max_total_size {
        return Err(Violation::TotalSize {
            current: total,
            max: config.max_total_size,
        }
        .into());
    }
    Ok(())
}
