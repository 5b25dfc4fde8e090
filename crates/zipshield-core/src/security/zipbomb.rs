//! Zip bomb detection from declared and actual entry sizes.

use crate::Result;
use crate::SecurityConfig;
use crate::error::Violation;
use crate::types::EntryDescriptor;

/// Validates the declared size and compression ratio of an entry.
///
/// An unknown declared size is rejected outright: it is never trusted for
/// any decision. Values exactly at a limit pass.
///
/// # Errors
///
/// Returns `ArchiveError::SecurityViolation` for an unknown size, a size
/// above `max_entry_size`, or a ratio above `max_compression_ratio`.
///
/// # Examples
///
/// ```
/// use zipshield_core::SecurityConfig;
/// use zipshield_core::security::validate_entry_size;
/// use zipshield_core::types::EntryDescriptor;
///
/// let config = SecurityConfig::default();
/// assert!(validate_entry_size(&EntryDescriptor::file("a", Some(10_000), 1_000), &config).is_ok());
/// assert!(validate_entry_size(&EntryDescriptor::file("a", None, 1_000), &config).is_err());
/// ```
pub fn validate_entry_size(entry: &EntryDescriptor, config: &SecurityConfig) -> Result<()> {
    let Some(uncompressed) = entry.declared_size else {
        return Err(Violation::UnknownSize {
            name: entry.name.clone(),
        }
        .into());
    };

    if uncompressed > config.max_entry_size {
        return Err(Violation::EntrySize {
            name: entry.name.clone(),
            size: uncompressed,
            max: config.max_entry_size,
        }
        .into());
    }

    validate_compression_ratio(&entry.name, entry.compressed_size, uncompressed, config)
}

/// Validates the declared compression ratio of one entry.
///
/// A zero compressed size carries no ratio information and passes.
///
/// # Errors
///
/// Returns `ArchiveError::SecurityViolation` if the ratio exceeds the
/// configured maximum.
pub fn validate_compression_ratio(
    name: &str,
    compressed_size: u64,
    uncompressed_size: u64,
    config: &SecurityConfig,
) -> Result<()> {
    if compressed_size == 0 {
        return Ok(());
    }

    let ratio = uncompressed_size as f64 / compressed_size as f64;

    if ratio > config.max_compression_ratio {
        return Err(Violation::CompressionRatio {
            name: name.to_string(),
            compressed: compressed_size,
            uncompressed: uncompressed_size,
            ratio,
        }
        .into());
    }

    Ok(())
}

/// Validates the number of bytes actually written for one entry so far.
///
/// Called after every streamed chunk: a crafted archive can under-declare
/// its size while the compressed stream expands far beyond it.
///
/// # Errors
///
/// Returns `ArchiveError::SecurityViolation` if `written` exceeds
/// `max_entry_size`.
pub fn validate_actual_extracted_size(
    written: u64,
    name: &str,
    config: &SecurityConfig,
) -> Result<()> {
    if written > config.max_entry_size {
        return Err(Violation::EntrySize {
            name: name.to_string(),
            size: written,
            max: config.max_entry_size,
        }
        .into());
    }
    Ok(())
}
