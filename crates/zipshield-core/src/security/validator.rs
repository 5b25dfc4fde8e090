//! Entry validation facade.
//!
//! `EntryValidator` bundles the stateless entry checks with the limits they
//! are evaluated against. It holds no mutable state: everything accumulated
//! during an extraction lives in `ExtractionState`, which the caller threads
//! through explicitly.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::SecurityConfig;
use crate::security::name;
use crate::security::path;
use crate::security::quota;
use crate::security::symlink;
use crate::security::zipbomb;
use crate::types::EntryDescriptor;

/// Stateless validator for archive entries.
///
/// # Examples
///
/// ```
/// use zipshield_core::SecurityConfig;
/// use zipshield_core::security::EntryValidator;
/// use zipshield_core::types::EntryDescriptor;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SecurityConfig::default();
/// let validator = EntryValidator::new(&config);
///
/// let entry = EntryDescriptor::file("docs/readme.txt", Some(1024), 512);
/// let name = validator.validate_entry_name(&entry.name)?;
/// validator.validate_entry_size(&entry)?;
/// validator.validate_not_symlink(&entry)?;
/// assert_eq!(name, "docs/readme.txt");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EntryValidator<'a> {
    config: &'a SecurityConfig,
}

impl<'a> EntryValidator<'a> {
    /// Creates a validator evaluating against `config`.
    #[must_use]
    pub const fn new(config: &'a SecurityConfig) -> Self {
        Self { config }
    }

    /// Returns the limits this validator applies.
    #[must_use]
    pub const fn config(&self) -> &'a SecurityConfig {
        self.config
    }

    /// See [`quota::validate_entry_count`].
    pub fn validate_entry_count(&self, count: usize) -> Result<()> {
        quota::validate_entry_count(count, self.config)
    }

    /// See [`name::validate_entry_name`].
    pub fn validate_entry_name(&self, entry_name: &str) -> Result<String> {
        name::validate_entry_name(entry_name, self.config)
    }

    /// See [`zipbomb::validate_entry_size`].
    pub fn validate_entry_size(&self, entry: &EntryDescriptor) -> Result<()> {
        zipbomb::validate_entry_size(entry, self.config)
    }

    /// See [`symlink::validate_not_symlink`].
    pub fn validate_not_symlink(&self, entry: &EntryDescriptor) -> Result<()> {
        symlink::validate_not_symlink(entry)
    }

    /// See [`path::validate_path_traversal`].
    pub fn validate_path_traversal(&self, resolved: &Path, target_root: &Path) -> Result<PathBuf> {
        path::validate_path_traversal(resolved, target_root)
    }

    /// See [`name::validate_duplicate_entry`].
    pub fn validate_duplicate_entry(&self, entry_name: &str, seen: &HashSet<String>) -> Result<()> {
        name::validate_duplicate_entry(entry_name, seen)
    }

    /// See [`quota::validate_total_decompressed_size`].
    pub fn validate_total_decompressed_size(&self, total: u64) -> Result<()> {
        quota::validate_total_decompressed_size(total, self.config)
    }

    /// See [`zipbomb::validate_actual_extracted_size`].
    pub fn validate_actual_extracted_size(&self, written: u64, entry_name: &str) -> Result<()> {
        zipbomb::validate_actual_extracted_size(written, entry_name, self.config)
    }
}
