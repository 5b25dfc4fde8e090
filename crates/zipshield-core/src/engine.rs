//! The archive engine facade.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::Result;
use crate::SecurityConfig;
use crate::creation;
use crate::creation::CreationConfig;
use crate::creation::CreationReport;
use crate::extraction;
use crate::report::ExtractionReport;
use crate::security::access::validate_readable_file;
use crate::temp::create_secure_temp_directory;
use crate::types::EntryDescriptor;

/// Compresses and extracts ZIP archives under a fixed security policy.
///
/// The engine holds only immutable configuration, so one instance can be
/// shared across threads; every call builds its own extraction state.
///
/// # Examples
///
/// ```no_run
/// use zipshield_core::ArchiveEngine;
/// use zipshield_core::SecurityConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = ArchiveEngine::new(
///     SecurityConfig::default().with_max_entry_count(500),
///     Default::default(),
/// )?;
/// let report = engine.extract("upload.zip".as_ref(), "/srv/unpacked".as_ref())?;
/// println!("extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveEngine {
    security: SecurityConfig,
    creation: CreationConfig,
}

impl ArchiveEngine {
    /// Creates an engine after validating both configurations.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if either configuration is invalid.
    pub fn new(security: SecurityConfig, creation: CreationConfig) -> Result<Self> {
        security.validate()?;
        creation.validate()?;
        Ok(Self { security, creation })
    }

    /// Returns the security limits in force.
    #[must_use]
    pub const fn security_config(&self) -> &SecurityConfig {
        &self.security
    }

    /// Returns the creation settings in force.
    #[must_use]
    pub const fn creation_config(&self) -> &CreationConfig {
        &self.creation
    }

    /// Compresses one regular file into a new archive in the temp directory.
    ///
    /// # Errors
    ///
    /// See [`creation::compress_file`].
    pub fn compress_file(&self, source: &Path, archive_name: &str) -> Result<CreationReport> {
        logged(creation::compress_file(source, archive_name, &self.creation))
    }

    /// Compresses a directory tree into a new archive in the temp directory.
    ///
    /// # Errors
    ///
    /// See [`creation::compress_directory`].
    pub fn compress_directory(&self, source_dir: &Path, archive_name: &str) -> Result<CreationReport> {
        logged(creation::compress_directory(
            source_dir,
            archive_name,
            &self.security,
            &self.creation,
        ))
    }

    /// Extracts `archive` into `target_dir`, stopping at the first violation.
    ///
    /// Entries written before a failure stay on disk; use
    /// [`extract_atomic`](Self::extract_atomic) for all-or-nothing results.
    ///
    /// # Errors
    ///
    /// See [`extraction::extract_zip`].
    pub fn extract(&self, archive: &Path, target_dir: &Path) -> Result<ExtractionReport> {
        logged(extraction::extract_zip(archive, target_dir, &self.security))
    }

    /// Extracts `archive` into a fresh owner-only temp directory.
    ///
    /// The directory is removed again if extraction fails.
    ///
    /// # Errors
    ///
    /// See [`extraction::extract_zip`].
    pub fn extract_to_temp_directory(&self, archive: &Path) -> Result<ExtractionReport> {
        let archive = validate_readable_file(archive)?;
        let target = create_secure_temp_directory(&self.creation.temp_prefix)?;

        let result = extraction::extract_zip(&archive, &target, &self.security);
        if result.is_err()
            && let Err(e) = fs::remove_dir_all(&target)
        {
            warn!(path = %target.display(), error = %e, "failed to remove temp directory");
        }
        logged(result)
    }

    /// Extracts `archive` so that `target_dir` ends up either complete or
    /// untouched.
    ///
    /// # Errors
    ///
    /// See [`extraction::extract_zip_atomic`].
    pub fn extract_atomic(&self, archive: &Path, target_dir: &Path) -> Result<ExtractionReport> {
        logged(extraction::extract_zip_atomic(archive, target_dir, &self.security))
    }

    /// Lists archive entries in order without extracting anything.
    ///
    /// # Errors
    ///
    /// See [`extraction::list_zip_entries`].
    pub fn list_entries(&self, archive: &Path) -> Result<Vec<EntryDescriptor>> {
        logged(extraction::list_zip_entries(archive, &self.security))
    }
}

/// Emits a warning for security violations before handing the result back.
fn logged<T>(result: Result<T>) -> Result<T> {
    if let Err(e) = &result
        && let Some(violation) = e.violation()
    {
        warn!(%violation, "security violation");
    }
    result
}
