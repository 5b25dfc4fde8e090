//! All-or-nothing extraction through a staging directory.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::warn;

use crate::ArchiveError;
use crate::Result;
use crate::SecurityConfig;
use crate::extraction::zip::extract_zip;
use crate::report::ExtractionReport;
use crate::security::access::validate_readable_file;
use crate::security::access::validate_writable_directory;
use crate::temp::create_staging_directory;

const STAGING_PREFIX: &str = ".zipshield-staging-";

/// Checks that `target` is absent or an empty real directory.
///
/// Returns whether it exists.
fn check_target(target: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(target) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_dir() {
        return Err(ArchiveError::invalid_input(format!(
            "atomic extraction target is not a directory: {}",
            target.display()
        )));
    }
    if fs::read_dir(target)?.next().is_some() {
        return Err(ArchiveError::invalid_input(format!(
            "atomic extraction target is not empty: {}",
            target.display()
        )));
    }
    Ok(true)
}

fn parent_of(target: &Path) -> PathBuf {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Extracts into a staging directory beside `target_dir` and renames it
/// onto the target only after every entry succeeded.
///
/// On failure the staging directory is removed and the target is left as it
/// was.
///
/// # Errors
///
/// Returns `InvalidInput` if the target exists and is not an empty
/// directory, otherwise the same errors as [`extract_zip`].
pub fn extract_zip_atomic(
    archive_path: &Path,
    target_dir: &Path,
    config: &SecurityConfig,
) -> Result<ExtractionReport> {
    let archive_path = validate_readable_file(archive_path)?;
    let target_exists = check_target(target_dir)?;
    let parent = validate_writable_directory(&parent_of(target_dir))?;
    let target = match target_dir.file_name() {
        Some(name) => parent.join(name),
        None => {
            return Err(ArchiveError::invalid_input(format!(
                "atomic extraction target has no final component: {}",
                target_dir.display()
            )));
        }
    };

    let staging = create_staging_directory(&parent, STAGING_PREFIX)?;
    debug!(staging = %staging.path().display(), "staging extraction");

    // Dropping `staging` on error removes the partial tree.
    let mut report = extract_zip(&archive_path, staging.path(), config)?;

    if target_exists {
        fs::remove_dir(&target)?;
    }
    let staged = staging.keep();
    if let Err(e) = fs::rename(&staged, &target) {
        if let Err(cleanup) = fs::remove_dir_all(&staged) {
            warn!(path = %staged.display(), error = %cleanup, "failed to remove staging directory");
        }
        return Err(e.into());
    }

    report.target_dir = target.canonicalize()?;
    Ok(report)
}
