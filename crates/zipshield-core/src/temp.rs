//! Secure temporary file and directory provisioning.
//!
//! Paths are created with owner-only permissions (`0600` for files, `0700`
//! for directories on Unix) under a unique random name, then persisted: the
//! caller owns the returned path and is responsible for removing it.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use tracing::warn;

use crate::ArchiveError;
use crate::Result;

fn builder<'a>(prefix: &'a str, suffix: &'a str, mode: u32) -> tempfile::Builder<'a, 'a> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix).suffix(suffix);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(mode));
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder
}

/// Creates an empty file at a fresh unique path in the system temp dir.
///
/// # Errors
///
/// Returns an error if the file cannot be created or persisted.
///
/// # Examples
///
/// ```no_run
/// use zipshield_core::temp::create_secure_temp_file;
/// use zipshield_core::temp::delete_temp_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = create_secure_temp_file("upload-", ".zip")?;
/// delete_temp_file(Some(&path));
/// # Ok(())
/// # }
/// ```
pub fn create_secure_temp_file(prefix: &str, suffix: &str) -> Result<PathBuf> {
    let file = builder(prefix, suffix, 0o600).tempfile()?;
    let (_file, path) = file.keep().map_err(|e| ArchiveError::Io(e.error))?;
    Ok(path)
}

/// Creates an empty directory at a fresh unique path in the system temp dir.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn create_secure_temp_directory(prefix: &str) -> Result<PathBuf> {
    let dir = builder(prefix, "", 0o700).tempdir()?;
    Ok(dir.keep())
}

/// Creates a staging directory inside `parent`, removed when dropped.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn create_staging_directory(parent: &Path, prefix: &str) -> Result<tempfile::TempDir> {
    Ok(builder(prefix, "", 0o700).tempdir_in(parent)?)
}

/// Removes a temp file. Missing files and `None` are ignored; other failures
/// are logged and swallowed.
pub fn delete_temp_file(path: Option<&Path>) {
    let Some(path) = path else {
        return;
    };
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to delete temp file"),
    }
}
