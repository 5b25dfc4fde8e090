//! Filesystem path access validation.
//!
//! Every path the engine reads from or writes to goes through one of these
//! checks first. The link check always runs on the path as given, using
//! `symlink_metadata`, before the path is canonicalized: a path must be a
//! real file or directory, not something that merely resolves to one.

use std::fs;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::ArchiveError;
use crate::Result;
use crate::error::Violation;

/// Reads metadata without following links, mapping a missing path to
/// `InvalidInput` and a link to `SecurityViolation`.
fn lstat_not_link(path: &Path) -> Result<fs::Metadata> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ArchiveError::invalid_input(format!(
                "path does not exist: {}",
                path.display()
            )));
        }
        Err(e) => return Err(ArchiveError::Io(e)),
    };

    if metadata.file_type().is_symlink() {
        return Err(Violation::SymlinkPath {
            path: path.to_path_buf(),
        }
        .into());
    }

    Ok(metadata)
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(|e| {
        ArchiveError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to canonicalize path {}: {e}", path.display()),
        ))
    })
}

/// Validates that `path` is an existing, readable regular file.
///
/// Returns the canonical path.
///
/// # Errors
///
/// - `InvalidInput` if the path does not exist or is not a regular file
/// - `SecurityViolation` if the path is a symbolic link
/// - `Io` if the file cannot be opened or read
///
/// # Examples
///
/// ```no_run
/// use zipshield_core::security::access::validate_readable_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let canonical = validate_readable_file("upload.zip".as_ref())?;
/// # Ok(())
/// # }
/// ```
pub fn validate_readable_file(path: &Path) -> Result<PathBuf> {
    lstat_not_link(path)?;
    let canonical = canonicalize(path)?;

    let metadata = fs::metadata(&canonical)?;
    if !metadata.is_file() {
        return Err(ArchiveError::invalid_input(format!(
            "not a regular file: {}",
            path.display()
        )));
    }

    // Surface permission errors now rather than mid-stream
    if metadata.len() > 0 {
        let mut probe = [0u8; 1];
        let mut file = fs::File::open(&canonical)?;
        file.read_exact(&mut probe)?;
    }

    Ok(canonical)
}

/// Validates that `path` is an existing, listable directory.
///
/// Returns the canonical path.
///
/// # Errors
///
/// - `InvalidInput` if the path does not exist or is not a directory
/// - `SecurityViolation` if the path is a symbolic link
/// - `Io` if the directory cannot be listed
pub fn validate_readable_directory(path: &Path) -> Result<PathBuf> {
    lstat_not_link(path)?;
    let canonical = canonicalize(path)?;

    if !canonical.is_dir() {
        return Err(ArchiveError::invalid_input(format!(
            "not a directory: {}",
            path.display()
        )));
    }

    drop(fs::read_dir(&canonical)?);

    Ok(canonical)
}

/// Validates that `path` is a writable directory, creating it (and any
/// missing ancestors) when absent.
///
/// Returns the canonical path.
///
/// # Errors
///
/// - `SecurityViolation` if the path is a symbolic link
/// - `InvalidInput` if the path is not a directory or is not writable
/// - `Io` if the directory cannot be created
pub fn validate_writable_directory(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => fs::create_dir_all(path)?,
        Err(e) => return Err(ArchiveError::Io(e)),
        Ok(_) => {}
    }

    let metadata = lstat_not_link(path)?;
    if !metadata.is_dir() {
        return Err(ArchiveError::invalid_input(format!(
            "not a directory: {}",
            path.display()
        )));
    }

    let canonical = canonicalize(path)?;
    if !is_writable(&canonical)? {
        return Err(ArchiveError::invalid_input(format!(
            "directory is not writable: {}",
            canonical.display()
        )));
    }

    Ok(canonical)
}

#[cfg(unix)]
fn is_writable(path: &Path) -> Result<bool> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let path_cstring = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| ArchiveError::invalid_input("path contains null byte"))?;

    // SAFETY: access() only reads the NUL-terminated string, which stays
    // alive for the duration of the call.
    #[allow(unsafe_code)]
    let result = unsafe { libc::access(path_cstring.as_ptr(), libc::W_OK) };

    Ok(result == 0)
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> Result<bool> {
    Ok(!fs::metadata(path)?.permissions().readonly())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_readable_file_ok() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file = temp.path().join("data.txt");
        fs::write(&file, b"content").unwrap();

        let canonical = validate_readable_file(&file).unwrap();
        assert!(canonical.is_absolute());
        assert!(canonical.ends_with("data.txt"));
    }

    #[test]
    fn test_readable_file_empty_ok() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file = temp.path().join("empty.txt");
        fs::write(&file, b"").unwrap();
        assert!(validate_readable_file(&file).is_ok());
    }

    #[test]
    fn test_readable_file_missing() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let err = validate_readable_file(&temp.path().join("missing.txt")).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_readable_file_rejects_directory() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let err = validate_readable_file(temp.path()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[cfg(unix)]
    #[test]
    fn test_readable_file_rejects_symlink() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let target = temp.path().join("target.txt");
        fs::write(&target, b"secret").unwrap();
        let link = temp.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = validate_readable_file(&link).unwrap_err();
        assert!(matches!(
            err.violation(),
            Some(Violation::SymlinkPath { .. })
        ));
    }

    #[test]
    fn test_readable_directory_ok() {
        let temp = TempDir::new().expect("failed to create temp dir");
        assert!(validate_readable_directory(temp.path()).is_ok());
    }

    #[test]
    fn test_readable_directory_rejects_file() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file = temp.path().join("file.txt");
        fs::write(&file, b"x").unwrap();
        assert!(validate_readable_directory(&file).unwrap_err().is_invalid_input());
    }

    #[cfg(unix)]
    #[test]
    fn test_readable_directory_rejects_symlink() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let real = temp.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert!(validate_readable_directory(&link).unwrap_err().is_security_violation());
    }

    #[test]
    fn test_writable_directory_creates_missing() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let target = temp.path().join("a/b/c");

        let canonical = validate_writable_directory(&target).unwrap();
        assert!(target.is_dir());
        assert!(canonical.ends_with("a/b/c"));
    }

    #[test]
    fn test_writable_directory_rejects_file() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file = temp.path().join("file.txt");
        fs::write(&file, b"x").unwrap();
        assert!(validate_writable_directory(&file).unwrap_err().is_invalid_input());
    }

    #[cfg(unix)]
    #[test]
    fn test_writable_directory_rejects_symlink() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let real = temp.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert!(validate_writable_directory(&link).unwrap_err().is_security_violation());
    }
}
