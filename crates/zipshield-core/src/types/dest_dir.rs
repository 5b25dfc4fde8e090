//! Validated extraction root.

use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::security::access::validate_writable_directory;

/// A validated, canonical destination directory for extraction.
///
/// Once constructed, a `DestDir` is an existing, writable, non-link directory
/// represented by its absolute canonical path. Every resolved entry path is
/// checked against this root.
///
/// # Examples
///
/// ```no_run
/// use zipshield_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/extraction")?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Creates a new `DestDir`, creating the directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is a symbolic link, is not a directory,
    /// is not writable, or cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        validate_writable_directory(path.as_ref()).map(Self)
    }

    /// Returns the canonical root as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a `/`-separated relative entry name onto the root.
    ///
    /// The result is not yet checked for containment; pass it through
    /// `validate_path_traversal` before use.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.0.clone(), |path, segment| path.join(segment))
    }

    /// Converts into the inner `PathBuf`.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for DestDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
