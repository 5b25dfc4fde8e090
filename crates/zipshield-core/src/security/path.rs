//! Resolved path containment.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::error::Violation;

/// Lexically normalizes a path: drops `.` and lets `..` pop the previous
/// component. Does not touch the filesystem.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use zipshield_core::security::path::normalize_path;
///
/// assert_eq!(normalize_path(Path::new("/out/a/./b/../c")), Path::new("/out/a/c"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            Component::Normal(_) | Component::RootDir | Component::Prefix(_) => {
                normalized.push(component);
            }
        }
    }
    normalized
}

/// Validates that `resolved` stays inside `target_root` once normalized.
///
/// Containment is checked component-wise, so `/out-evil` is not inside
/// `/out`. This runs even though entry names were already checked for `..`
/// segments: resolution can surface traversal a string check misses.
///
/// Returns the normalized path.
///
/// # Errors
///
/// Returns `ArchiveError::SecurityViolation` if the path escapes the root.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use zipshield_core::security::validate_path_traversal;
///
/// let root = Path::new("/out");
/// assert!(validate_path_traversal(Path::new("/out/a/b.txt"), root).is_ok());
/// assert!(validate_path_traversal(Path::new("/out/../escape"), root).is_err());
/// ```
pub fn validate_path_traversal(resolved: &Path, target_root: &Path) -> Result<PathBuf> {
    let normalized = normalize_path(resolved);
    let root = normalize_path(target_root);

    if !normalized.starts_with(&root) {
        return Err(Violation::PathTraversal {
            path: resolved.to_path_buf(),
        }
        .into());
    }

    Ok(normalized)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_contained_path() {
        let root = Path::new("/srv/out");
        let result = validate_path_traversal(Path::new("/srv/out/dir/./file.txt"), root).unwrap();
        assert_eq!(result, Path::new("/srv/out/dir/file.txt"));
    }

    #[test]
    fn test_root_itself_is_contained() {
        let root = Path::new("/srv/out");
        assert!(validate_path_traversal(Path::new("/srv/out/"), root).is_ok());
    }

    #[test]
    fn test_escape_via_parent() {
        let root = Path::new("/srv/out");
        assert!(validate_path_traversal(Path::new("/srv/out/../escape"), root).is_err());
        assert!(validate_path_traversal(Path::new("/srv/out/a/../../../etc/passwd"), root).is_err());
    }

    #[test]
    fn test_sibling_with_common_prefix() {
        let root = Path::new("/srv/out");
        let err = validate_path_traversal(Path::new("/srv/out-evil/file"), root).unwrap_err();
        assert!(matches!(err.violation(), Some(Violation::PathTraversal { .. })));
    }

    #[test]
    fn test_inner_parent_stays_inside() {
        let root = Path::new("/srv/out");
        let result = validate_path_traversal(Path::new("/srv/out/a/../b"), root).unwrap();
        assert_eq!(result, Path::new("/srv/out/b"));
    }
}
