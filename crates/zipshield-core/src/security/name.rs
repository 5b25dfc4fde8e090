//! Entry name validation.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::Result;
use crate::SecurityConfig;
use crate::error::Violation;

/// Replaces Windows separators with `/`.
///
/// Backslashes are accepted in archive input but never trusted as-is.
#[must_use]
pub fn normalize_separators(name: &str) -> String {
    name.replace('\\', "/")
}

/// Returns `true` for `X:` followed by `/` or the end of the name.
fn has_drive_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/')
}

/// Validates a raw entry name and returns it with `/` separators.
///
/// Checks run in a fixed order so the reported violation is deterministic:
/// 1. empty or whitespace-only
/// 2. normalized length above `max_entry_name_length`
/// 3. NUL or any other C0 control character
/// 4. a `..` segment anywhere
/// 5. leading `/` or a drive-letter prefix
/// 6. a `->` link marker
///
/// # Errors
///
/// Returns `ArchiveError::SecurityViolation` describing the first failed
/// check.
///
/// # Examples
///
/// ```
/// use zipshield_core::SecurityConfig;
/// use zipshield_core::security::validate_entry_name;
///
/// let config = SecurityConfig::default();
/// assert_eq!(validate_entry_name("dir\\file.txt", &config).unwrap(), "dir/file.txt");
/// assert!(validate_entry_name("../etc/passwd", &config).is_err());
/// ```
pub fn validate_entry_name(name: &str, config: &SecurityConfig) -> Result<String> {
    if name.trim().is_empty() {
        return Err(Violation::EmptyName.into());
    }

    let normalized = normalize_separators(name);

    if normalized.len() > config.max_entry_name_length {
        return Err(Violation::NameTooLong {
            length: normalized.len(),
            max: config.max_entry_name_length,
        }
        .into());
    }

    if normalized.chars().any(|c| c.is_ascii_control() && c != '\u{7f}') {
        return Err(Violation::ControlCharacter {
            name: normalized.escape_debug().to_string(),
        }
        .into());
    }

    if normalized.split('/').any(|segment| segment == "..") {
        return Err(Violation::PathTraversal {
            path: PathBuf::from(normalized),
        }
        .into());
    }

    if normalized.starts_with('/') || has_drive_prefix(&normalized) {
        return Err(Violation::AbsolutePath { name: normalized }.into());
    }

    if normalized.contains("->") {
        return Err(Violation::LinkMarker { name: normalized }.into());
    }

    Ok(normalized)
}

/// Fails if `name` was already extracted from this archive.
///
/// The caller inserts the name into `seen` once the check passes.
///
/// # Errors
///
/// Returns `ArchiveError::SecurityViolation` for a repeated name.
pub fn validate_duplicate_entry(name: &str, seen: &HashSet<String>) -> Result<()> {
    if seen.contains(name) {
        return Err(Violation::DuplicateEntry {
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn violation(name: &str) -> Violation {
        let config = SecurityConfig::default();
        validate_entry_name(name, &config)
            .unwrap_err()
            .violation()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_accepts_relative_names() {
        let config = SecurityConfig::default();
        for name in ["file.txt", "dir/subdir/file.txt", "dir/", "a.b/c-d_e", "..hidden", "./file"] {
            assert!(validate_entry_name(name, &config).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn test_normalizes_backslashes() {
        let config = SecurityConfig::default();
        assert_eq!(
            validate_entry_name("dir\\sub\\file.txt", &config).unwrap(),
            "dir/sub/file.txt"
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(violation(""), Violation::EmptyName);
        assert_eq!(violation("   \t"), Violation::EmptyName);
    }

    #[test]
    fn test_rejects_parent_segments() {
        for name in ["../evil", "a/../../b", "a/..", "..\\windows\\system32"] {
            assert!(
                matches!(violation(name), Violation::PathTraversal { .. }),
                "{name} should be traversal"
            );
        }
    }

    #[test]
    fn test_rejects_absolute() {
        for name in ["/etc/passwd", "//server/share", "C:/Windows", "c:\\temp\\x", "Z:"] {
            assert!(
                matches!(violation(name), Violation::AbsolutePath { .. }),
                "{name} should be absolute"
            );
        }
    }

    #[test]
    fn test_drive_letter_only_at_start() {
        let config = SecurityConfig::default();
        assert!(validate_entry_name("notes:1.txt", &config).is_ok());
        assert!(validate_entry_name("dir/C:/x", &config).is_ok());
    }

    #[test]
    fn test_rejects_control_characters() {
        for name in ["file\0.txt", "file\n.txt", "a\u{1b}[31m", "tab\there"] {
            assert!(
                matches!(violation(name), Violation::ControlCharacter { .. }),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_link_marker() {
        assert!(matches!(
            violation("link->/etc/passwd"),
            Violation::LinkMarker { .. }
        ));
    }

    #[test]
    fn test_rejects_overlong_name() {
        let name = "a".repeat(5000);
        assert!(matches!(violation(&name), Violation::NameTooLong { .. }));
    }

    #[test]
    fn test_length_limit_is_configurable() {
        let config = SecurityConfig::default().with_max_entry_name_length(8);
        assert!(validate_entry_name("12345678", &config).is_ok());
        assert!(validate_entry_name("123456789", &config).is_err());
    }

    #[test]
    fn test_duplicate_entry() {
        let mut seen = HashSet::new();
        assert!(validate_duplicate_entry("dir/a.txt", &seen).is_ok());
        seen.insert("dir/a.txt".to_string());

        let err = validate_duplicate_entry("dir/a.txt", &seen).unwrap_err();
        assert!(err.to_string().contains("duplicate entry"));
        assert!(validate_duplicate_entry("dir/b.txt", &seen).is_ok());
    }
}
