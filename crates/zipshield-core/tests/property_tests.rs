//! Property-based tests for entry validation and sanitization.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use std::io::Cursor;
use tempfile::TempDir;
use zipshield_core::SecurityConfig;
use zipshield_core::Violation;
use zipshield_core::copy::CopyBuffer;
use zipshield_core::copy::copy_chunks;
use zipshield_core::sanitize::MAX_SEGMENT_LENGTH;
use zipshield_core::sanitize::sanitize_segment;
use zipshield_core::security::EntryValidator;
use zipshield_core::security::validate_entry_name;
use zipshield_core::types::DestDir;
use zipshield_core::types::EntryDescriptor;

proptest! {
    /// Any name with a `..` segment is rejected.
    #[test]
    fn prop_parent_segment_rejected(
        prefix in "([a-z]+/){0,5}",
        suffix in "([a-z]+/?){0,5}",
        backslash in any::<bool>(),
    ) {
        let name = format!("{prefix}../{suffix}");
        let name = if backslash { name.replace('/', "\\") } else { name };
        let result = validate_entry_name(&name, &SecurityConfig::default());
        prop_assert!(result.is_err(), "name with .. should be rejected: {}", name);
    }

    /// Plain relative names are accepted and come back with `/` separators.
    #[test]
    fn prop_plain_names_accepted(
        components in prop::collection::vec("[a-zA-Z0-9_-]{1,20}", 1..5)
    ) {
        let name = components.join("\\");
        let normalized = validate_entry_name(&name, &SecurityConfig::default()).unwrap();
        prop_assert_eq!(normalized, components.join("/"));
    }

    /// Any C0 control character anywhere in the name is rejected.
    #[test]
    fn prop_control_characters_rejected(
        head in "[a-z]{0,10}",
        control in 0u8..0x20,
        tail in "[a-z]{0,10}",
    ) {
        let name = format!("{head}{}{tail}x", char::from(control));
        let err = validate_entry_name(&name, &SecurityConfig::default()).unwrap_err();
        let rejected_as_expected = matches!(
            err.violation(),
            Some(Violation::ControlCharacter { .. } | Violation::EmptyName)
        );
        prop_assert!(rejected_as_expected);
    }

    /// Sanitized segments are never empty, never name `.` or `..`, never
    /// contain separators, and respect the length cap.
    #[test]
    fn prop_sanitized_segment_is_safe(raw in any::<String>()) {
        let segment = sanitize_segment(&raw);
        prop_assert!(!segment.is_empty());
        prop_assert!(!segment.contains('/'));
        prop_assert!(!segment.contains('\\'));
        prop_assert!(!segment.chars().all(|c| c == '.'));
        prop_assert!(segment.len() <= MAX_SEGMENT_LENGTH);
        prop_assert!(!segment.chars().any(char::is_control));
    }

    /// Dotfile names survive sanitization unchanged.
    #[test]
    fn prop_dotfiles_unchanged(stem in "[a-zA-Z0-9_-]{1,40}") {
        let name = format!(".{stem}");
        prop_assert_eq!(sanitize_segment(&name), name);
    }

    /// Resolving sanitized segments always stays under the root.
    #[test]
    fn prop_resolved_paths_stay_under_root(
        segments in prop::collection::vec(any::<String>(), 1..6)
    ) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("failed to create dest");
        let config = SecurityConfig::default();
        let validator = EntryValidator::new(&config);

        let relative = segments
            .iter()
            .map(|s| sanitize_segment(s))
            .collect::<Vec<_>>()
            .join("/");
        let resolved = dest.resolve(&relative);
        prop_assert!(validator.validate_path_traversal(&resolved, dest.as_path()).is_ok());
    }

    /// The streaming limit trips exactly when the content exceeds it.
    #[test]
    fn prop_streaming_limit_is_exact(
        len in 0usize..200_000,
        limit in 1u64..200_000,
    ) {
        let config = SecurityConfig::default().with_max_entry_size(limit);
        let validator = EntryValidator::new(&config);
        let mut buffer = CopyBuffer::new();
        let mut reader = Cursor::new(vec![0u8; len]);

        let result = copy_chunks(&mut reader, &mut buffer, |_, total| {
            validator.validate_actual_extracted_size(total, "entry")
        });
        prop_assert_eq!(result.is_ok(), len as u64 <= limit);
    }

    /// Declared sizes above the limit are always rejected before extraction.
    #[test]
    fn prop_declared_size_limit(declared in 0u64..10_000, limit in 1u64..10_000) {
        let config = SecurityConfig::default()
            .with_max_entry_size(limit)
            .with_max_compression_ratio(f64::MAX);
        let entry = EntryDescriptor::file("f", Some(declared), declared);
        let result = EntryValidator::new(&config).validate_entry_size(&entry);
        prop_assert_eq!(result.is_ok(), declared <= limit);
    }
}
