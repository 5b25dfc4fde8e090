//! Filename sanitization for single path segments.

/// Maximum length of a sanitized segment in bytes.
pub const MAX_SEGMENT_LENGTH: usize = 255;

/// Name used when a segment sanitizes to nothing.
pub const DEFAULT_SEGMENT: &str = "unnamed";

const RESERVED: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Sanitizes one path segment for use as a file or directory name.
///
/// The result contains no path separators, no control characters, no
/// characters reserved on Windows, and is never made of dots alone, so it
/// cannot name the current or parent directory. Dotfiles such as `.env`
/// keep their name. The result is trimmed, truncated to
/// [`MAX_SEGMENT_LENGTH`] bytes on a character boundary, and never empty.
///
/// # Examples
///
/// ```
/// use zipshield_core::sanitize::sanitize_segment;
///
/// assert_eq!(sanitize_segment("report.pdf"), "report.pdf");
/// assert_eq!(sanitize_segment("a/b"), "a_b");
/// assert_eq!(sanitize_segment(".env"), ".env");
/// assert_eq!(sanitize_segment("..."), "unnamed");
/// ```
#[must_use]
pub fn sanitize_segment(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if RESERVED.contains(&c) { '_' } else { c })
        .collect();

    let truncated = truncate_to_boundary(replaced.trim(), MAX_SEGMENT_LENGTH).trim_end();

    if truncated.chars().all(|c| c == '.') {
        DEFAULT_SEGMENT.to_string()
    } else {
        truncated.to_string()
    }
}

fn truncate_to_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
