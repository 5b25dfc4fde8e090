//! Archive entry metadata as read from the central directory.

use std::io::Read;
use std::io::Seek;

/// File-type bits of a Unix mode.
pub const S_IFMT: u32 = 0o170_000;

/// File-type value of a symbolic link.
pub const S_IFLNK: u32 = 0o120_000;

/// One archive entry as declared by the archive.
///
/// Every field comes from untrusted archive metadata. Nothing here is
/// trusted until the entry validator has checked it, and the declared sizes
/// are re-checked against the actual stream during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// Raw archive-internal name.
    pub name: String,

    /// Whether the entry is a directory record.
    pub is_directory: bool,

    /// Declared uncompressed size; `None` when the archive does not declare
    /// a usable size.
    pub declared_size: Option<u64>,

    /// Declared compressed size.
    pub compressed_size: u64,

    /// Stored Unix mode, if the archive records one.
    pub unix_mode: Option<u32>,
}

impl EntryDescriptor {
    /// Creates a descriptor for a regular file entry with no stored mode.
    #[must_use]
    pub fn file(name: impl Into<String>, declared_size: Option<u64>, compressed_size: u64) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
            declared_size,
            compressed_size,
            unix_mode: None,
        }
    }

    /// Sets the stored Unix mode.
    #[must_use]
    pub const fn with_unix_mode(mut self, mode: u32) -> Self {
        self.unix_mode = Some(mode);
        self
    }

    /// Builds a descriptor from a ZIP entry.
    ///
    /// Sizes beyond the signed 64-bit range of the ZIP model are reported as
    /// unknown.
    pub fn from_zip<R: Read + Seek>(file: &zip::read::ZipFile<'_, R>) -> Self {
        let declared_size = Some(file.size()).filter(|size| i64::try_from(*size).is_ok());
        Self {
            name: file.name().to_string(),
            is_directory: file.is_dir(),
            declared_size,
            compressed_size: file.compressed_size(),
            unix_mode: file.unix_mode(),
        }
    }

    /// Returns `true` if the stored mode marks this entry as a symbolic link.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipshield_core::types::EntryDescriptor;
    ///
    /// let link = EntryDescriptor::file("link", Some(4), 4).with_unix_mode(0o120_777);
    /// assert!(link.is_symlink());
    ///
    /// let file = EntryDescriptor::file("file.txt", Some(4), 4).with_unix_mode(0o100_644);
    /// assert!(!file.is_symlink());
    /// ```
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.unix_mode.is_some_and(|mode| mode & S_IFMT == S_IFLNK)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::ZipTestBuilder;
    use std::io::Cursor;

    #[test]
    fn test_no_mode_is_not_symlink() {
        let entry = EntryDescriptor::file("a.txt", Some(1), 1);
        assert!(!entry.is_symlink());
    }

    #[test]
    fn test_directory_mode_is_not_symlink() {
        let entry = EntryDescriptor::file("dir/", Some(0), 0).with_unix_mode(0o040_755);
        assert!(!entry.is_symlink());
    }

    #[test]
    fn test_from_zip_reads_metadata() {
        let data = ZipTestBuilder::new()
            .add_file("docs/readme.txt", b"hello")
            .add_directory("docs/")
            .add_symlink("link", "docs/readme.txt")
            .build();
        let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();

        let file = EntryDescriptor::from_zip(&archive.by_index(0).unwrap());
        assert_eq!(file.name, "docs/readme.txt");
        assert_eq!(file.declared_size, Some(5));
        assert!(!file.is_directory);
        assert!(!file.is_symlink());

        let dir = EntryDescriptor::from_zip(&archive.by_index(1).unwrap());
        assert!(dir.is_directory);

        let link = EntryDescriptor::from_zip(&archive.by_index(2).unwrap());
        assert!(link.is_symlink());
    }
}
