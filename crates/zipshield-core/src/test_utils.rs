//! In-memory ZIP archives for unit tests.
//!
//! # Panics
//!
//! Every method panics on I/O errors; test use only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builder for ZIP test archives with various entry types.
pub struct ZipTestBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn add(mut self, path: &str, data: &[u8], method: CompressionMethod) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(0o644);
        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a stored (uncompressed) file, so the compression ratio is 1.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add(path, data, CompressionMethod::Stored)
    }

    /// Adds a deflated file.
    #[must_use]
    pub fn add_file_deflated(self, path: &str, data: &[u8]) -> Self {
        self.add(path, data, CompressionMethod::Deflated)
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Adds a symbolic link entry pointing at `target`.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        self.zip
            .add_symlink(path, target, SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

/// Replaces every occurrence of the entry name `from` with `to` in raw
/// archive bytes, in both the local headers and the central directory.
///
/// `ZipWriter` refuses to write two entries with the same name, so archives
/// with repeated names are made by renaming after the fact.
#[must_use]
pub fn rename_entry(mut data: Vec<u8>, from: &str, to: &str) -> Vec<u8> {
    assert_eq!(from.len(), to.len(), "renamed entry must keep its length");
    let (from, to) = (from.as_bytes(), to.as_bytes());
    let mut pos = 0;
    while pos + from.len() <= data.len() {
        if &data[pos..pos + from.len()] == from {
            data[pos..pos + from.len()].copy_from_slice(to);
            pos += from.len();
        } else {
            pos += 1;
        }
    }
    data
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_entries_in_order() {
        let data = ZipTestBuilder::new()
            .add_directory("d/")
            .add_file("d/a.txt", b"a")
            .add_file_deflated("d/b.txt", b"b")
            .add_symlink("l", "d/a.txt")
            .build();

        let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        assert_eq!(archive.len(), 4);
        assert!(names.contains(&"d/a.txt"));
    }

    #[test]
    fn test_rename_entry_patches_every_record() {
        let data = ZipTestBuilder::new().add_file("old.txt", b"x").build();
        let data = rename_entry(data, "old.txt", "new.txt");

        let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.file_names().collect::<Vec<_>>(), vec!["new.txt"]);
    }
}
