//! Hardened ZIP compression and extraction.
//!
//! `zipshield-core` packs files and directory trees into ZIP archives and
//! unpacks untrusted ZIP archives under a security policy: every entry is
//! checked for path traversal, absolute paths, symbolic links, oversized or
//! over-compressed content and duplicates before it reaches the filesystem,
//! and decompressed bytes are counted while they stream so that an archive
//! lying about its sizes is cut off at the limit.
//!
//! # Examples
//!
//! ```no_run
//! use zipshield_core::ArchiveEngine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ArchiveEngine::default();
//! let created = engine.compress_directory("project".as_ref(), "project")?;
//! let report = engine.extract(&created.archive_path, "/tmp/restored".as_ref())?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod copy;
pub mod creation;
pub mod engine;
pub mod error;
pub mod extraction;
pub mod report;
pub mod sanitize;
pub mod security;
pub mod temp;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::SecurityConfig;
pub use creation::CreationConfig;
pub use creation::CreationReport;
pub use engine::ArchiveEngine;
pub use error::ArchiveError;
pub use error::Result;
pub use error::Violation;
pub use report::ExtractionReport;
pub use types::DestDir;
pub use types::EntryDescriptor;
