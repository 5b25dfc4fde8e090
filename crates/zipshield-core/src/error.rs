//! Error types for archive creation and extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// The specific safety bound an archive or path violated.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Entry name is empty or whitespace-only.
    EmptyName,
    /// Entry name is longer than the configured maximum.
    NameTooLong {
        /// Length of the normalized name in bytes.
        length: usize,
        /// Maximum allowed length in bytes.
        max: usize,
    },
    /// Entry name contains NUL or another C0 control character.
    ControlCharacter {
        /// The offending entry name (escaped for display).
        name: String,
    },
    /// Entry name contains a `..` segment, or resolves outside the target.
    PathTraversal {
        /// The entry name or resolved path.
        path: PathBuf,
    },
    /// Entry name is absolute (leading `/` or a drive letter).
    AbsolutePath {
        /// The offending entry name.
        name: String,
    },
    /// Entry name carries a `->` link marker.
    LinkMarker {
        /// The offending entry name.
        name: String,
    },
    /// Entry is stored with symbolic link mode bits.
    SymlinkEntry {
        /// The entry name.
        name: String,
    },
    /// A filesystem path handed to the engine is a symbolic link.
    SymlinkPath {
        /// The path that is a link.
        path: PathBuf,
    },
    /// Entry does not declare its uncompressed size.
    UnknownSize {
        /// The entry name.
        name: String,
    },
    /// Single entry (declared or actual) size exceeds the maximum.
    EntrySize {
        /// The entry name.
        name: String,
        /// Size in bytes.
        size: u64,
        /// Maximum allowed size in bytes.
        max: u64,
    },
    /// Declared compression ratio exceeds the maximum.
    CompressionRatio {
        /// The entry name.
        name: String,
        /// Declared compressed size in bytes.
        compressed: u64,
        /// Declared uncompressed size in bytes.
        uncompressed: u64,
        /// Computed ratio.
        ratio: f64,
    },
    /// Number of entries exceeds the maximum.
    EntryCount {
        /// Entries seen so far.
        current: usize,
        /// Maximum allowed entries.
        max: usize,
    },
    /// Cumulative decompressed bytes exceed the maximum.
    TotalSize {
        /// Bytes decompressed so far.
        current: u64,
        /// Maximum allowed bytes.
        max: u64,
    },
    /// Two entries normalize to the same name.
    DuplicateEntry {
        /// The normalized name.
        name: String,
    },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "entry name is empty"),
            Self::NameTooLong { length, max } => {
                write!(f, "entry name too long ({length} > {max} bytes)")
            }
            Self::ControlCharacter { name } => {
                write!(f, "entry name contains control characters: {name}")
            }
            Self::PathTraversal { path } => {
                write!(f, "path traversal detected: {}", path.display())
            }
            Self::AbsolutePath { name } => write!(f, "absolute path not allowed: {name}"),
            Self::LinkMarker { name } => {
                write!(f, "entry name contains symbolic link marker: {name}")
            }
            Self::SymlinkEntry { name } => {
                write!(f, "symbolic link entries are not allowed: {name}")
            }
            Self::SymlinkPath { path } => {
                write!(f, "symbolic links are not allowed: {}", path.display())
            }
            Self::UnknownSize { name } => write!(f, "unknown size for entry: {name}"),
            Self::EntrySize { name, size, max } => {
                write!(f, "entry size too large: {name} ({size} > {max} bytes)")
            }
            Self::CompressionRatio {
                name,
                compressed,
                uncompressed,
                ratio,
            } => write!(
                f,
                "compression ratio too high for {name}: compressed={compressed} bytes, \
                 uncompressed={uncompressed} bytes (ratio: {ratio:.2}), potential zip bomb"
            ),
            Self::EntryCount { current, max } => write!(
                f,
                "too many entries ({current} > {max}), potential zip bomb"
            ),
            Self::TotalSize { current, max } => write!(
                f,
                "total decompressed size too large ({current} > {max} bytes), potential zip bomb"
            ),
            Self::DuplicateEntry { name } => write!(f, "duplicate entry: {name}"),
        }
    }
}

/// Errors that can occur while creating or extracting archives.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive is corrupted or cannot be decoded.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Caller-correctable problem with the arguments.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// Input is adversarial or violates a hard safety bound.
    #[error("security violation: {violation}")]
    SecurityViolation {
        /// The bound that tripped.
        violation: Violation,
    },
}

impl ArchiveError {
    /// Creates an `InvalidInput` error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error represents a security violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipshield_core::ArchiveError;
    /// use zipshield_core::Violation;
    ///
    /// let err = ArchiveError::from(Violation::EmptyName);
    /// assert!(err.is_security_violation());
    ///
    /// let err = ArchiveError::invalid_input("missing file");
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::SecurityViolation { .. })
    }

    /// Returns `true` if the caller can correct the problem and retry.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Returns the violation that caused this error, if any.
    #[must_use]
    pub const fn violation(&self) -> Option<&Violation> {
        match self {
            Self::SecurityViolation { violation } => Some(violation),
            _ => None,
        }
    }
}

impl From<Violation> for ArchiveError {
    fn from(violation: Violation) -> Self {
        Self::SecurityViolation { violation }
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Self::Io(e),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for ArchiveError {
    fn from(err: walkdir::Error) -> Self {
        let message = err.to_string();
        err.into_io_error().map_or_else(
            || Self::Io(std::io::Error::other(message)),
            Self::Io,
        )
    }
}
