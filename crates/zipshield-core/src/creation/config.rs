//! Configuration for archive creation operations.

use crate::ArchiveError;
use crate::Result;

/// Configuration for archive creation operations.
///
/// # Examples
///
/// ```
/// use zipshield_core::creation::CreationConfig;
///
/// let config = CreationConfig::default()
///     .with_compression_level(9)
///     .with_default_archive_name("backup.zip");
/// assert_eq!(config.compression_level, Some(9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationConfig {
    /// Deflate level (1-9); `Some(0)` stores entries uncompressed.
    ///
    /// Default: `Some(6)` (balanced).
    pub compression_level: Option<u8>,

    /// Archive name used when the requested name sanitizes to nothing.
    ///
    /// Default: `"archive.zip"`.
    pub default_archive_name: String,

    /// Prefix for temporary archive files and extraction directories.
    ///
    /// Default: `"zipshield-"`.
    pub temp_prefix: String,
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            compression_level: Some(6),
            default_archive_name: "archive.zip".to_string(),
            temp_prefix: "zipshield-".to_string(),
        }
    }
}

impl CreationConfig {
    /// Creates a new `CreationConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    #[must_use]
    pub const fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets the fallback archive name.
    #[must_use]
    pub fn with_default_archive_name(mut self, name: impl Into<String>) -> Self {
        self.default_archive_name = name.into();
        self
    }

    /// Sets the temp path prefix.
    #[must_use]
    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the compression level is above 9 or the
    /// default archive name is blank.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && level > 9
        {
            return Err(ArchiveError::invalid_input(format!(
                "compression level must be 0-9, got {level}"
            )));
        }
        if self.default_archive_name.trim().is_empty() {
            return Err(ArchiveError::invalid_input(
                "default archive name must not be blank",
            ));
        }
        Ok(())
    }
}
