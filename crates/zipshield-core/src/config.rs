//! Security limits for archive extraction and creation.

use crate::ArchiveError;
use crate::Result;

/// Default maximum number of entries per archive.
pub const DEFAULT_MAX_ENTRY_COUNT: usize = 10_000;

/// Default maximum size of a single entry (512 MiB).
pub const DEFAULT_MAX_ENTRY_SIZE: u64 = 512 * 1024 * 1024;

/// Default maximum compression ratio.
pub const DEFAULT_MAX_COMPRESSION_RATIO: f64 = 100.0;

/// Default maximum cumulative decompressed size (1 GiB).
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 1024 * 1024 * 1024;

/// Default maximum entry name length in bytes.
pub const DEFAULT_MAX_ENTRY_NAME_LENGTH: usize = 4096;

/// Immutable security limits applied to every archive operation.
///
/// The struct is `Copy`; pass it by reference to validators and let the
/// engine own one instance.
///
/// # Examples
///
/// ```
/// use zipshield_core::SecurityConfig;
///
/// // Use secure defaults
/// let config = SecurityConfig::default();
///
/// // Tighten limits for small uploads
/// let strict = SecurityConfig::default()
///     .with_max_entry_count(100)
///     .with_max_total_size(10 * 1024 * 1024);
/// assert_eq!(strict.max_entry_count, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecurityConfig {
    /// Maximum number of entries in one archive.
    pub max_entry_count: usize,

    /// Maximum declared or actual size of a single entry in bytes.
    pub max_entry_size: u64,

    /// Maximum compression ratio allowed (uncompressed / compressed).
    pub max_compression_ratio: f64,

    /// Maximum total bytes decompressed across all entries.
    pub max_total_size: u64,

    /// Maximum length of a normalized entry name in bytes.
    pub max_entry_name_length: usize,
}

impl Default for SecurityConfig {
    /// Creates a `SecurityConfig` with secure default settings.
    ///
    /// Default values:
    /// - `max_entry_count`: 10,000
    /// - `max_entry_size`: 512 MiB
    /// - `max_compression_ratio`: 100.0
    /// - `max_total_size`: 1 GiB
    /// - `max_entry_name_length`: 4096 bytes
    fn default() -> Self {
        Self {
            max_entry_count: DEFAULT_MAX_ENTRY_COUNT,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            max_compression_ratio: DEFAULT_MAX_COMPRESSION_RATIO,
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            max_entry_name_length: DEFAULT_MAX_ENTRY_NAME_LENGTH,
        }
    }
}

impl SecurityConfig {
    /// Sets the maximum entry count.
    #[must_use]
    pub const fn with_max_entry_count(mut self, max: usize) -> Self {
        self.max_entry_count = max;
        self
    }

    /// Sets the maximum single entry size.
    #[must_use]
    pub const fn with_max_entry_size(mut self, max: u64) -> Self {
        self.max_entry_size = max;
        self
    }

    /// Sets the maximum compression ratio.
    #[must_use]
    pub const fn with_max_compression_ratio(mut self, max: f64) -> Self {
        self.max_compression_ratio = max;
        self
    }

    /// Sets the maximum cumulative decompressed size.
    #[must_use]
    pub const fn with_max_total_size(mut self, max: u64) -> Self {
        self.max_total_size = max;
        self
    }

    /// Sets the maximum entry name length.
    #[must_use]
    pub const fn with_max_entry_name_length(mut self, max: usize) -> Self {
        self.max_entry_name_length = max;
        self
    }

    /// Checks that the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::InvalidInput` if a count or length limit is
    /// zero, or the compression ratio is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.max_entry_count == 0 {
            return Err(ArchiveError::invalid_input("max_entry_count must be positive"));
        }
        if self.max_entry_name_length == 0 {
            return Err(ArchiveError::invalid_input(
                "max_entry_name_length must be positive",
            ));
        }
        if !self.max_compression_ratio.is_finite() || self.max_compression_ratio <= 0.0 {
            return Err(ArchiveError::invalid_input(format!(
                "max_compression_ratio must be a positive number, got {}",
                self.max_compression_ratio
            )));
        }
        Ok(())
    }
}
