//! Archive extraction.
//!
//! [`zip::extract_zip`] writes entries straight into the target and stops at
//! the first violation; [`atomic::extract_zip_atomic`] stages the same work
//! beside the target and publishes it only on success.

pub mod atomic;
pub mod directory;
pub mod state;
pub mod zip;

pub use atomic::extract_zip_atomic;
pub use directory::scan_central_directory;
pub use state::ExtractionState;
pub use zip::extract_from_reader;
pub use zip::extract_zip;
pub use zip::list_zip_entries;
