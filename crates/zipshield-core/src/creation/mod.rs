//! Archive creation from filesystem sources.

pub mod config;
pub mod report;
pub mod zip;

pub use config::CreationConfig;
pub use report::CreationReport;
pub use zip::compress_directory;
pub use zip::compress_file;
