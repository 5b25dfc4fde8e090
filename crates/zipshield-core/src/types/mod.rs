//! Types describing archive entries and extraction roots.
//!
//! `DestDir` can only be built through path validation, so a value of that
//! type is proof the root is a real, writable, canonical directory.

pub mod dest_dir;
pub mod entry;

pub use dest_dir::DestDir;
pub use entry::EntryDescriptor;
