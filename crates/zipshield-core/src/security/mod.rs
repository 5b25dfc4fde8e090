//! Security validation modules.

pub mod access;
pub mod name;
pub mod path;
pub mod quota;
pub mod symlink;
pub mod validator;
pub mod zipbomb;

// Re-export public types and functions
pub use access::validate_readable_directory;
pub use access::validate_readable_file;
pub use access::validate_writable_directory;
pub use name::validate_duplicate_entry;
pub use name::validate_entry_name;
pub use path::validate_path_traversal;
pub use quota::validate_entry_count;
pub use quota::validate_total_decompressed_size;
pub use symlink::validate_not_symlink;
pub use validator::EntryValidator;
pub use zipbomb::validate_actual_extracted_size;
pub use zipbomb::validate_compression_ratio;
pub use zipbomb::validate_entry_size;
