//! ZIP archive creation.
//!
//! Archives are always written to a fresh secure temp path. On any failure
//! the partially written archive is deleted before the error is returned.

use std::collections::HashSet;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::ArchiveError;
use crate::Result;
use crate::SecurityConfig;
use crate::copy::CopyBuffer;
use crate::copy::copy_chunks;
use crate::creation::config::CreationConfig;
use crate::creation::report::CreationReport;
use crate::sanitize::DEFAULT_SEGMENT;
use crate::sanitize::sanitize_segment;
use crate::security::access::validate_readable_directory;
use crate::security::access::validate_readable_file;
use crate::security::quota::validate_entry_count;
use crate::temp::create_secure_temp_file;
use crate::temp::delete_temp_file;

/// Archive file extension, compared case-insensitively.
pub const ZIP_EXTENSION: &str = ".zip";

/// Sanitizes a requested archive name and makes sure it ends in `.zip`.
///
/// Falls back to `config.default_archive_name` when the request is blank or
/// sanitizes to nothing.
///
/// # Examples
///
/// ```
/// use zipshield_core::creation::CreationConfig;
/// use zipshield_core::creation::zip::normalize_archive_name;
///
/// let config = CreationConfig::default();
/// assert_eq!(normalize_archive_name("report", &config), "report.zip");
/// assert_eq!(normalize_archive_name("Report.ZIP", &config), "Report.ZIP");
/// assert_eq!(normalize_archive_name("  ", &config), "archive.zip");
/// ```
#[must_use]
pub fn normalize_archive_name(requested: &str, config: &CreationConfig) -> String {
    let sanitized = sanitize_segment(requested);
    let blank = sanitized == DEFAULT_SEGMENT && requested.trim() != DEFAULT_SEGMENT;
    let name = if blank {
        sanitize_segment(&config.default_archive_name)
    } else {
        sanitized
    };

    if name.to_ascii_lowercase().ends_with(ZIP_EXTENSION) {
        name
    } else {
        format!("{name}{ZIP_EXTENSION}")
    }
}

fn file_options(config: &CreationConfig) -> SimpleFileOptions {
    match config.compression_level {
        Some(0) => SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        level => SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(level.unwrap_or(6)))),
    }
}

/// Opens a source file for reading without following a final symlink.
fn open_source(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOFOLLOW);
    }
    options.open(path)
}

/// Allocates the output archive, runs `build`, and deletes the archive if
/// anything fails.
fn with_temp_archive<F>(archive_name: &str, config: &CreationConfig, build: F) -> Result<CreationReport>
where
    F: FnOnce(&mut ZipWriter<File>, &mut CreationReport) -> Result<()>,
{
    let name = normalize_archive_name(archive_name, config);
    let archive_path = create_secure_temp_file(&config.temp_prefix, &format!("-{name}"))?;

    let result = write_archive(&archive_path, build);
    if result.is_err() {
        delete_temp_file(Some(&archive_path));
    }
    result
}

fn write_archive<F>(archive_path: &Path, build: F) -> Result<CreationReport>
where
    F: FnOnce(&mut ZipWriter<File>, &mut CreationReport) -> Result<()>,
{
    let start = Instant::now();
    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(archive_path)?;
    let mut zip = ZipWriter::new(file);
    let mut report = CreationReport::new(archive_path.to_path_buf());

    build(&mut zip, &mut report)?;
    zip.finish()?;

    report.duration = start.elapsed();
    Ok(report)
}

/// Streams one source file into a new archive entry.
fn add_file(
    zip: &mut ZipWriter<File>,
    source: &Path,
    entry_name: &str,
    options: SimpleFileOptions,
    buffer: &mut CopyBuffer,
    report: &mut CreationReport,
) -> Result<()> {
    let mut file = open_source(source)?;
    let size = file.metadata()?.len();

    zip.start_file(entry_name, options.large_file(size >= u64::from(u32::MAX)))?;
    let written = copy_chunks(&mut file, buffer, |chunk, _| {
        zip.write_all(chunk)?;
        Ok(())
    })?;

    debug!(entry = entry_name, bytes = written, "added file entry");
    report.files_added += 1;
    report.bytes_written = report
        .bytes_written
        .checked_add(written)
        .ok_or_else(|| ArchiveError::Io(std::io::Error::other("byte count overflow")))?;
    Ok(())
}

/// Compresses a single file into a new archive.
///
/// The archive holds one entry named after the source's base name.
///
/// # Errors
///
/// Returns an error if the source is not a readable regular file, is a
/// symbolic link, or any I/O operation fails. The partial archive is
/// deleted on failure.
pub fn compress_file(
    source: &Path,
    archive_name: &str,
    config: &CreationConfig,
) -> Result<CreationReport> {
    let source = validate_readable_file(source)?;
    let entry_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ArchiveError::invalid_input(format!("source has no file name: {}", source.display()))
        })?;
    let options = file_options(config);

    let report = with_temp_archive(archive_name, config, |zip, report| {
        let mut buffer = CopyBuffer::new();
        add_file(zip, &source, &entry_name, options, &mut buffer, report)
    })?;

    info!(
        source = %source.display(),
        archive = %report.archive_path.display(),
        bytes = report.bytes_written,
        "compressed file"
    );
    Ok(report)
}

/// Builds the `/`-joined archive name of `path` relative to `root`.
fn relative_entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        ArchiveError::invalid_input(format!(
            "{} is not inside {}",
            path.display(),
            root.display()
        ))
    })?;

    let segments = relative
        .components()
        .map(|component| {
            component.as_os_str().to_str().map(str::to_string).ok_or_else(|| {
                ArchiveError::invalid_input(format!(
                    "path is not valid UTF-8: {}",
                    path.display()
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(segments.join("/"))
}

/// Returns the ancestor directory names of an entry, outermost first.
fn ancestor_dirs(entry_name: &str) -> impl Iterator<Item = &str> {
    entry_name
        .match_indices('/')
        .map(move |(idx, _)| &entry_name[..idx])
}

/// Compresses a directory tree into a new archive.
///
/// Every regular file becomes an entry named by its `/`-separated path
/// relative to `source_dir`; each ancestor directory gets exactly one
/// directory entry. Symlinks and special files are skipped with a warning.
/// An empty directory yields a valid archive with no entries.
///
/// Directory entries count against `security.max_entry_count` like files
/// do, so any archive this produces also passes extraction under the same
/// configuration.
///
/// # Errors
///
/// Returns an error if the source is not a readable directory, the entry
/// count exceeds `security.max_entry_count`, or any I/O operation fails. The
/// partial archive is deleted on failure.
pub fn compress_directory(
    source_dir: &Path,
    archive_name: &str,
    security: &SecurityConfig,
    config: &CreationConfig,
) -> Result<CreationReport> {
    let root = validate_readable_directory(source_dir)?;
    let options = file_options(config);

    let report = with_temp_archive(archive_name, config, |zip, report| {
        let mut buffer = CopyBuffer::new();
        let mut dirs_seen: HashSet<String> = HashSet::new();
        let mut entry_count = 0usize;

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .min_depth(1);

        for entry in walker {
            let entry = entry?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                continue;
            }
            if !file_type.is_file() {
                warn!(path = %entry.path().display(), "skipping non-regular file");
                report.files_skipped += 1;
                report.add_warning(format!("skipped non-regular file: {}", entry.path().display()));
                continue;
            }

            let entry_name = relative_entry_name(&root, entry.path())?;
            for dir in ancestor_dirs(&entry_name) {
                if dirs_seen.insert(dir.to_string()) {
                    entry_count += 1;
                    validate_entry_count(entry_count, security)?;
                    zip.add_directory(format!("{dir}/"), options)?;
                    report.directories_added += 1;
                }
            }

            entry_count += 1;
            validate_entry_count(entry_count, security)?;

            add_file(zip, entry.path(), &entry_name, options, &mut buffer, report)?;
        }

        Ok(())
    })?;

    info!(
        source = %root.display(),
        archive = %report.archive_path.display(),
        files = report.files_added,
        directories = report.directories_added,
        "compressed directory"
    );
    Ok(report)
}
