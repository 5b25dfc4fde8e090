//! ZIP archive extraction.
//!
//! Every entry passes the full validation pipeline before anything touches
//! the filesystem, and file content is counted chunk by chunk while it
//! streams so an entry that lies about its size is stopped at the limit.

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use zip::ZipArchive;

use crate::Result;
use crate::SecurityConfig;
use crate::copy::COPY_BUFFER_SIZE;
use crate::copy::CopyBuffer;
use crate::copy::copy_chunks;
use crate::error::ArchiveError;
use crate::error::Violation;
use crate::extraction::directory::scan_central_directory;
use crate::extraction::state::ExtractionState;
use crate::report::ExtractionReport;
use crate::sanitize::sanitize_segment;
use crate::security::EntryValidator;
use crate::security::access::validate_readable_file;
use crate::types::DestDir;
use crate::types::EntryDescriptor;

/// Extracts the archive at `archive_path` into `target_dir`.
///
/// The target directory is created if missing. Extraction stops at the
/// first violation; entries already written stay in place.
///
/// # Errors
///
/// Returns an error if the archive is not a readable regular file, the
/// target is not a writable directory, the archive is malformed, any entry
/// violates the security policy, or any I/O operation fails.
pub fn extract_zip(
    archive_path: &Path,
    target_dir: &Path,
    config: &SecurityConfig,
) -> Result<ExtractionReport> {
    let archive_path = validate_readable_file(archive_path)?;
    let dest = DestDir::new(target_dir)?;
    let file = File::open(&archive_path)?;

    let report = extract_from_reader(BufReader::new(file), dest, config)?;
    info!(
        archive = %archive_path.display(),
        target = %report.target_dir.display(),
        files = report.files_extracted,
        directories = report.directories_created,
        bytes = report.bytes_written,
        "extracted archive"
    );
    Ok(report)
}

/// Extracts an already opened ZIP stream into `dest`.
///
/// # Errors
///
/// Same as [`extract_zip`], minus the archive path checks.
pub fn extract_from_reader<R: Read + Seek>(
    reader: R,
    dest: DestDir,
    config: &SecurityConfig,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let validator = EntryValidator::new(config);
    let mut archive = open_archive(reader, config)?;
    let mut report = ExtractionReport::new(dest.as_path().to_path_buf());
    let mut state = ExtractionState::new(dest);
    let mut buffer = CopyBuffer::new();

    for index in 0..archive.len() {
        let count = state.record_entry();
        validator.validate_entry_count(count)?;

        let mut file = archive.by_index(index)?;
        let entry = EntryDescriptor::from_zip(&file);
        extract_entry(&mut file, &entry, validator, &mut state, &mut report, &mut buffer)?;
    }

    validator.validate_total_decompressed_size(state.total_bytes())?;

    report.entries_processed = state.entries_processed();
    report.bytes_written = state.total_bytes();
    report.duration = start.elapsed();
    Ok(report)
}

/// Opens `reader` as a ZIP archive after scanning its raw central directory.
///
/// The scan rejects repeated names and enforces the entry count on the
/// records as written; the record count must then match what
/// [`ZipArchive`] exposes, so no record is hidden from the entry loop.
fn open_archive<R: Read + Seek>(mut reader: R, config: &SecurityConfig) -> Result<ZipArchive<R>> {
    let records = scan_central_directory(&mut reader, config)?;
    let archive = ZipArchive::new(reader)?;
    if archive.len() != records {
        return Err(ArchiveError::InvalidArchive(format!(
            "central directory holds {records} records but {} distinct entries",
            archive.len()
        )));
    }
    Ok(archive)
}

/// Joins the sanitized segments of a validated entry name with `/`.
///
/// Empty and `.` segments carry no path information and are dropped. An
/// empty result means the entry would land on the root itself.
fn sanitize_entry_path(name: &str) -> String {
    name.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(sanitize_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Validates and writes one entry.
///
/// The entry count is checked by the caller before the entry is opened.
pub(crate) fn extract_entry<R: Read + ?Sized>(
    reader: &mut R,
    entry: &EntryDescriptor,
    validator: EntryValidator<'_>,
    state: &mut ExtractionState,
    report: &mut ExtractionReport,
    buffer: &mut CopyBuffer,
) -> Result<()> {
    let normalized = validator.validate_entry_name(&entry.name)?;
    validator.validate_entry_size(entry)?;
    validator.validate_not_symlink(entry)?;

    let sanitized = sanitize_entry_path(&normalized);
    if sanitized.is_empty() {
        if entry.is_directory {
            debug!(entry = %entry.name, "skipping root directory entry");
            return Ok(());
        }
        return Err(Violation::EmptyName.into());
    }

    let root = state.target_root().as_path().to_path_buf();
    let resolved = state.target_root().resolve(&sanitized);
    let resolved = validator.validate_path_traversal(&resolved, &root)?;

    validator.validate_duplicate_entry(&sanitized, state.names_seen())?;
    state.insert_name(sanitized.clone());

    if entry.is_directory {
        create_dir_within(&resolved, &root)?;
        report.directories_created += 1;
        debug!(entry = %sanitized, "created directory");
        return Ok(());
    }

    if let Some(parent) = resolved.parent() {
        create_dir_within(parent, &root)?;
    }

    let written = write_file(reader, &resolved, &entry.name, validator, state, buffer)?;
    validator.validate_total_decompressed_size(state.total_bytes())?;

    report.files_extracted += 1;
    debug!(entry = %sanitized, bytes = written, "extracted file");
    Ok(())
}

/// Creates `dir` and re-checks its canonical location against `root`, so a
/// link already present under the root cannot redirect later writes.
fn create_dir_within(dir: &Path, root: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let canonical = dir.canonicalize()?;
    if !canonical.starts_with(root) {
        return Err(Violation::PathTraversal { path: canonical }.into());
    }
    Ok(())
}

/// Opens the output file for writing without following a final symlink.
fn create_output(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOFOLLOW);
    }
    options.open(path)
}

/// Streams entry content to `path`, enforcing the per-entry and total
/// limits on every chunk before it is written.
fn write_file<R: Read + ?Sized>(
    reader: &mut R,
    path: &Path,
    entry_name: &str,
    validator: EntryValidator<'_>,
    state: &mut ExtractionState,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let file = create_output(path)?;
    let mut output = BufWriter::with_capacity(COPY_BUFFER_SIZE, file);

    let written = copy_chunks(reader, buffer, |chunk, entry_total| {
        validator.validate_actual_extracted_size(entry_total, entry_name)?;
        let total = state.add_bytes(chunk.len() as u64)?;
        validator.validate_total_decompressed_size(total)?;
        output.write_all(chunk)?;
        Ok(())
    })?;

    output.flush()?;
    Ok(written)
}

/// Reads the central directory of a ZIP archive without extracting.
///
/// # Errors
///
/// Returns an error if the archive cannot be read, holds more entries than
/// `config.max_entry_count`, or repeats an entry name.
pub fn list_zip_entries(archive_path: &Path, config: &SecurityConfig) -> Result<Vec<EntryDescriptor>> {
    let archive_path = validate_readable_file(archive_path)?;
    let validator = EntryValidator::new(config);
    let mut archive = open_archive(BufReader::new(File::open(&archive_path)?), config)?;

    let mut entries = Vec::with_capacity(archive.len().min(config.max_entry_count));
    for index in 0..archive.len() {
        validator.validate_entry_count(index + 1)?;
        let file = archive.by_index_raw(index)?;
        entries.push(EntryDescriptor::from_zip(&file));
    }

    debug!(archive = %archive_path.display(), entries = entries.len(), "listed archive");
    Ok(entries)
}
