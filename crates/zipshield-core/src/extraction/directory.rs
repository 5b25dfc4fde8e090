//! Raw central directory scan.
//!
//! [`zip::ZipArchive`] indexes entries by name, so two central directory
//! records with the same name collapse into one and only the later record is
//! reachable. Counting and duplicate checks therefore run on the records as
//! they are written, before the archive is handed to the `zip` crate.

use std::collections::HashSet;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;

use crate::ArchiveError;
use crate::Result;
use crate::SecurityConfig;
use crate::error::Violation;
use crate::security::EntryValidator;

const EOCD_SIGNATURE: u32 = 0x0605_4b50;
const EOCD_LEN: u64 = 22;
const MAX_COMMENT_LEN: u64 = u16::MAX as u64;
const ZIP64_LOCATOR_SIGNATURE: u32 = 0x0706_4b50;
const ZIP64_LOCATOR_LEN: u64 = 20;
const ZIP64_EOCD_SIGNATURE: u32 = 0x0606_4b50;
const ZIP64_EOCD_LEN: usize = 56;
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;
const CENTRAL_HEADER_LEN: usize = 46;

/// Location of the central directory inside the archive stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CentralDirectory {
    start: u64,
    size: u64,
}

fn u16_at(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn u32_at(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

fn u64_at(buf: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

fn invalid(reason: &str) -> ArchiveError {
    ArchiveError::InvalidArchive(reason.to_string())
}

/// Finds the central directory through the end of central directory record,
/// following the zip64 locator when the classic fields are saturated.
fn locate<R: Read + Seek>(reader: &mut R) -> Result<CentralDirectory> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len < EOCD_LEN {
        return Err(invalid("archive is too short for an end of central directory record"));
    }

    let tail_len = len.min(EOCD_LEN + MAX_COMMENT_LEN);
    let tail_start = len - tail_len;
    reader.seek(SeekFrom::Start(tail_start))?;
    let mut tail = Vec::with_capacity(usize::try_from(tail_len).unwrap_or(0));
    reader.by_ref().take(tail_len).read_to_end(&mut tail)?;

    let last = tail.len().saturating_sub(EOCD_LEN as usize);
    let eocd = (0..=last)
        .rev()
        .find(|&pos| u32_at(&tail, pos) == EOCD_SIGNATURE)
        .ok_or_else(|| invalid("end of central directory record not found"))?;
    let eocd_offset = tail_start + eocd as u64;

    let entries = u16_at(&tail, eocd + 10);
    let size = u32_at(&tail, eocd + 12);
    let offset = u32_at(&tail, eocd + 16);

    if entries != u16::MAX && size != u32::MAX && offset != u32::MAX {
        let start = eocd_offset
            .checked_sub(u64::from(size))
            .ok_or_else(|| invalid("central directory size exceeds its position"))?;
        return Ok(CentralDirectory {
            start,
            size: u64::from(size),
        });
    }

    let locator_offset = eocd_offset
        .checked_sub(ZIP64_LOCATOR_LEN)
        .ok_or_else(|| invalid("zip64 locator not found"))?;
    let mut locator = [0u8; ZIP64_LOCATOR_LEN as usize];
    reader.seek(SeekFrom::Start(locator_offset))?;
    reader.read_exact(&mut locator)?;
    if u32_at(&locator, 0) != ZIP64_LOCATOR_SIGNATURE {
        return Err(invalid("zip64 locator not found"));
    }

    let record_offset = u64_at(&locator, 8);
    let mut record = [0u8; ZIP64_EOCD_LEN];
    reader.seek(SeekFrom::Start(record_offset))?;
    reader.read_exact(&mut record)?;
    if u32_at(&record, 0) != ZIP64_EOCD_SIGNATURE {
        return Err(invalid("zip64 end of central directory record not found"));
    }

    let size = u64_at(&record, 40);
    let start = record_offset
        .checked_sub(size)
        .ok_or_else(|| invalid("central directory size exceeds its position"))?;
    Ok(CentralDirectory { start, size })
}

/// Walks every central directory record, enforcing the entry count and
/// rejecting repeated raw names.
///
/// Returns the number of records. The reader is left at an unspecified
/// position.
///
/// # Errors
///
/// Returns [`Violation::EntryCount`] once the record count passes
/// `config.max_entry_count`, [`Violation::DuplicateEntry`] for the first
/// name seen twice, and [`ArchiveError::InvalidArchive`] if the directory
/// cannot be located or is truncated.
pub fn scan_central_directory<R: Read + Seek>(reader: &mut R, config: &SecurityConfig) -> Result<usize> {
    let validator = EntryValidator::new(config);
    let directory = locate(reader)?;
    reader.seek(SeekFrom::Start(directory.start))?;

    let mut records = reader.by_ref().take(directory.size);
    let mut names: HashSet<Vec<u8>> = HashSet::new();
    let mut header = [0u8; CENTRAL_HEADER_LEN];
    let mut consumed = 0u64;
    let mut count = 0usize;

    while consumed + CENTRAL_HEADER_LEN as u64 <= directory.size {
        records
            .read_exact(&mut header)
            .map_err(|_| invalid("central directory is truncated"))?;
        if u32_at(&header, 0) != CENTRAL_HEADER_SIGNATURE {
            break;
        }

        count += 1;
        validator.validate_entry_count(count)?;

        let name_len = usize::from(u16_at(&header, 28));
        let extra_len = u64::from(u16_at(&header, 30));
        let comment_len = u64::from(u16_at(&header, 32));

        let mut name = vec![0u8; name_len];
        records
            .read_exact(&mut name)
            .map_err(|_| invalid("central directory is truncated"))?;
        let skip = extra_len + comment_len;
        if std::io::copy(&mut records.by_ref().take(skip), &mut std::io::sink())? != skip {
            return Err(invalid("central directory is truncated"));
        }
        consumed += (CENTRAL_HEADER_LEN + name_len) as u64 + skip;

        // Overlong names fail later on the length check, no need to keep them.
        if name_len <= config.max_entry_name_length {
            if names.contains(&name) {
                return Err(Violation::DuplicateEntry {
                    name: String::from_utf8_lossy(&name).into_owned(),
                }
                .into());
            }
            names.insert(name);
        }
    }

    Ok(count)
}
