//! Chunked stream copying with a reusable buffer.
//!
//! Both directions of the engine stream through [`copy_chunks`]: compression
//! writes each chunk into the archive, extraction validates each chunk
//! against the size limits before writing it to disk. Byte counts use
//! checked arithmetic so a hostile stream cannot wrap a counter.

use std::io::Read;
use std::io::{self};

use crate::ArchiveError;
use crate::Result;

/// Chunk size for all archive I/O (64 KiB).
pub const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Heap buffer reused across every entry of one operation.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `reader` to the end in fixed-size chunks, handing each chunk to
/// `on_chunk` together with the running byte count including that chunk.
///
/// Stops at the first error from the reader or the callback. Returns the
/// total number of bytes read.
///
/// # Errors
///
/// Returns an error if reading fails, the callback fails, or the running
/// count would overflow `u64`.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use zipshield_core::copy::{CopyBuffer, copy_chunks};
///
/// # fn main() -> Result<(), zipshield_core::ArchiveError> {
/// let mut buffer = CopyBuffer::new();
/// let mut output = Vec::new();
/// let total = copy_chunks(&mut Cursor::new(b"hello"), &mut buffer, |chunk, _| {
///     output.extend_from_slice(chunk);
///     Ok(())
/// })?;
/// assert_eq!(total, 5);
/// assert_eq!(output, b"hello");
/// # Ok(())
/// # }
/// ```
pub fn copy_chunks<R, F>(reader: &mut R, buffer: &mut CopyBuffer, mut on_chunk: F) -> Result<u64>
where
    R: Read + ?Sized,
    F: FnMut(&[u8], u64) -> Result<()>,
{
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ArchiveError::Io(e)),
        };

        total = total
            .checked_add(bytes_read as u64)
            .ok_or_else(|| ArchiveError::Io(io::Error::other("byte count overflow")))?;

        on_chunk(&buffer.buf[..bytes_read], total)?;
    }

    Ok(total)
}
