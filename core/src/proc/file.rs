//! Bounded reads of regular files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::errors::ProcError;

/// Initial buffer size; most `/proc` files are a few hundred bytes.
const INITIAL_CAPACITY: usize = 64 * 1024;

/// Text read from a file, possibly cut short at the byte cap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContents {
    pub contents: String,
    /// `true` when the file held more than `max_bytes` bytes.
    pub truncated: bool,
}

/// Read at most `max_bytes` bytes from the file at `path`.
///
/// Reads repeat until EOF or the cap, so a short first read from the
/// kernel does not cut the result short. One byte past the cap is
/// requested to tell a file of exactly `max_bytes` from a longer one.
/// Invalid UTF-8 is replaced with U+FFFD.
pub fn read_bounded(path: &Path, max_bytes: usize) -> Result<FileContents, ProcError> {
    let file = File::open(path).map_err(|e| ProcError::io(path, e))?;

    let limit = (max_bytes as u64).saturating_add(1);
    let mut buf = Vec::with_capacity(max_bytes.min(INITIAL_CAPACITY));
    file.take(limit)
        .read_to_end(&mut buf)
        .map_err(|e| ProcError::io(path, e))?;

    let truncated = buf.len() > max_bytes;
    buf.truncate(max_bytes);

    Ok(FileContents {
        contents: String::from_utf8_lossy(&buf).into_owned(),
        truncated,
    })
}
