//! Bounded directory listings.

use std::path::Path;

use crate::errors::ProcError;

/// Directory entries partitioned by type, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    /// Non-directory entries. Symlinks are not followed, so a link to a
    /// directory lands here.
    pub files: Vec<String>,
    pub dirs: Vec<String>,
    /// `true` when entries past `max_entries` were left out.
    pub truncated: bool,
}

impl DirListing {
    pub fn len(&self) -> usize {
        self.files.len() + self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// List at most `max_entries` entries of the directory at `path`.
///
/// Order is whatever the kernel returns; nothing is sorted.
pub fn list_bounded(path: &Path, max_entries: usize) -> Result<DirListing, ProcError> {
    let entries = std::fs::read_dir(path).map_err(|e| ProcError::io(path, e))?;

    let mut listing = DirListing::default();
    for entry in entries {
        let entry = entry.map_err(|e| ProcError::io(path, e))?;
        if listing.len() == max_entries {
            listing.truncated = true;
            break;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type().map_err(|e| ProcError::io(path, e))?;
        if file_type.is_dir() {
            listing.dirs.push(name);
        } else {
            listing.files.push(name);
        }
    }

    Ok(listing)
}
