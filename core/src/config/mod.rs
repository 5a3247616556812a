use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default cap on bytes read from a single file (4 MiB).
pub const DEFAULT_MAX_FILE_BYTES: usize = 4 * 1024 * 1024;

/// Default cap on entries listed from a single directory.
pub const DEFAULT_MAX_DIR_ENTRIES: usize = 1024;

/// Read limits applied to every request.
///
/// Built once at startup and handed to the resolver; never mutated
/// afterwards. Both limits are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    #[serde(default = "default_max_dir_entries")]
    pub max_dir_entries: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            max_dir_entries: default_max_dir_entries(),
        }
    }
}

impl Limits {
    /// Build validated limits.
    pub fn new(max_file_bytes: usize, max_dir_entries: usize) -> Result<Self, ConfigError> {
        let limits = Self {
            max_file_bytes,
            max_dir_entries,
        };
        limits.validate()?;
        Ok(limits)
    }

    /// Reject zero limits; a zero cap would make every read empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_bytes == 0 {
            return Err(ConfigError::ZeroLimit("file limit"));
        }
        if self.max_dir_entries == 0 {
            return Err(ConfigError::ZeroLimit("directory limit"));
        }
        Ok(())
    }
}

fn default_max_file_bytes() -> usize {
    DEFAULT_MAX_FILE_BYTES
}

fn default_max_dir_entries() -> usize {
    DEFAULT_MAX_DIR_ENTRIES
}
