//! Error types for the procserve core crate.
//!
//! Every failure while vetting, stat-ing, reading or listing a `/proc`
//! entry is a [`ProcError`]. Consumers turn these into the `err` field of
//! a [`ProcEntryResult`](crate::proc::ProcEntryResult) and, in the agent,
//! into an HTTP status.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::proc::OtherKind;

/// Errors raised while resolving a request path to a `/proc` entry.
#[derive(Error, Debug)]
pub enum ProcError {
    /// The raw request path contained `..`. Rejected before any
    /// filesystem access.
    #[error("directory traversal attempt detected")]
    Traversal,

    /// The joined path could not be canonicalized: it does not exist, a
    /// component is not a directory, or a symlink loop was found.
    #[error("cannot resolve {path}: {source}")]
    Resolution {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Canonicalization succeeded but the target lies outside the root.
    #[error("symlink traversal attempt detected: {path} resolves outside {root}")]
    SymlinkEscape { path: String, root: String },

    /// Stat, open, read or listing failed on a vetted path.
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The entry is neither a regular file nor a directory.
    #[error("unsupported entry type: {path} is a {kind}")]
    Unsupported { path: String, kind: OtherKind },
}

impl ProcError {
    pub(crate) fn resolution(path: &Path, source: io::Error) -> Self {
        Self::Resolution {
            path: path.to_string_lossy().into_owned(),
            source,
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_string_lossy().into_owned(),
            source,
        }
    }

    /// The path known at the point of failure.
    ///
    /// Empty for [`ProcError::Traversal`], which is rejected before a
    /// candidate path is built.
    pub fn path(&self) -> &str {
        match self {
            Self::Traversal => "",
            Self::Resolution { path, .. }
            | Self::SymlinkEscape { path, .. }
            | Self::Io { path, .. }
            | Self::Unsupported { path, .. } => path,
        }
    }

    /// The underlying OS error kind, for failures that carry one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Resolution { source, .. } | Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Errors in the process-wide configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A read limit was configured as zero.
    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),
}
