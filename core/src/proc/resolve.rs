//! Request orchestration: vet, stat, dispatch on entry type.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::dir::list_bounded;
use super::file::read_bounded;
use super::mode::{format_mode, EntryKind};
use super::types::ProcEntryResult;
use super::vet::{Canonicalize, HostCanonicalizer, PathVetter};
use super::PROC_ROOT;
use crate::config::Limits;
use crate::errors::ProcError;

/// Outcome of resolving one request path.
///
/// `result.err` always holds the rendered `error`, so callers that only
/// need the wire document can take [`Resolution::into_result`]; callers
/// that map failures to a status keep the typed error.
#[derive(Debug)]
pub struct Resolution {
    pub result: ProcEntryResult,
    pub error: Option<ProcError>,
}

impl Resolution {
    fn success(result: ProcEntryResult) -> Self {
        Self {
            result,
            error: None,
        }
    }

    fn failure(mut result: ProcEntryResult, error: ProcError) -> Self {
        result.fail(error.to_string());
        Self {
            result,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> ProcEntryResult {
        self.result
    }
}

/// Maps request paths to [`ProcEntryResult`]s under a fixed root.
///
/// Holds no per-request state; one instance is shared by every worker.
#[derive(Debug, Clone)]
pub struct ProcResolver<C = HostCanonicalizer> {
    vetter: PathVetter<C>,
    limits: Limits,
}

impl ProcResolver {
    /// Resolver over `/proc` using the host filesystem.
    pub fn new(limits: Limits) -> Self {
        Self::with_vetter(PathVetter::new(PROC_ROOT), limits)
    }
}

impl<C: Canonicalize> ProcResolver<C> {
    pub fn with_vetter(vetter: PathVetter<C>, limits: Limits) -> Self {
        Self { vetter, limits }
    }

    pub fn root(&self) -> &Path {
        self.vetter.root()
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Resolve `sub_path` (the raw request path) to a result.
    pub fn resolve(&self, sub_path: &str) -> Resolution {
        let canonical = match self.vetter.vet(sub_path) {
            Ok(path) => path,
            Err(e) => return Resolution::failure(ProcEntryResult::at(e.path()), e),
        };

        let result = ProcEntryResult::at(canonical.to_string_lossy());
        self.read_vetted(canonical, result)
    }

    /// Convenience for callers that only want the wire document.
    pub fn read_entry(&self, sub_path: &str) -> ProcEntryResult {
        self.resolve(sub_path).into_result()
    }

    fn read_vetted(&self, canonical: PathBuf, mut result: ProcEntryResult) -> Resolution {
        let metadata = match std::fs::metadata(&canonical) {
            Ok(m) => m,
            Err(e) => return Resolution::failure(result, ProcError::io(&canonical, e)),
        };
        result.mode = Some(format_mode(&metadata));

        let kind = EntryKind::from_file_type(metadata.file_type());
        debug!("Resolved {} as {:?}", canonical.display(), kind);

        match kind {
            EntryKind::Regular => match read_bounded(&canonical, self.limits.max_file_bytes) {
                Ok(read) => {
                    result.contents = Some(read.contents);
                    result.truncated = read.truncated;
                    Resolution::success(result)
                }
                Err(e) => Resolution::failure(result, e),
            },
            EntryKind::Directory => match list_bounded(&canonical, self.limits.max_dir_entries) {
                Ok(listing) => {
                    result.files = listing.files;
                    result.dirs = listing.dirs;
                    result.truncated = listing.truncated;
                    Resolution::success(result)
                }
                Err(e) => Resolution::failure(result, e),
            },
            EntryKind::Other(other) => {
                let error = ProcError::Unsupported {
                    path: result.path.clone(),
                    kind: other,
                };
                Resolution::failure(result, error)
            }
        }
    }
}
