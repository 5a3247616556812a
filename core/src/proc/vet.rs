//! Request path vetting.
//!
//! Two checks, both mandatory:
//!
//! 1. a textual check that rejects any `..` before the filesystem is
//!    touched, and
//! 2. canonicalization of the joined path followed by a containment check,
//!    which catches symlinks inside the root (`/proc/self/cwd`,
//!    `/proc/<pid>/root`, ...) that point elsewhere.

use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::PROC_ROOT;
use crate::errors::ProcError;

/// Resolves a path to its absolute form with every symlink followed.
///
/// Fails with the OS error when the path does not exist, a component is
/// not traversable, or a symlink loop is found.
pub trait Canonicalize: Send + Sync {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Canonicalization through the host filesystem (`realpath`).
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCanonicalizer;

impl Canonicalize for HostCanonicalizer {
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

/// Turns caller-supplied sub-paths into canonical paths inside a root.
///
/// The root must itself be canonical; otherwise no resolved path can
/// match it and every request is rejected as an escape.
#[derive(Debug, Clone)]
pub struct PathVetter<C = HostCanonicalizer> {
    root: PathBuf,
    canonicalizer: C,
}

impl PathVetter {
    /// Vetter rooted at `root`, canonicalizing through the host filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_canonicalizer(root, HostCanonicalizer)
    }
}

impl Default for PathVetter {
    fn default() -> Self {
        Self::new(PROC_ROOT)
    }
}

impl<C: Canonicalize> PathVetter<C> {
    pub fn with_canonicalizer(root: impl Into<PathBuf>, canonicalizer: C) -> Self {
        Self {
            root: root.into(),
            canonicalizer,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `sub_path` onto the root without touching the filesystem.
    ///
    /// Only normal components are kept, so leading or doubled separators,
    /// trailing slashes and `.` segments all collapse. A leading `/` never
    /// makes the sub-path absolute.
    pub fn candidate(&self, sub_path: &str) -> PathBuf {
        let mut candidate = self.root.clone();
        for component in Path::new(sub_path).components() {
            if let Component::Normal(part) = component {
                candidate.push(part);
            }
        }
        candidate
    }

    /// Vet `sub_path`, returning its canonical form inside the root.
    pub fn vet(&self, sub_path: &str) -> Result<PathBuf, ProcError> {
        if sub_path.contains("..") {
            debug!("Rejecting traversal in {:?}", sub_path);
            return Err(ProcError::Traversal);
        }

        let candidate = self.candidate(sub_path);
        let canonical = self
            .canonicalizer
            .canonicalize(&candidate)
            .map_err(|e| ProcError::resolution(&candidate, e))?;

        // Path::starts_with compares whole components, so `/procfoo` is
        // not inside `/proc`.
        if canonical.starts_with(&self.root) {
            Ok(canonical)
        } else {
            debug!(
                "Rejecting {} -> {} (outside {})",
                candidate.display(),
                canonical.display(),
                self.root.display()
            );
            Err(ProcError::SymlinkEscape {
                path: candidate.to_string_lossy().into_owned(),
                root: self.root.to_string_lossy().into_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Canonicalizer that counts calls and otherwise defers to the host.
    #[derive(Default)]
    struct CountingCanonicalizer {
        calls: AtomicUsize,
    }

    impl Canonicalize for CountingCanonicalizer {
        fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::fs::canonicalize(path)
        }
    }

    /// A temp root containing `file.txt`, `sub/inner.txt`, a link to `sub`,
    /// and a link pointing out of the root.
    fn fixture() -> (TempDir, TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();

        std::fs::write(root.join("file.txt"), "hello").unwrap();
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("sub/inner.txt"), "inner").unwrap();
        std::fs::write(outside.path().join("secret"), "secret").unwrap();

        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(root.join("sub"), root.join("link-in")).unwrap();
            std::os::unix::fs::symlink(outside.path(), root.join("link-out")).unwrap();
        }

        (dir, outside, root)
    }

    #[test]
    fn candidate_normalizes_separators() {
        let vetter = PathVetter::new("/proc");
        assert_eq!(vetter.candidate(""), PathBuf::from("/proc"));
        assert_eq!(vetter.candidate("/"), PathBuf::from("/proc"));
        assert_eq!(vetter.candidate("//version"), PathBuf::from("/proc/version"));
        assert_eq!(vetter.candidate("self/"), PathBuf::from("/proc/self"));
        assert_eq!(vetter.candidate("./self//status"), PathBuf::from("/proc/self/status"));
        assert_eq!(vetter.candidate("/etc/passwd"), PathBuf::from("/proc/etc/passwd"));
    }

    #[test]
    fn default_root_is_proc() {
        assert_eq!(PathVetter::default().root(), Path::new("/proc"));
    }

    #[test]
    fn empty_and_slash_resolve_to_root() {
        let (_dir, _outside, root) = fixture();
        let vetter = PathVetter::new(&root);
        assert_eq!(vetter.vet("").unwrap(), root);
        assert_eq!(vetter.vet("/").unwrap(), root);
        assert_eq!(vetter.vet("//").unwrap(), root);
    }

    #[test]
    fn trailing_slash_does_not_change_result() {
        let (_dir, _outside, root) = fixture();
        let vetter = PathVetter::new(&root);
        assert_eq!(vetter.vet("sub").unwrap(), vetter.vet("sub/").unwrap());
        assert_eq!(vetter.vet("/sub/").unwrap(), root.join("sub"));
    }

    #[test]
    fn canonical_input_is_idempotent() {
        let (_dir, _outside, root) = fixture();
        let vetter = PathVetter::new(&root);
        for p in [root.join("file.txt"), root.join("sub"), root.join("sub/inner.txt")] {
            let relative = p.strip_prefix(&root).unwrap().to_str().unwrap().to_string();
            assert_eq!(vetter.vet(&relative).unwrap(), p);
            let vetted = vetter.vet(&relative).unwrap();
            let again = vetted.strip_prefix(&root).unwrap().to_str().unwrap().to_string();
            assert_eq!(vetter.vet(&again).unwrap(), vetted);
        }
    }

    #[test]
    fn dot_dot_rejected_without_filesystem_access() {
        let (_dir, _outside, root) = fixture();
        let vetter = PathVetter::with_canonicalizer(&root, CountingCanonicalizer::default());

        for attempt in ["../etc/passwd", "sub/../file.txt", "..", "a..b", "/.."] {
            let err = vetter.vet(attempt).unwrap_err();
            assert!(matches!(err, ProcError::Traversal), "{attempt}: {err}");
        }
        assert_eq!(vetter.canonicalizer.calls.load(Ordering::SeqCst), 0);

        vetter.vet("file.txt").unwrap();
        assert_eq!(vetter.canonicalizer.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_path_is_resolution_error() {
        let (_dir, _outside, root) = fixture();
        let vetter = PathVetter::new(&root);
        let err = vetter.vet("x").unwrap_err();
        assert!(matches!(err, ProcError::Resolution { .. }), "{err}");
        assert_eq!(err.path(), root.join("x").to_str().unwrap());
        assert_eq!(err.io_kind(), Some(io::ErrorKind::NotFound));
    }

    #[test]
    fn file_used_as_directory_is_resolution_error() {
        let (_dir, _outside, root) = fixture();
        let vetter = PathVetter::new(&root);
        let err = vetter.vet("file.txt/more").unwrap_err();
        assert!(matches!(err, ProcError::Resolution { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_root_is_followed() {
        let (_dir, _outside, root) = fixture();
        let vetter = PathVetter::new(&root);
        assert_eq!(vetter.vet("link-in").unwrap(), root.join("sub"));
        assert_eq!(
            vetter.vet("link-in/inner.txt").unwrap(),
            root.join("sub/inner.txt")
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlink_out_of_root_is_escape() {
        let (_dir, _outside, root) = fixture();
        let vetter = PathVetter::new(&root);
        for attempt in ["link-out", "link-out/secret", "/link-out/"] {
            let err = vetter.vet(attempt).unwrap_err();
            assert!(matches!(err, ProcError::SymlinkEscape { .. }), "{attempt}: {err}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn sibling_with_root_prefix_is_escape() {
        let parent = TempDir::new().unwrap();
        let parent_path = parent.path().canonicalize().unwrap();
        let root = parent_path.join("proc");
        let sibling = parent_path.join("procfoo");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(&sibling).unwrap();
        std::os::unix::fs::symlink(&sibling, root.join("near")).unwrap();

        let vetter = PathVetter::new(&root);
        let err = vetter.vet("near").unwrap_err();
        assert!(matches!(err, ProcError::SymlinkEscape { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_is_resolution_error() {
        let (_dir, _outside, root) = fixture();
        std::os::unix::fs::symlink(root.join("loop-b"), root.join("loop-a")).unwrap();
        std::os::unix::fs::symlink(root.join("loop-a"), root.join("loop-b")).unwrap();

        let vetter = PathVetter::new(&root);
        let err = vetter.vet("loop-a").unwrap_err();
        assert!(matches!(err, ProcError::Resolution { .. }), "{err}");
    }
}
