//! Read-only access to entries under `/proc`.
//!
//! A request path goes through [`PathVetter`] (textual `..` rejection,
//! canonicalization, containment check), then [`ProcResolver`] stats the
//! vetted path and hands it to the bounded file reader or the bounded
//! directory reader. The outcome is a [`ProcEntryResult`].

pub mod dir;
pub mod file;
pub mod mode;
pub mod resolve;
pub mod types;
pub mod vet;

pub use mode::{EntryKind, OtherKind};
pub use resolve::{ProcResolver, Resolution};
pub use types::ProcEntryResult;
pub use vet::{Canonicalize, HostCanonicalizer, PathVetter};

/// The fixed root every request resolves under.
pub const PROC_ROOT: &str = "/proc";
