use serde::{Deserialize, Serialize};

/// The JSON document returned for one request.
///
/// Empty fields are left out of the payload entirely. At most one of
/// `contents` and `files`/`dirs` is populated, and neither is when `err`
/// is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcEntryResult {
    /// Canonical path that was accessed, or the best path known when a
    /// step failed.
    pub path: String,
    /// `ls -l` style mode, present once stat succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dirs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    /// Set when a read or listing stopped at its configured cap.
    #[serde(default, skip_serializing_if = "is_false")]
    pub truncated: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ProcEntryResult {
    /// An otherwise empty result for `path`.
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.err.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Record a failure, dropping any content gathered so far.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.contents = None;
        self.files.clear();
        self.dirs.clear();
        self.truncated = false;
        self.err = Some(message.into());
    }
}
