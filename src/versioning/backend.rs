//! The version-control port used by the checkpoint subsystem.
//!
//! All paths handed to a backend are relative to the store root the backend
//! was created for.

use std::path::Path;

use crate::error::BackendError;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Separator between fields of a raw log record.
pub const LOG_FIELD_SEPARATOR: char = '\u{1f}';

/// History query restricted to commits that touch one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery<'a> {
    pub path: &'a Path,
    /// Only commits whose message contains this literal text.
    pub message_contains: Option<&'a str>,
    pub limit: usize,
}

/// Snapshot, diff, restore and sync primitives.
///
/// Implementations are trusted to be correct; the subsystem only sequences
/// them and enforces its own preconditions.
pub trait VersionControlBackend {
    /// Whether the store root is a recognized version-controlled tree.
    fn is_versioned(&self) -> BackendResult<bool>;

    /// Add the current content of `path` to the pending snapshot.
    fn stage(&self, path: &Path) -> BackendResult<()>;

    /// Whether the pending snapshot differs from the last checkpoint.
    fn has_staged_changes(&self) -> BackendResult<bool>;

    /// Record the pending snapshot. Returns the new checkpoint identifier.
    fn commit(&self, message: &str) -> BackendResult<String>;

    /// Whether `path` differs from the last checkpoint in any way
    /// (modified, staged or not yet tracked).
    fn is_modified(&self, path: &Path) -> BackendResult<bool>;

    /// Replace the working content of `path` with its content at `revision`.
    fn checkout_path(&self, revision: &str, path: &Path) -> BackendResult<()>;

    /// Publish local history to `remote`.
    fn push(&self, remote: &str, branch: &str) -> BackendResult<()>;

    /// Newest-first raw records, each `id`, `message` and an RFC 3339
    /// timestamp joined by [`LOG_FIELD_SEPARATOR`]. Empty history yields an
    /// empty list.
    fn log(&self, query: &LogQuery<'_>) -> BackendResult<Vec<String>>;
}

impl<B: VersionControlBackend + ?Sized> VersionControlBackend for &B {
    fn is_versioned(&self) -> BackendResult<bool> {
        (**self).is_versioned()
    }

    fn stage(&self, path: &Path) -> BackendResult<()> {
        (**self).stage(path)
    }

    fn has_staged_changes(&self) -> BackendResult<bool> {
        (**self).has_staged_changes()
    }

    fn commit(&self, message: &str) -> BackendResult<String> {
        (**self).commit(message)
    }

    fn is_modified(&self, path: &Path) -> BackendResult<bool> {
        (**self).is_modified(path)
    }

    fn checkout_path(&self, revision: &str, path: &Path) -> BackendResult<()> {
        (**self).checkout_path(revision, path)
    }

    fn push(&self, remote: &str, branch: &str) -> BackendResult<()> {
        (**self).push(remote, branch)
    }

    fn log(&self, query: &LogQuery<'_>) -> BackendResult<Vec<String>> {
        (**self).log(query)
    }
}
