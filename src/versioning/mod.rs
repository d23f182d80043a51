//! Checkpoint-based versioning of the working store.
//!
//! The working store (one SQLite file plus an optional cover-image directory)
//! is snapshotted into git history by the [`CheckpointWriter`], listed by the
//! [`CommitLogReader`] and restored by the [`RollbackExecutor`]. Everything
//! runs synchronously against a [`VersionControlBackend`]; the only shipped
//! backend is [`GitCli`].
//!
//! Concurrent checkpoints from separate processes are not coordinated; the
//! subsystem assumes a single writer.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;

pub mod backend;
pub mod checkpoint;
pub mod git_cli;
pub mod log;
pub mod rollback;
pub mod writer;

#[cfg(test)]
pub(crate) mod scripted;

pub use backend::{LogQuery, VersionControlBackend};
pub use checkpoint::{Checkpoint, DEFAULT_MARKER, StoreCounts, derive_count};
pub use git_cli::GitCli;
pub use log::CommitLogReader;
pub use rollback::{RollbackExecutor, RollbackOutcome};
pub use writer::{CheckpointOutcome, CheckpointWriter};

/// Where the working store lives. `database` and `assets` are relative to
/// `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    pub root: PathBuf,
    pub database: PathBuf,
    pub assets: PathBuf,
}

impl StoreLayout {
    pub fn new(
        root: impl Into<PathBuf>,
        database: impl Into<PathBuf>,
        assets: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            database: database.into(),
            assets: assets.into(),
        }
    }

    pub fn from_config(root: &Path, config: &Config) -> Self {
        Self::new(root, &config.store.database, &config.store.assets)
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(&self.database)
    }

    pub fn assets_path(&self) -> PathBuf {
        self.root.join(&self.assets)
    }

    pub fn assets_present(&self) -> bool {
        self.assets_path().is_dir()
    }
}

/// Remote mirror that checkpoints are published to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub remote: String,
    pub branch: String,
}

impl PublishTarget {
    pub fn new(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            branch: branch.into(),
        }
    }
}

impl Default for PublishTarget {
    fn default() -> Self {
        Self::new("origin", "main")
    }
}

/// The three operations the catalog calls into, bound to one store.
pub struct Versioning<B = GitCli> {
    backend: B,
    layout: StoreLayout,
    publish: PublishTarget,
    marker: String,
    history_limit: usize,
}

impl Versioning<GitCli> {
    /// Git-backed versioning for the store at `root`.
    pub fn git(root: &Path, config: &Config) -> Self {
        let backend = GitCli::new(root).with_binary(&config.git.binary);
        Self::new(backend, StoreLayout::from_config(root, config))
            .with_publish(PublishTarget::new(&config.publish.remote, &config.publish.branch))
            .with_marker(&config.checkpoint.marker)
            .with_history_limit(config.checkpoint.history_limit)
    }
}

impl<B: VersionControlBackend> Versioning<B> {
    pub fn new(backend: B, layout: StoreLayout) -> Self {
        Self {
            backend,
            layout,
            publish: PublishTarget::default(),
            marker: DEFAULT_MARKER.to_string(),
            history_limit: 20,
        }
    }

    #[must_use]
    pub fn with_publish(mut self, publish: PublishTarget) -> Self {
        self.publish = publish;
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// See [`CheckpointWriter::create_checkpoint`].
    pub fn create_checkpoint(&self, counts: StoreCounts) -> Result<CheckpointOutcome> {
        CheckpointWriter::new(&self.backend, &self.layout, &self.publish, &self.marker)
            .create_checkpoint(counts)
    }

    /// See [`CommitLogReader::list_checkpoints`].
    pub fn list_checkpoints(&self) -> Result<Vec<Checkpoint>> {
        self.reader(self.history_limit).list_checkpoints()
    }

    /// Like [`Self::list_checkpoints`] with an explicit limit.
    pub fn list_checkpoints_limited(&self, limit: usize) -> Result<Vec<Checkpoint>> {
        self.reader(limit.max(1)).list_checkpoints()
    }

    /// The newest checkpoint, if any. See [`CommitLogReader::latest`].
    pub fn latest_checkpoint(&self) -> Result<Option<Checkpoint>> {
        self.reader(1).latest()
    }

    /// See [`RollbackExecutor::rollback`].
    pub fn rollback(&self, target: &str) -> Result<RollbackOutcome> {
        RollbackExecutor::new(&self.backend, &self.layout).rollback(target)
    }

    /// Whether the store root is under version control.
    pub fn is_versioned(&self) -> Result<bool> {
        self.backend
            .is_versioned()
            .map_err(crate::error::SfwrError::Backend)
    }

    /// Whether the database file has changes not yet captured in a checkpoint.
    pub fn has_unsaved_changes(&self) -> Result<bool> {
        self.backend
            .is_modified(&self.layout.database)
            .map_err(crate::error::SfwrError::Backend)
    }

    fn reader(&self, limit: usize) -> CommitLogReader<'_, B> {
        CommitLogReader::new(&self.backend, &self.layout, &self.marker, limit)
    }
}
