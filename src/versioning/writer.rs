//! Checkpoint writer and remote publisher.

use chrono::Local;
use serde::Serialize;

use crate::error::{Result, SfwrError};
use crate::versioning::backend::VersionControlBackend;
use crate::versioning::checkpoint::{StoreCounts, checkpoint_message};
use crate::versioning::{PublishTarget, StoreLayout};

/// What a successful `create_checkpoint` call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckpointOutcome {
    /// Identifier of the new checkpoint, `None` when nothing had changed.
    pub checkpoint: Option<String>,
    /// Message recorded with the new checkpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub published: bool,
}

impl CheckpointOutcome {
    pub const fn created(&self) -> bool {
        self.checkpoint.is_some()
    }

    /// Operator-facing status line.
    pub fn status_message(&self) -> String {
        if self.created() {
            "Successfully deployed! New checkpoint created and published.".to_string()
        } else {
            "No changes since last deployment. Pushed any pending checkpoints.".to_string()
        }
    }
}

/// Snapshots the working store into history and mirrors it to the remote.
pub struct CheckpointWriter<'a, B> {
    backend: &'a B,
    layout: &'a StoreLayout,
    publish: &'a PublishTarget,
    marker: &'a str,
}

impl<'a, B: VersionControlBackend> CheckpointWriter<'a, B> {
    pub const fn new(
        backend: &'a B,
        layout: &'a StoreLayout,
        publish: &'a PublishTarget,
        marker: &'a str,
    ) -> Self {
        Self {
            backend,
            layout,
            publish,
            marker,
        }
    }

    /// Record the current store state (if it changed) and publish history.
    ///
    /// A publish failure is reported as [`SfwrError::PublishFailed`] even when
    /// a checkpoint was recorded; the error carries that checkpoint's id.
    pub fn create_checkpoint(&self, counts: StoreCounts) -> Result<CheckpointOutcome> {
        if !self.backend.is_versioned().map_err(SfwrError::Backend)? {
            return Err(SfwrError::NotVersioned(self.layout.root.clone()));
        }

        self.backend
            .stage(&self.layout.database)
            .map_err(SfwrError::CheckpointFailed)?;

        if self.layout.assets_present() {
            if let Err(err) = self.backend.stage(&self.layout.assets) {
                tracing::warn!(
                    assets = %self.layout.assets.display(),
                    error = %err,
                    "could not stage asset directory; continuing without it"
                );
            }
        }

        let has_changes = self
            .backend
            .has_staged_changes()
            .map_err(SfwrError::CheckpointFailed)?;

        let (checkpoint, message) = if has_changes {
            let message = checkpoint_message(self.marker, counts, Local::now().naive_local());
            let id = self
                .backend
                .commit(&message)
                .map_err(SfwrError::CheckpointFailed)?;
            tracing::info!(checkpoint = %id, books = counts.books, authors = counts.authors, "checkpoint created");
            (Some(id), Some(message))
        } else {
            tracing::info!("store unchanged since last checkpoint; skipping commit");
            (None, None)
        };

        if let Err(source) = self
            .backend
            .push(&self.publish.remote, &self.publish.branch)
        {
            tracing::warn!(remote = %self.publish.remote, error = %source, "publish failed");
            return Err(SfwrError::PublishFailed { checkpoint, source });
        }
        tracing::info!(remote = %self.publish.remote, branch = %self.publish.branch, "history published");

        Ok(CheckpointOutcome {
            checkpoint,
            message,
            published: true,
        })
    }
}
