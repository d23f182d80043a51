//! Error types for sfwr.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SfwrError>;

/// A failed invocation of the version-control backend.
///
/// Carries everything needed to debug the failure without re-running it:
/// the command line, the exit status (absent when the process could not be
/// spawned at all) and the raw combined output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub command: String,
    pub status: Option<i32>,
    pub output: String,
}

impl BackendError {
    pub fn new(command: impl Into<String>, status: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            status,
            output: output.into(),
        }
    }

    /// The process could not be started.
    pub fn spawn(command: impl Into<String>, err: &std::io::Error) -> Self {
        Self::new(command, None, format!("failed to execute: {err}"))
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "`{}` exited with status {code}", self.command)?,
            None => write!(f, "`{}` did not run", self.command)?,
        }
        let output = self.output.trim();
        if !output.is_empty() {
            write!(f, "\n{output}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BackendError {}

#[derive(Debug, Error)]
pub enum SfwrError {
    #[error("store at {} is not under version control (run `sfwr init` first)", .0.display())]
    NotVersioned(PathBuf),

    #[error("failed to record checkpoint: {0}")]
    CheckpointFailed(#[source] BackendError),

    #[error("{} but publishing to the remote failed: {source}", publish_prefix(.checkpoint.as_deref()))]
    PublishFailed {
        /// Checkpoint created by this call before the publish step, if any.
        checkpoint: Option<String>,
        #[source]
        source: BackendError,
    },

    #[error(
        "you have unsaved changes to {}. Please deploy first to save your current state, then roll back",
        .0.display()
    )]
    UnsavedChanges(PathBuf),

    #[error("failed to roll back to {target}: {source}")]
    RestoreFailed {
        target: String,
        #[source]
        source: BackendError,
    },

    #[error("failed to read checkpoint history: {0}")]
    History(#[source] BackendError),

    #[error("backend error: {0}")]
    Backend(#[source] BackendError),

    #[error("confirmation required: {0}")]
    ConfirmationRequired(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

impl SfwrError {
    /// Stable machine-readable code used in robot output.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotVersioned(_) => "not_versioned",
            Self::CheckpointFailed(_) => "checkpoint_failed",
            Self::PublishFailed { .. } => "publish_failed",
            Self::UnsavedChanges(_) => "unsaved_changes",
            Self::RestoreFailed { .. } => "restore_failed",
            Self::History(_) => "history_unavailable",
            Self::Backend(_) => "backend_error",
            Self::ConfirmationRequired(_) => "confirmation_required",
            Self::Config(_) | Self::MissingConfig(_) => "config_error",
            Self::Serialization(_) => "serialization_error",
            Self::Io(_) => "io_error",
            Self::Database(_) => "database_error",
            Self::Git(_) => "git_error",
        }
    }
}

fn publish_prefix(checkpoint: Option<&str>) -> String {
    match checkpoint {
        Some(id) => format!("checkpoint {} was recorded locally", short_id(id)),
        None => "no new checkpoint was needed".to_string(),
    }
}

/// Abbreviate a commit hash for display.
pub fn short_id(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}
