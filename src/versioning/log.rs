//! Commit log reader: deployment history of the database file.

use chrono::DateTime;

use crate::error::{Result, SfwrError};
use crate::versioning::StoreLayout;
use crate::versioning::backend::{LOG_FIELD_SEPARATOR, LogQuery, VersionControlBackend};
use crate::versioning::checkpoint::Checkpoint;

/// Read-only view over checkpoint history.
pub struct CommitLogReader<'a, B> {
    backend: &'a B,
    layout: &'a StoreLayout,
    marker: &'a str,
    limit: usize,
}

impl<'a, B: VersionControlBackend> CommitLogReader<'a, B> {
    pub const fn new(backend: &'a B, layout: &'a StoreLayout, marker: &'a str, limit: usize) -> Self {
        Self {
            backend,
            layout,
            marker,
            limit,
        }
    }

    /// Newest-first checkpoints touching the database file.
    ///
    /// Prefers marker-tagged checkpoints; when there are none, falls back to
    /// every commit touching the file so history that predates the marker
    /// convention still shows up. Each call re-queries the backend.
    ///
    /// A repository with no commits yet has an empty history; a root that is
    /// not a repository at all is [`SfwrError::NotVersioned`].
    pub fn list_checkpoints(&self) -> Result<Vec<Checkpoint>> {
        if !self.backend.is_versioned().map_err(SfwrError::History)? {
            return Err(SfwrError::NotVersioned(self.layout.root.clone()));
        }

        let mut query = LogQuery {
            path: &self.layout.database,
            message_contains: Some(self.marker),
            limit: self.limit,
        };
        let mut records = self.backend.log(&query).map_err(SfwrError::History)?;

        if records.is_empty() {
            query.message_contains = None;
            records = self.backend.log(&query).map_err(SfwrError::History)?;
        }

        Ok(records.iter().filter_map(|r| parse_record(r)).collect())
    }

    /// The most recent checkpoint, if any.
    pub fn latest(&self) -> Result<Option<Checkpoint>> {
        Ok(self.list_checkpoints()?.into_iter().next())
    }
}

/// Parse one `id␟message␟timestamp` record; `None` for anything malformed.
pub fn parse_record(record: &str) -> Option<Checkpoint> {
    let mut fields = record.splitn(3, LOG_FIELD_SEPARATOR);
    let (Some(id), Some(message), Some(timestamp)) = (fields.next(), fields.next(), fields.next())
    else {
        tracing::debug!(record, "skipping log record with missing fields");
        return None;
    };

    let id = id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        tracing::debug!(record, "skipping log record with invalid identifier");
        return None;
    }

    let timestamp = match DateTime::parse_from_rfc3339(timestamp.trim()) {
        Ok(ts) => ts,
        Err(err) => {
            tracing::debug!(record, error = %err, "skipping log record with invalid timestamp");
            return None;
        }
    };

    Some(Checkpoint::new(
        id.to_string(),
        message.to_string(),
        timestamp,
    ))
}
