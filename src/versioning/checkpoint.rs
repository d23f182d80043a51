//! Checkpoint records and the deployment message convention.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Marker token that distinguishes deployment checkpoints from other history.
pub const DEFAULT_MARKER: &str = "[DEPLOY]";

/// Layout used for the human-readable timestamp inside checkpoint messages.
pub const MESSAGE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An immutable historical snapshot of the working store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Full content-addressed identifier assigned by the backend.
    pub id: String,
    pub message: String,
    /// Commit time as recorded by the backend.
    pub timestamp: DateTime<FixedOffset>,
    /// Advisory only: the first integer found in the message. See
    /// [`derive_count`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_count: Option<i64>,
}

impl Checkpoint {
    pub fn new(id: String, message: String, timestamp: DateTime<FixedOffset>) -> Self {
        let derived_count = derive_count(&message);
        Self {
            id,
            message,
            timestamp,
            derived_count,
        }
    }

    pub fn short_id(&self) -> &str {
        crate::error::short_id(&self.id)
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.message.contains(marker)
    }
}

/// Summary counts supplied by the catalog for the checkpoint message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    pub books: u64,
    pub authors: u64,
}

impl StoreCounts {
    pub const fn new(books: u64, authors: u64) -> Self {
        Self { books, authors }
    }
}

/// Build a deployment message: `[<marker>] <N> books, <M> authors - <timestamp>`.
pub fn checkpoint_message(marker: &str, counts: StoreCounts, at: NaiveDateTime) -> String {
    format!(
        "{marker} {} books, {} authors - {}",
        counts.books,
        counts.authors,
        at.format(MESSAGE_TIMESTAMP_FORMAT)
    )
}

/// Best-effort numeral extraction from free-form message text.
///
/// Scans whitespace-delimited tokens in order and returns the first one that
/// parses as an integer once a single trailing comma is stripped. This is a
/// display convenience; nothing relies on it for correctness.
pub fn derive_count(message: &str) -> Option<i64> {
    message.split_whitespace().find_map(|word| {
        word.strip_suffix(',')
            .unwrap_or(word)
            .parse::<i64>()
            .ok()
    })
}
