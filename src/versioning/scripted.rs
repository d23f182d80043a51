//! Scripted in-process backend for unit tests.

use std::cell::RefCell;
use std::path::Path;

use crate::error::BackendError;
use crate::versioning::backend::{BackendResult, LogQuery, VersionControlBackend};

/// Answers each backend call from preset fields and records the calls made.
#[derive(Debug)]
pub struct ScriptedBackend {
    pub versioned: bool,
    pub staged_changes: bool,
    pub modified: bool,
    pub fail_stage: Option<&'static str>,
    pub fail_commit: bool,
    pub fail_push: bool,
    /// Paths whose checkout fails.
    pub fail_checkout: Vec<&'static str>,
    pub fail_log: bool,
    /// Records returned for queries with a message filter.
    pub marked_log: Vec<String>,
    /// Records returned for unfiltered queries.
    pub full_log: Vec<String>,
    pub next_id: String,
    pub(crate) calls: RefCell<Vec<String>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            versioned: true,
            staged_changes: true,
            modified: false,
            fail_stage: None,
            fail_commit: false,
            fail_push: false,
            fail_checkout: Vec::new(),
            fail_log: false,
            marked_log: Vec::new(),
            full_log: Vec::new(),
            next_id: "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678".to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ScriptedBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn fail(command: &str) -> BackendError {
        BackendError::new(command, Some(1), format!("scripted failure: {command}"))
    }
}

impl VersionControlBackend for ScriptedBackend {
    fn is_versioned(&self) -> BackendResult<bool> {
        self.record("is_versioned".to_string());
        Ok(self.versioned)
    }

    fn stage(&self, path: &Path) -> BackendResult<()> {
        let call = format!("stage {}", path.display());
        self.record(call.clone());
        if self.fail_stage.is_some_and(|p| Path::new(p) == path) {
            return Err(Self::fail(&call));
        }
        Ok(())
    }

    fn has_staged_changes(&self) -> BackendResult<bool> {
        self.record("has_staged_changes".to_string());
        Ok(self.staged_changes)
    }

    fn commit(&self, message: &str) -> BackendResult<String> {
        let call = format!("commit {message}");
        self.record(call.clone());
        if self.fail_commit {
            return Err(Self::fail(&call));
        }
        Ok(self.next_id.clone())
    }

    fn is_modified(&self, path: &Path) -> BackendResult<bool> {
        self.record(format!("is_modified {}", path.display()));
        Ok(self.modified)
    }

    fn checkout_path(&self, revision: &str, path: &Path) -> BackendResult<()> {
        let call = format!("checkout {revision} {}", path.display());
        self.record(call.clone());
        if self.fail_checkout.iter().any(|p| Path::new(p) == path) {
            return Err(Self::fail(&call));
        }
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> BackendResult<()> {
        let call = format!("push {remote} {branch}");
        self.record(call.clone());
        if self.fail_push {
            return Err(Self::fail(&call));
        }
        Ok(())
    }

    fn log(&self, query: &LogQuery<'_>) -> BackendResult<Vec<String>> {
        let call = format!(
            "log {} {}",
            query.path.display(),
            query.message_contains.unwrap_or("*")
        );
        self.record(call.clone());
        if self.fail_log {
            return Err(Self::fail(&call));
        }
        let records = if query.message_contains.is_some() {
            &self.marked_log
        } else {
            &self.full_log
        };
        Ok(records.iter().take(query.limit).cloned().collect())
    }
}
