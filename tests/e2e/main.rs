//! E2E test suite entry point.
//!
//! Every workflow drives a real `git` against a temporary store root. Tests
//! skip when no `git` binary is installed.

mod checkpoint_workflow;
mod history_workflow;
mod publish_workflow;
mod rollback_workflow;

/// Skip the calling test when `git` is not installed.
#[macro_export]
macro_rules! require_git {
    () => {
        if !sfwr::test_utils::git_available() {
            eprintln!("[SKIP] git binary not available, skipping test");
            return Ok(());
        }
    };
}
