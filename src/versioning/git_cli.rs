//! `git` command-line backend.
//!
//! Every call spawns `git` in the store root and blocks until it exits.
//! There is no timeout: a hung `git` (for example a push waiting on the
//! network) hangs the caller.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::BackendError;
use crate::versioning::backend::{BackendResult, LogQuery, VersionControlBackend};

/// Backend that shells out to the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Path to git binary (default: "git")
    git_bin: PathBuf,
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            git_bin: PathBuf::from("git"),
            root: root.into(),
        }
    }

    /// Use a custom git binary.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.git_bin = binary.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if the git binary can be found.
    pub fn is_available(&self) -> bool {
        which::which(&self.git_bin).is_ok()
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.git_bin);
        cmd.args(args)
            .current_dir(&self.root)
            .env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }

    /// Run to completion and return raw output regardless of exit status.
    fn output(&self, mut cmd: Command) -> BackendResult<(String, Output)> {
        let line = command_string(&cmd);
        tracing::debug!(command = %line, root = %self.root.display(), "running git");
        let output = cmd
            .output()
            .map_err(|err| BackendError::spawn(line.clone(), &err))?;
        Ok((line, output))
    }

    /// Run and require success; returns stdout.
    fn run(&self, cmd: Command) -> BackendResult<String> {
        let (line, output) = self.output(cmd)?;
        if !output.status.success() {
            return Err(failure(line, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a `--quiet`/`--exit-code` style command: 0 is `false`, 1 is `true`.
    fn run_differs(&self, cmd: Command) -> BackendResult<bool> {
        let (line, output) = self.output(cmd)?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(failure(line, &output)),
        }
    }

    fn has_head(&self) -> BackendResult<bool> {
        let (_, output) = self.output(self.command(["rev-parse", "--verify", "--quiet", "HEAD"]))?;
        Ok(output.status.success())
    }
}

impl VersionControlBackend for GitCli {
    fn is_versioned(&self) -> BackendResult<bool> {
        let (_, output) = self.output(self.command(["rev-parse", "--is-inside-work-tree"]))?;
        Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    fn stage(&self, path: &Path) -> BackendResult<()> {
        let mut cmd = self.command(["add", "--"]);
        cmd.arg(path);
        self.run(cmd).map(|_| ())
    }

    fn has_staged_changes(&self) -> BackendResult<bool> {
        self.run_differs(self.command(["diff", "--cached", "--quiet"]))
    }

    fn commit(&self, message: &str) -> BackendResult<String> {
        self.run(self.command(["commit", "--quiet", "-m", message]))?;
        let head = self.run(self.command(["rev-parse", "HEAD"]))?;
        Ok(head.trim().to_string())
    }

    fn is_modified(&self, path: &Path) -> BackendResult<bool> {
        let mut cmd = self.command(["status", "--porcelain", "--untracked-files=all", "--"]);
        cmd.arg(path);
        let status = self.run(cmd)?;
        Ok(!status.trim().is_empty())
    }

    fn checkout_path(&self, revision: &str, path: &Path) -> BackendResult<()> {
        if revision.is_empty() || revision.starts_with('-') {
            return Err(BackendError::new(
                format!("git checkout {revision} -- {}", path.display()),
                None,
                format!("refusing to use {revision:?} as a revision"),
            ));
        }
        let mut cmd = self.command(["checkout", revision, "--"]);
        cmd.arg(path);
        self.run(cmd).map(|_| ())
    }

    fn push(&self, remote: &str, branch: &str) -> BackendResult<()> {
        self.run(self.command(["push", "--quiet", remote, branch]))
            .map(|_| ())
    }

    fn log(&self, query: &LogQuery<'_>) -> BackendResult<Vec<String>> {
        if !self.has_head()? {
            return Ok(Vec::new());
        }

        let limit = query.limit.to_string();
        let mut cmd = self.command(["log", "--format=%H%x1f%s%x1f%cI", "-n", &limit]);
        if let Some(text) = query.message_contains {
            cmd.arg("--fixed-strings").arg(format!("--grep={text}"));
        }
        cmd.arg("--").arg(query.path);

        let stdout = self.run(cmd)?;
        Ok(stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }
}

fn failure(command: String, output: &Output) -> BackendError {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    BackendError::new(command, output.status.code(), combined)
}

fn command_string(cmd: &Command) -> String {
    let mut parts = Vec::new();
    parts.push(cmd.get_program().to_string_lossy().to_string());
    for arg in cmd.get_args() {
        parts.push(arg.to_string_lossy().to_string());
    }
    parts.join(" ")
}
