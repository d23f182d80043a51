//! Git repository setup for the working store

use std::path::Path;

use git2::{Repository, RepositoryInitOptions};

use crate::error::Result;

/// SQLite side files that must never be checkpointed.
const GITIGNORE: &str = "*.db-journal\n*.db-wal\n*.db-shm\n";

/// The git repository holding checkpoint history for a store root.
pub struct StoreRepository {
    repo: Repository,
}

impl StoreRepository {
    /// Open the repository at `path`, initializing it on `branch` if needed.
    pub fn open_or_init(path: impl AsRef<Path>, branch: &str) -> Result<Self> {
        let path = path.as_ref();

        // Ensure directory exists
        std::fs::create_dir_all(path)?;

        let repo = match Repository::open(path) {
            Ok(repo) => repo,
            Err(_) => {
                let mut opts = RepositoryInitOptions::new();
                opts.initial_head(branch);
                tracing::info!(root = %path.display(), branch, "initializing checkpoint repository");
                Repository::init_opts(path, &opts)?
            }
        };

        let store = Self { repo };
        store.ensure_gitignore()?;
        Ok(store)
    }

    /// Get a reference to the repository
    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Add `name` as a remote unless one with that name already exists.
    /// Returns whether a remote was added.
    pub fn ensure_remote(&self, name: &str, url: &str) -> Result<bool> {
        if self.repo.find_remote(name).is_ok() {
            return Ok(false);
        }
        self.repo.remote(name, url)?;
        Ok(true)
    }

    /// Set the commit identity in the repository's local config.
    pub fn set_identity(&self, name: &str, email: &str) -> Result<()> {
        let mut config = self.repo.config()?;
        config.set_str("user.name", name)?;
        config.set_str("user.email", email)?;
        Ok(())
    }

    fn ensure_gitignore(&self) -> Result<()> {
        let Some(workdir) = self.repo.workdir() else {
            return Ok(());
        };
        let path = workdir.join(".gitignore");
        if !path.exists() {
            std::fs::write(&path, GITIGNORE)?;
        }
        Ok(())
    }
}
