//! Rollback executor.
//!
//! Restores the database file (and best-effort the asset directory) to the
//! content recorded at a prior checkpoint. History is never rewritten.
//!
//! Callers own any open handle to the database file: close it before calling
//! [`RollbackExecutor::rollback`] and open a fresh one after it returns `Ok`.

use serde::Serialize;

use crate::error::{Result, SfwrError};
use crate::versioning::StoreLayout;
use crate::versioning::backend::VersionControlBackend;

/// What a successful rollback did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackOutcome {
    pub target: String,
    /// `false` when the asset directory could not be restored, typically
    /// because it did not exist at `target`.
    pub assets_restored: bool,
}

pub struct RollbackExecutor<'a, B> {
    backend: &'a B,
    layout: &'a StoreLayout,
}

impl<'a, B: VersionControlBackend> RollbackExecutor<'a, B> {
    pub const fn new(backend: &'a B, layout: &'a StoreLayout) -> Self {
        Self { backend, layout }
    }

    /// Restore the working store to the snapshot recorded under `target`.
    ///
    /// Fails with [`SfwrError::UnsavedChanges`] without touching any file when
    /// the database differs from the last checkpoint in any way.
    pub fn rollback(&self, target: &str) -> Result<RollbackOutcome> {
        let target = target.trim();
        let database = &self.layout.database;

        if !self.backend.is_versioned().map_err(SfwrError::Backend)? {
            return Err(SfwrError::NotVersioned(self.layout.root.clone()));
        }

        let dirty = self
            .backend
            .is_modified(database)
            .map_err(SfwrError::Backend)?;
        if dirty {
            return Err(SfwrError::UnsavedChanges(database.clone()));
        }

        self.backend
            .checkout_path(target, database)
            .map_err(|source| SfwrError::RestoreFailed {
                target: target.to_string(),
                source,
            })?;
        tracing::info!(target, database = %database.display(), "database restored");

        // The asset directory may not have existed at `target`.
        let assets_restored = match self.backend.checkout_path(target, &self.layout.assets) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(target, error = %err, "asset directory not restored");
                false
            }
        };

        Ok(RollbackOutcome {
            target: target.to_string(),
            assets_restored,
        })
    }
}
