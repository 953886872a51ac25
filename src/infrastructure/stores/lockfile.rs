//! Lockfile-backed bundle store
//!
//! Answers repository scope from the lockfile and delegates user and
//! workspace scope to another store. This is the view the scope conflict
//! resolver needs: one index across all three scopes.

use std::sync::Arc;

use crate::domain::entities::InstalledBundle;
use crate::domain::ports::{BundleStore, LockfileRepository, StoreError, StoreResult};
use crate::domain::value_objects::Scope;

pub struct LockfileBundleStore {
    lockfile: Arc<dyn LockfileRepository>,
    others: Arc<dyn BundleStore>,
}

impl LockfileBundleStore {
    pub fn new(lockfile: Arc<dyn LockfileRepository>, others: Arc<dyn BundleStore>) -> Self {
        Self { lockfile, others }
    }

    fn unavailable(message: impl ToString) -> StoreError {
        StoreError::Unavailable {
            scope: Scope::Repository,
            message: message.to_string(),
        }
    }
}

impl BundleStore for LockfileBundleStore {
    fn installed(&self, bundle_id: &str, scope: Scope) -> StoreResult<Option<InstalledBundle>> {
        if !scope.is_tracked_by_lockfile() {
            return self.others.installed(bundle_id, scope);
        }
        let lockfile = self.lockfile.load().map_err(Self::unavailable)?;
        Ok(lockfile.and_then(|lockfile| {
            lockfile
                .bundle(bundle_id)
                .map(|entry| InstalledBundle::from_lockfile_entry(bundle_id, entry))
        }))
    }

    /// Repository-scope records are written through the lockfile repository,
    /// which needs file checksums this record does not carry.
    fn record(&self, bundle: InstalledBundle) -> StoreResult<()> {
        if bundle.scope.is_tracked_by_lockfile() {
            return Err(StoreError::UpdateFailed {
                scope: bundle.scope,
                message: "repository installs are recorded through the lockfile".to_string(),
            });
        }
        self.others.record(bundle)
    }

    fn forget(&self, bundle_id: &str, scope: Scope) -> StoreResult<()> {
        if !scope.is_tracked_by_lockfile() {
            return self.others.forget(bundle_id, scope);
        }
        self.lockfile
            .remove(bundle_id)
            .map(|_| ())
            .map_err(|e| StoreError::UpdateFailed {
                scope,
                message: e.to_string(),
            })
    }

    fn list(&self, scope: Scope) -> StoreResult<Vec<InstalledBundle>> {
        if !scope.is_tracked_by_lockfile() {
            return self.others.list(scope);
        }
        let lockfile = self.lockfile.load().map_err(Self::unavailable)?;
        Ok(lockfile
            .map(|lockfile| {
                lockfile
                    .bundles
                    .iter()
                    .map(|(id, entry)| InstalledBundle::from_lockfile_entry(id, entry))
                    .collect()
            })
            .unwrap_or_default())
    }
}
