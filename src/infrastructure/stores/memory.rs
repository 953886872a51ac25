//! In-memory bundle store
//!
//! Keeps user and workspace installs for hosts that track them in process,
//! and serves as the store double in tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::InstalledBundle;
use crate::domain::ports::{BundleStore, StoreResult};
use crate::domain::value_objects::Scope;

#[derive(Debug, Default)]
pub struct MemoryBundleStore {
    bundles: Mutex<BTreeMap<(Scope, String), InstalledBundle>>,
}

impl MemoryBundleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<(Scope, String), InstalledBundle>> {
        self.bundles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BundleStore for MemoryBundleStore {
    fn installed(&self, bundle_id: &str, scope: Scope) -> StoreResult<Option<InstalledBundle>> {
        Ok(self.lock().get(&(scope, bundle_id.to_string())).cloned())
    }

    fn record(&self, bundle: InstalledBundle) -> StoreResult<()> {
        self.lock()
            .insert((bundle.scope, bundle.bundle_id.clone()), bundle);
        Ok(())
    }

    fn forget(&self, bundle_id: &str, scope: Scope) -> StoreResult<()> {
        self.lock().remove(&(scope, bundle_id.to_string()));
        Ok(())
    }

    fn list(&self, scope: Scope) -> StoreResult<Vec<InstalledBundle>> {
        Ok(self
            .lock()
            .iter()
            .filter(|((s, _), _)| *s == scope)
            .map(|(_, bundle)| bundle.clone())
            .collect())
    }
}
