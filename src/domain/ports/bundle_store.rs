//! BundleStore port
//!
//! Scope-aware index of installed bundles. The scope conflict resolver asks
//! it where a bundle lives; the lifecycle coordinator keeps it current for
//! the scopes the lockfile does not cover.

use crate::domain::entities::InstalledBundle;
use crate::domain::value_objects::Scope;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("failed to read installed bundles at {scope} scope: {message}")]
    Unavailable { scope: Scope, message: String },

    #[error("failed to update installed bundles at {scope} scope: {message}")]
    UpdateFailed { scope: Scope, message: String },
}

pub trait BundleStore: Send + Sync {
    /// The install record of `bundle_id` at `scope`, if any
    fn installed(&self, bundle_id: &str, scope: Scope) -> StoreResult<Option<InstalledBundle>>;

    /// Record an install (replacing any previous record at the same scope)
    fn record(&self, bundle: InstalledBundle) -> StoreResult<()>;

    /// Drop the record of `bundle_id` at `scope`; no-op if absent
    fn forget(&self, bundle_id: &str, scope: Scope) -> StoreResult<()>;

    /// All bundles recorded at `scope`
    fn list(&self, scope: Scope) -> StoreResult<Vec<InstalledBundle>>;
}
