//! Bundlelock - bundle registry consistency engine
//!
//! Keeps a repository's bundle lockfile consistent with what is installed:
//! atomic serialized lockfile writes, drift detection, version consolidation
//! across release-based sources, and one-scope-per-bundle installs.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    BundleLifecycleCoordinator, DriftDecision, InstallOutcome, InstallRequest, MigrateRequest,
    UninstallOutcome, UpdateOutcome,
};
pub use config::Config;
pub use domain::entities::{Bundle, InstalledBundle, Lockfile, ModifiedFileInfo};
pub use domain::ports::{BundleStore, Installer, LockfileRepository};
pub use domain::services::{ScopeConflictResolver, VersionConsolidator};
pub use domain::value_objects::{BundleIdentity, CommitMode, Scope, SourceType};
pub use error::{BundleLockError, BundleLockResult};
pub use infrastructure::{
    JsonLockfileRepository, LockfileRepositoryRegistry, LockfileWatcher, MemoryBundleStore,
};
