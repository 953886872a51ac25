//! Use Case Factory
//!
//! Creates repositories and use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::Path;
use std::sync::Arc;

use crate::application::BundleLifecycleCoordinator;
use crate::config::Config;
use crate::domain::ports::{BundleStore, Installer};
use crate::domain::services::VersionConsolidator;
use crate::error::BundleLockResult;
use crate::infrastructure::{JsonLockfileRepository, LockfileRepositoryRegistry, Sha256Checksum};

/// Registry handing out one shared repository per root
pub fn create_repository_registry(config: &Config) -> LockfileRepositoryRegistry {
    LockfileRepositoryRegistry::new(config.lockfile_settings())
}

/// The registry's lockfile repository for `root`
pub fn create_lockfile_repository(
    registry: &LockfileRepositoryRegistry,
    root: &Path,
) -> Arc<JsonLockfileRepository> {
    registry.repository_for(root)
}

/// Create a lifecycle coordinator for one repository root
///
/// The lockfile repository comes from `registry`, so every coordinator for
/// the same root shares one write queue. The host supplies the installer and
/// the store for user and workspace scopes. Fails when the configured cache
/// size is zero.
pub fn create_lifecycle_coordinator(
    registry: &LockfileRepositoryRegistry,
    root: &Path,
    config: &Config,
    installer: Arc<dyn Installer>,
    store: Arc<dyn BundleStore>,
) -> BundleLockResult<BundleLifecycleCoordinator> {
    let consolidator = VersionConsolidator::new(config.cache.max_size)?;
    Ok(BundleLifecycleCoordinator::new(
        create_lockfile_repository(registry, root),
        store,
        Arc::new(consolidator),
        installer,
        Arc::new(Sha256Checksum::new()),
    ))
}
