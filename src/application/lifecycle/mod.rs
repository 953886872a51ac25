//! Bundle Lifecycle Use Case
//!
//! Orchestrates install, update, uninstall and scope migration:
//! 1. Check for the bundle at other scopes
//! 2. Resolve the version to install
//! 3. Hand acquisition to the host installer
//! 4. Record what was placed (lockfile or bundle store)
//!
//! Nothing is recorded until the installer reports success.

mod options;
mod result;
mod use_case;

#[cfg(test)]
mod tests;

pub use options::{DriftDecision, InstallRequest, MigrateRequest};
pub use result::{InstallOutcome, UninstallOutcome, UpdateOutcome};
pub use use_case::BundleLifecycleCoordinator;
