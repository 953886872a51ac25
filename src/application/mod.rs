//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `BundleLifecycleCoordinator` - install, update, uninstall and scope migration

pub mod lifecycle;

pub use lifecycle::{
    BundleLifecycleCoordinator, DriftDecision, InstallOutcome, InstallRequest, MigrateRequest,
    UninstallOutcome, UpdateOutcome,
};
