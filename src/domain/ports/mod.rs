//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations; hosts may supply
//! their own installer, validator, and bundle store.

pub mod bundle_store;
pub mod checksum;
pub mod file_system;
pub mod installer;
pub mod lockfile_repository;
pub mod schema_validator;

pub use bundle_store::{BundleStore, StoreError, StoreResult};
pub use checksum::ChecksumService;
pub use file_system::{FileSystem, FsError, FsResult};
pub use installer::{InstallTarget, InstalledArtifacts, Installer, InstallerError};
pub use lockfile_repository::{
    CreateOrUpdateOptions, LockfileChanged, LockfileError, LockfileRepository, LockfileResult,
    LockfileValidation, SourceOptions,
};
pub use schema_validator::{SchemaValidator, ValidationReport};
