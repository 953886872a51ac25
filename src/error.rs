//! Error types for bundlelock
//!
//! Each port has its own `thiserror` enum; `BundleLockError` gathers them
//! for the application layer and the CLI.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::ports::{FsError, InstallerError, LockfileError, StoreError};
use crate::domain::services::CacheConfigError;
use crate::domain::value_objects::Scope;
use crate::infrastructure::watch::WatchError;

/// Result type alias for bundlelock operations
pub type BundleLockResult<T> = Result<T, BundleLockError>;

/// Main error type for bundlelock operations
#[derive(Error, Debug)]
pub enum BundleLockError {
    #[error(transparent)]
    Lockfile(#[from] LockfileError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Installer(#[from] InstallerError),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Cache(#[from] CacheConfigError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Watch(#[from] WatchError),

    /// A pinned version no known listing publishes
    #[error("version '{version}' of '{bundle_id}' is not available")]
    VersionNotFound { bundle_id: String, version: String },

    #[error("'{bundle_id}' is not installed at {scope} scope")]
    NotInstalled { bundle_id: String, scope: Scope },

    /// Installer reported a file that is not where it said
    #[error("installed file '{}' {message}", path.display())]
    Artifact { path: PathBuf, message: String },
}
