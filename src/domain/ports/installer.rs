//! Installer port
//!
//! Acquisition and placement of bundle content (download, extract, copy) is
//! owned by the host. The lifecycle coordinator only records what an
//! installer reports as placed.

use std::path::PathBuf;

use crate::domain::entities::InstalledBundle;
use crate::domain::value_objects::{CommitMode, Scope};

/// A fully resolved install request handed to the installer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// Stable key the install is tracked under
    pub bundle_id: String,
    /// Id of the listing that publishes the resolved version
    pub listing_id: String,
    pub version: String,
    pub source_id: String,
    pub source_type: String,
    pub download_url: Option<String>,
    pub commit_mode: CommitMode,
}

/// Files an installer has placed on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledArtifacts {
    /// Directory the file paths are relative to
    pub install_root: PathBuf,
    /// Placed files, relative to `install_root`
    pub files: Vec<PathBuf>,
    /// Checksum of the downloaded archive, if any
    pub archive_checksum: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InstallerError {
    #[error("failed to install '{bundle_id}' at {scope} scope: {message}")]
    InstallFailed {
        bundle_id: String,
        scope: Scope,
        message: String,
    },

    #[error("failed to remove '{bundle_id}' from {scope} scope: {message}")]
    UninstallFailed {
        bundle_id: String,
        scope: Scope,
        message: String,
    },
}

pub trait Installer: Send + Sync {
    /// Acquire and place a bundle's files at `scope`
    fn install(&self, target: &InstallTarget, scope: Scope)
        -> Result<InstalledArtifacts, InstallerError>;

    /// Remove an installed bundle's files
    fn uninstall(&self, bundle: &InstalledBundle) -> Result<(), InstallerError>;
}
