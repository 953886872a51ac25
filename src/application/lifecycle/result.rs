//! Lifecycle outcomes

use crate::domain::entities::{InstalledBundle, ModifiedFileInfo};
use crate::domain::services::{MigrationResult, ScopeConflict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(InstalledBundle),
    /// Installed at another scope and migration was not allowed; nothing changed
    Conflict(ScopeConflict),
    /// Installed at another scope and moved here
    Migrated(MigrationResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(InstalledBundle),
    /// Tracked files were edited locally; nothing changed, ask the user
    DriftDetected(Vec<ModifiedFileInfo>),
    /// The caller chose to keep the local edits
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    Removed(InstalledBundle),
    NotInstalled,
}

impl InstallOutcome {
    /// True when the bundle is now installed at the requested scope
    pub fn is_installed(&self) -> bool {
        match self {
            InstallOutcome::Installed(_) => true,
            InstallOutcome::Conflict(_) => false,
            InstallOutcome::Migrated(result) => result.success,
        }
    }
}
