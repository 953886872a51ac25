//! Lifecycle request types

use crate::domain::entities::Bundle;
use crate::domain::value_objects::{CommitMode, Scope};

/// Install or update a bundle at a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Listing the request was made from
    pub bundle: Bundle,
    pub scope: Scope,
    /// Exact version to install; `None` resolves the latest known version
    pub pinned_version: Option<String>,
    pub commit_mode: CommitMode,
    /// Source URL recorded in the lockfile for repository-scope installs
    pub source_url: String,
    pub branch: Option<String>,
    /// Move the bundle here if it is installed at another scope
    pub allow_migration: bool,
}

impl InstallRequest {
    pub fn new(bundle: Bundle, scope: Scope, source_url: impl Into<String>) -> Self {
        Self {
            bundle,
            scope,
            pinned_version: None,
            commit_mode: CommitMode::default(),
            source_url: source_url.into(),
            branch: None,
            allow_migration: false,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.pinned_version = Some(version.into());
        self
    }

    pub fn with_commit_mode(mut self, mode: CommitMode) -> Self {
        self.commit_mode = mode;
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn allow_migration(mut self, allow: bool) -> Self {
        self.allow_migration = allow;
        self
    }
}

/// Move an installed bundle between scopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateRequest {
    pub bundle_id: String,
    pub from_scope: Scope,
    pub to_scope: Scope,
    /// Needed when the destination is repository scope
    pub source_url: String,
    pub branch: Option<String>,
}

/// What to do when an update would overwrite locally edited files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftDecision {
    /// Overwrite the local edits
    Override,
    /// Leave everything as it is
    Abort,
}
