//! Scope value object - defines where a bundle is installed
//!
//! - `User` scope: global, in the user's profile
//! - `Workspace` scope: a single project instance, not version-controlled
//! - `Repository` scope: version-controlled and shared, tracked by the lockfile

use serde::{Deserialize, Serialize};

/// Installation scope of a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// User-level (global)
    User,
    /// Workspace-level (single project instance)
    Workspace,
    /// Repository-level (committed, shared through the lockfile)
    Repository,
}

impl Scope {
    /// All scopes in their fixed check order
    pub const ALL: [Scope; 3] = [Scope::User, Scope::Workspace, Scope::Repository];

    /// Returns true if installs at this scope are recorded in the lockfile
    pub fn is_tracked_by_lockfile(&self) -> bool {
        matches!(self, Scope::Repository)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::User => "user",
            Scope::Workspace => "workspace",
            Scope::Repository => "repository",
        }
    }

    /// Every scope except `self`, in check order
    pub fn others(self) -> impl Iterator<Item = Scope> {
        Self::ALL.into_iter().filter(move |s| *s != self)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Scope::User),
            "workspace" => Ok(Scope::Workspace),
            "repository" | "repo" => Ok(Scope::Repository),
            other => Err(format!("unknown scope '{}'", other)),
        }
    }
}
