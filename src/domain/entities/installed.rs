//! Installed bundle entity
//!
//! What a scope index knows about a bundle installed at one scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CommitMode, Scope};

use super::lockfile::BundleEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledBundle {
    pub bundle_id: String,
    pub version: String,
    pub scope: Scope,
    pub source_id: String,
    pub source_type: String,
    pub installed_at: DateTime<Utc>,
    pub commit_mode: CommitMode,
    /// Installed files, relative to the scope's install root
    #[serde(default)]
    pub files: Vec<String>,
}

impl InstalledBundle {
    /// View of a lockfile entry as a repository-scoped install
    pub fn from_lockfile_entry(bundle_id: &str, entry: &BundleEntry) -> Self {
        Self {
            bundle_id: bundle_id.to_string(),
            version: entry.version.clone(),
            scope: Scope::Repository,
            source_id: entry.source_id.clone(),
            source_type: entry.source_type.clone(),
            installed_at: entry.installed_at,
            commit_mode: entry.commit_mode,
            files: entry.files.iter().map(|f| f.path.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FileEntry;

    #[test]
    fn from_lockfile_entry_is_repository_scoped() {
        let entry = BundleEntry {
            version: "1.2.0".to_string(),
            source_id: "gh".to_string(),
            source_type: "github".to_string(),
            installed_at: Utc::now(),
            commit_mode: CommitMode::LocalOnly,
            checksum: None,
            files: vec![FileEntry::new("a.md", "abc")],
        };

        let installed = InstalledBundle::from_lockfile_entry("b", &entry);
        assert_eq!(installed.scope, Scope::Repository);
        assert_eq!(installed.version, "1.2.0");
        assert_eq!(installed.commit_mode, CommitMode::LocalOnly);
        assert_eq!(installed.files, vec!["a.md".to_string()]);
    }
}
