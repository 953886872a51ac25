//! Lockfile entity - the durable record of repository-scoped bundles
//!
//! A pure data structure mirroring the on-disk JSON document. I/O is handled
//! by a `LockfileRepository`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CommitMode;

/// Schema version written into new lockfiles
pub const LOCKFILE_SCHEMA_VERSION: &str = "1.0.0";

/// Default `$schema` reference for new lockfiles
pub const DEFAULT_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/bundlelock/bundlelock/main/schemas/lockfile.schema.json";

/// A tracked file of an installed bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the repository root, always with `/` separators
    pub path: String,
    /// Hex SHA-256 of the content at install/update time
    pub checksum: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            path: path.into().replace('\\', "/"),
            checksum: checksum.into(),
        }
    }

    /// True when `path` stays inside the repository root
    ///
    /// Rejects absolute paths, drive prefixes and any `..` segment, with
    /// either separator.
    pub fn is_contained(&self) -> bool {
        let path = self.path.trim();
        if path.is_empty() || path.starts_with('/') || path.starts_with('\\') {
            return false;
        }
        if path.len() >= 2 && path.as_bytes()[1] == b':' {
            return false;
        }
        path.split(['/', '\\']).all(|segment| segment != "..")
    }
}

/// Lockfile record of one installed bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub version: String,
    pub source_id: String,
    pub source_type: String,
    pub installed_at: DateTime<Utc>,
    pub commit_mode: CommitMode,
    /// Checksum of the downloaded archive, when the installer reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Registry source a bundle was installed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    #[serde(rename = "type")]
    pub source_type: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubEntry {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    pub name: String,
    #[serde(default)]
    pub bundle_ids: Vec<String>,
}

/// The lockfile document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lockfile {
    #[serde(rename = "$schema")]
    pub schema: String,
    /// Schema version of the document format
    pub version: String,
    pub generated_at: DateTime<Utc>,
    /// `<tool>@<version>` that last wrote the file
    pub generated_by: String,
    #[serde(default)]
    pub bundles: BTreeMap<String, BundleEntry>,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hubs: Option<BTreeMap<String, HubEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<BTreeMap<String, ProfileEntry>>,
}

impl Lockfile {
    /// Create an empty lockfile stamped with the current time
    pub fn new(schema: impl Into<String>, generated_by: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            version: LOCKFILE_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            generated_by: generated_by.into(),
            bundles: BTreeMap::new(),
            sources: BTreeMap::new(),
            hubs: None,
            profiles: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn bundle(&self, bundle_id: &str) -> Option<&BundleEntry> {
        self.bundles.get(bundle_id)
    }

    /// Insert or replace a bundle entry wholesale
    pub fn upsert_bundle(&mut self, bundle_id: impl Into<String>, entry: BundleEntry) {
        self.bundles.insert(bundle_id.into(), entry);
    }

    pub fn upsert_source(&mut self, source_id: impl Into<String>, source: SourceEntry) {
        self.sources.insert(source_id.into(), source);
    }

    pub fn upsert_hub(&mut self, hub_id: impl Into<String>, hub: HubEntry) {
        self.hubs
            .get_or_insert_with(BTreeMap::new)
            .insert(hub_id.into(), hub);
    }

    pub fn upsert_profile(&mut self, profile_id: impl Into<String>, profile: ProfileEntry) {
        self.profiles
            .get_or_insert_with(BTreeMap::new)
            .insert(profile_id.into(), profile);
    }

    pub fn remove_bundle(&mut self, bundle_id: &str) -> Option<BundleEntry> {
        self.bundles.remove(bundle_id)
    }

    /// Check whether any bundle still references a source
    pub fn is_source_referenced(&self, source_id: &str) -> bool {
        self.bundles.values().any(|b| b.source_id == source_id)
    }

    /// Drop sources no bundle references; returns the removed ids
    pub fn prune_orphaned_sources(&mut self) -> Vec<String> {
        let orphaned: Vec<String> = self
            .sources
            .keys()
            .filter(|id| !self.is_source_referenced(id))
            .cloned()
            .collect();
        for id in &orphaned {
            self.sources.remove(id);
        }
        orphaned
    }

    /// Refresh the generation stamp before a write
    pub fn touch(&mut self, generated_by: impl Into<String>) {
        self.generated_at = Utc::now();
        self.generated_by = generated_by.into();
    }
}

/// How a tracked file diverged from its recorded checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModificationType {
    /// File exists but its content changed
    Modified,
    /// File is gone or could not be hashed
    Missing,
}

/// A drifted file reported by drift detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedFileInfo {
    pub path: String,
    pub original_checksum: String,
    /// Empty when the file is missing
    pub current_checksum: String,
    pub modification_type: ModificationType,
}
