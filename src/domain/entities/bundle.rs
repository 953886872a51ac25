//! Bundle listings as published by registry sources
//!
//! A `Bundle` is one raw listing. Release-based sources publish one listing
//! per version, which the version consolidator folds into a single
//! `ConsolidatedBundle` carrying every known `BundleVersion`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{BundleIdentity, SourceType};

/// A published bundle listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: String,
    pub name: String,
    pub version: String,
    pub source_id: String,
    /// Explicit source type, when the listing carries it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Bundle {
    /// Minimal listing, mostly useful for tests and hosts building listings by hand
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            version: version.into(),
            source_id: source_id.into(),
            source_type: None,
            description: None,
            author: None,
            last_updated: None,
            download_url: None,
            tags: Vec::new(),
        }
    }

    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    pub fn with_last_updated(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = Some(at);
        self
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }
}

/// One known release of a bundle identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleVersion {
    pub version: String,
    /// Id of the listing that published this version
    pub bundle_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl From<&Bundle> for BundleVersion {
    fn from(bundle: &Bundle) -> Self {
        Self {
            version: bundle.version.clone(),
            bundle_id: bundle.id.clone(),
            published_at: bundle.last_updated,
            download_url: bundle.download_url.clone(),
        }
    }
}

/// Canonical view of one bundle identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedBundle {
    pub identity: BundleIdentity,
    /// Metadata of the latest listing
    pub bundle: Bundle,
    /// True when more than one listing was folded together
    pub is_consolidated: bool,
    /// All known versions, latest first
    pub available_versions: Vec<BundleVersion>,
}

impl ConsolidatedBundle {
    /// Version of the canonical listing
    pub fn version(&self) -> &str {
        &self.bundle.version
    }

    pub fn version_strings(&self) -> Vec<&str> {
        self.available_versions
            .iter()
            .map(|v| v.version.as_str())
            .collect()
    }
}
