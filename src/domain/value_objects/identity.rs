//! Bundle Identity Value Object
//!
//! The version-independent key used to recognize that two published listings
//! are different releases of the same bundle.

use std::fmt;

use super::SourceType;

/// Version-independent bundle identity
///
/// Two listings share an identity when they come from the same source and
/// their ids agree once any trailing release version is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BundleIdentity {
    source_id: String,
    name: String,
}

impl BundleIdentity {
    pub fn new(source_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            name: name.into(),
        }
    }

    /// Derive the identity of a listing
    ///
    /// Release-based sources strip a trailing `-vMAJOR.MINOR.PATCH[-pre]`
    /// suffix from the bundle id. Every other source (and an unknown one)
    /// uses the exact id, so such listings never merge.
    pub fn extract(bundle_id: &str, source_id: &str, source_type: Option<&SourceType>) -> Self {
        let name = match source_type {
            Some(t) if t.is_release_based() => strip_version_suffix(bundle_id),
            _ => bundle_id,
        };
        Self::new(source_id, name)
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for BundleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source_id, self.name)
    }
}

/// Remove a trailing release version from a bundle id
///
/// Scans `-` separators right to left and cuts at the first one whose
/// remainder (minus an optional `v`) is a valid semantic version.
pub fn strip_version_suffix(bundle_id: &str) -> &str {
    for (idx, _) in bundle_id.rmatch_indices('-') {
        if idx == 0 {
            continue;
        }
        let rest = &bundle_id[idx + 1..];
        let candidate = rest.strip_prefix('v').unwrap_or(rest);
        if semver::Version::parse(candidate).is_ok() {
            return &bundle_id[..idx];
        }
    }
    bundle_id
}
