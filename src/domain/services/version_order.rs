//! Latest-first ordering of bundle listings
//!
//! A group is ordered by one strategy so the result is always a total order:
//! semantic version when every version parses, last-updated timestamps when
//! every listing has one, and input order otherwise.

use std::cmp::Reverse;

use semver::Version;

use crate::domain::entities::Bundle;

/// Which strategy ordered a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingStrategy {
    SemanticVersion,
    LastUpdated,
    InputOrder,
}

/// Parse a listing version, tolerating a leading `v`
pub fn parse_version(version: &str) -> Option<Version> {
    let trimmed = version.trim();
    let raw = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(raw).ok()
}

/// Sort listings latest first; ties keep their input order
pub fn sort_latest_first(bundles: &mut [Bundle]) -> OrderingStrategy {
    let versions: Option<Vec<Version>> = bundles.iter().map(|b| parse_version(&b.version)).collect();

    if let Some(versions) = versions {
        let mut keyed: Vec<(Version, Bundle)> = versions
            .into_iter()
            .zip(bundles.iter().cloned())
            .collect();
        keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
        for (slot, (_, bundle)) in bundles.iter_mut().zip(keyed) {
            *slot = bundle;
        }
        return OrderingStrategy::SemanticVersion;
    }

    if bundles.iter().all(|b| b.last_updated.is_some()) {
        bundles.sort_by_key(|b| Reverse(b.last_updated));
        return OrderingStrategy::LastUpdated;
    }

    OrderingStrategy::InputOrder
}
