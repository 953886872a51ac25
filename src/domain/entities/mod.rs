//! Domain Entities
//!
//! Core domain entities that have identity and lifecycle.
//! - `Lockfile` - durable record of repository-scoped bundles
//! - `Bundle` - a published listing, and its consolidated view
//! - `InstalledBundle` - a bundle installed at one scope

mod bundle;
mod installed;
mod lockfile;

pub use bundle::{Bundle, BundleVersion, ConsolidatedBundle};
pub use installed::InstalledBundle;
pub use lockfile::{
    BundleEntry, FileEntry, HubEntry, Lockfile, ModificationType, ModifiedFileInfo, ProfileEntry,
    SourceEntry, DEFAULT_SCHEMA_URL, LOCKFILE_SCHEMA_VERSION,
};
