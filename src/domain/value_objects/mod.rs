//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod commit_mode;
mod hash;
mod identity;
mod scope;
mod source_type;

pub use commit_mode::CommitMode;
pub use hash::ContentHash;
pub use identity::{strip_version_suffix, BundleIdentity};
pub use scope::Scope;
pub use source_type::SourceType;
