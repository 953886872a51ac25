//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local file system
//! - `checksum` - SHA-256 content hashing
//! - `validation/` - Built-in lockfile schema validator
//! - `repositories/` - JSON lockfile repository and its per-root registry
//! - `stores/` - Bundle stores (in-memory, lockfile-backed)
//! - `watch/` - Lockfile watcher (notify)

pub mod checksum;
pub mod fs;
pub mod repositories;
pub mod stores;
pub mod validation;
pub mod watch;

// Re-export for convenience
pub use checksum::Sha256Checksum;
pub use fs::LocalFs;
pub use repositories::{
    ExternalChange, JsonLockfileRepository, LockfileRepositoryRegistry, LockfileSettings,
};
pub use stores::{LockfileBundleStore, MemoryBundleStore};
pub use validation::BuiltinSchemaValidator;
pub use watch::{LockfileWatcher, WatchError};
