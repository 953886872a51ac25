//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod lockfile;
mod registry;

pub use lockfile::{
    ExternalChange, JsonLockfileRepository, LockfileSettings, DEFAULT_LOCKFILE_NAME,
};
pub use registry::LockfileRepositoryRegistry;
