//! BundleStore implementations

mod lockfile;
mod memory;

pub use lockfile::LockfileBundleStore;
pub use memory::MemoryBundleStore;
