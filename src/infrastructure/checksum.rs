//! SHA-256 checksum service

use std::path::Path;
use std::sync::Arc;

use crate::domain::ports::{ChecksumService, FileSystem, FsResult};
use crate::domain::value_objects::ContentHash;

use super::fs::LocalFs;

/// Hashes file content read through a `FileSystem`
#[derive(Clone)]
pub struct Sha256Checksum {
    fs: Arc<dyn FileSystem>,
}

impl Sha256Checksum {
    pub fn new() -> Self {
        Self::with_fs(Arc::new(LocalFs::new()))
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl Default for Sha256Checksum {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecksumService for Sha256Checksum {
    fn checksum(&self, path: &Path) -> FsResult<ContentHash> {
        let content = self.fs.read_bytes(path)?;
        Ok(ContentHash::from_bytes(&content))
    }
}

impl std::fmt::Debug for Sha256Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Sha256Checksum")
    }
}
