//! ChecksumService port
//!
//! Content hashing of installed files, used when recording a bundle and
//! when checking it for drift.

use std::path::Path;

use crate::domain::value_objects::ContentHash;

use super::file_system::FsResult;

pub trait ChecksumService: Send + Sync {
    /// Hash the content of the file at `path`
    fn checksum(&self, path: &Path) -> FsResult<ContentHash>;
}
