//! Lockfile repository registry
//!
//! Hands out one shared `JsonLockfileRepository` per repository root so that
//! every writer for a root goes through the same write lock. Owned by the
//! host and passed to whoever needs it; there is no process-wide instance.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::ports::{ChecksumService, FileSystem, SchemaValidator};
use crate::infrastructure::checksum::Sha256Checksum;
use crate::infrastructure::fs::LocalFs;
use crate::infrastructure::validation::BuiltinSchemaValidator;

use super::lockfile::{JsonLockfileRepository, LockfileSettings};

pub struct LockfileRepositoryRegistry {
    settings: LockfileSettings,
    fs: Arc<dyn FileSystem>,
    checksums: Arc<dyn ChecksumService>,
    validator: Arc<dyn SchemaValidator>,
    repositories: Mutex<HashMap<PathBuf, Arc<JsonLockfileRepository>>>,
}

impl LockfileRepositoryRegistry {
    pub fn new(settings: LockfileSettings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(LocalFs::new());
        Self::with_parts(
            settings,
            fs.clone(),
            Arc::new(Sha256Checksum::with_fs(fs)),
            Arc::new(BuiltinSchemaValidator::new()),
        )
    }

    pub fn with_parts(
        settings: LockfileSettings,
        fs: Arc<dyn FileSystem>,
        checksums: Arc<dyn ChecksumService>,
        validator: Arc<dyn SchemaValidator>,
    ) -> Self {
        Self {
            settings,
            fs,
            checksums,
            validator,
            repositories: Mutex::new(HashMap::new()),
        }
    }

    /// The repository for `root`, created on first request
    pub fn repository_for(&self, root: &Path) -> Arc<JsonLockfileRepository> {
        let key = normalize_root(root);
        self.lock()
            .entry(key.clone())
            .or_insert_with(|| {
                tracing::debug!(root = %key.display(), "creating lockfile repository");
                Arc::new(JsonLockfileRepository::with_parts(
                    key.clone(),
                    self.settings.clone(),
                    self.fs.clone(),
                    self.checksums.clone(),
                    self.validator.clone(),
                ))
            })
            .clone()
    }

    /// Drop the registry's handle for `root`; true if one existed
    pub fn forget(&self, root: &Path) -> bool {
        self.lock().remove(&normalize_root(root)).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<JsonLockfileRepository>>> {
        self.repositories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LockfileRepositoryRegistry {
    fn default() -> Self {
        Self::new(LockfileSettings::default())
    }
}

/// Canonical path when the root exists, otherwise the path as given
fn normalize_root(root: &Path) -> PathBuf {
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}
