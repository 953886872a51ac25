//! JSON Lockfile Repository
//!
//! Implements the LockfileRepository port on top of a `FileSystem`.
//!
//! Writes hold a per-instance lock across the whole read-modify-write cycle
//! and land on disk through a temp file in the same directory followed by a
//! rename, so readers only ever see the old or the new document.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{
    BundleEntry, FileEntry, Lockfile, ModificationType, ModifiedFileInfo, DEFAULT_SCHEMA_URL,
};
use crate::domain::ports::{
    ChecksumService, CreateOrUpdateOptions, FileSystem, LockfileChanged, LockfileError,
    LockfileRepository, LockfileResult, LockfileValidation, SchemaValidator,
};
use crate::domain::value_objects::ContentHash;
use crate::infrastructure::checksum::Sha256Checksum;
use crate::infrastructure::fs::LocalFs;
use crate::infrastructure::validation::BuiltinSchemaValidator;

/// Temp file sequence shared by every repository in the process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Default lockfile name at the repository root
pub const DEFAULT_LOCKFILE_NAME: &str = "prompt-registry.lock.json";

/// What gets written into new lockfiles and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfileSettings {
    pub file_name: String,
    pub schema_url: String,
    pub generated_by: String,
}

impl Default for LockfileSettings {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_LOCKFILE_NAME.to_string(),
            schema_url: DEFAULT_SCHEMA_URL.to_string(),
            generated_by: format!("{}@{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A change to the lockfile made outside this repository instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalChange {
    Created,
    Modified,
    Deleted,
}

/// Last on-disk state this instance observed or produced
#[derive(Debug, Clone, PartialEq, Eq)]
enum Observed {
    Unknown,
    Absent,
    Content(ContentHash),
}

pub struct JsonLockfileRepository {
    root: PathBuf,
    path: PathBuf,
    settings: LockfileSettings,
    fs: Arc<dyn FileSystem>,
    checksums: Arc<dyn ChecksumService>,
    validator: Arc<dyn SchemaValidator>,
    /// Held across every read-modify-write cycle
    write_lock: Mutex<()>,
    subscribers: Mutex<Vec<Sender<LockfileChanged>>>,
    observed: Mutex<Observed>,
}

impl JsonLockfileRepository {
    /// Repository for `root` using local disk and default settings
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_settings(root, LockfileSettings::default())
    }

    pub fn with_settings(root: impl Into<PathBuf>, settings: LockfileSettings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(LocalFs::new());
        Self::with_parts(
            root,
            settings,
            fs.clone(),
            Arc::new(Sha256Checksum::with_fs(fs)),
            Arc::new(BuiltinSchemaValidator::new()),
        )
    }

    /// Create with explicit collaborators (for hosts and tests)
    pub fn with_parts(
        root: impl Into<PathBuf>,
        settings: LockfileSettings,
        fs: Arc<dyn FileSystem>,
        checksums: Arc<dyn ChecksumService>,
        validator: Arc<dyn SchemaValidator>,
    ) -> Self {
        let root = root.into();
        let path = root.join(&settings.file_name);
        Self {
            root,
            path,
            settings,
            fs,
            checksums,
            validator,
            write_lock: Mutex::new(()),
            subscribers: Mutex::new(Vec::new()),
            observed: Mutex::new(Observed::Unknown),
        }
    }

    pub fn settings(&self) -> &LockfileSettings {
        &self.settings
    }

    /// `(bundle_id, entry)` pairs of the current lockfile, sorted by id
    pub fn list_bundles(&self) -> Vec<(String, BundleEntry)> {
        self.read()
            .map(|lockfile| lockfile.bundles.into_iter().collect())
            .unwrap_or_default()
    }

    /// Whether the lockfile is present, as seen through the file system port
    pub fn lockfile_exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    /// Record the current on-disk content as seen, without notifying
    ///
    /// Called before watching so the first external event for unchanged
    /// content is not reported.
    pub fn refresh_observed(&self) {
        let observed = match self.fs.read_bytes(&self.path) {
            Ok(bytes) => Observed::Content(ContentHash::from_bytes(&bytes)),
            Err(e) if e.is_not_found() => Observed::Absent,
            Err(_) => Observed::Unknown,
        };
        *self.lock_observed() = observed;
    }

    /// React to an external create/modify/delete of the lockfile
    ///
    /// Re-reads and notifies subscribers; never writes. Content identical to
    /// the last observed state is not reported again.
    pub fn handle_external_change(&self, change: ExternalChange) {
        let bytes = match change {
            ExternalChange::Deleted => None,
            ExternalChange::Created | ExternalChange::Modified => {
                match self.fs.read_bytes(&self.path) {
                    Ok(bytes) => Some(bytes),
                    Err(e) if e.is_not_found() => None,
                    Err(e) => {
                        tracing::warn!(path = %self.path.display(), error = %e, "failed to re-read lockfile");
                        return;
                    }
                }
            }
        };

        let Some(bytes) = bytes else {
            if self.observe(Observed::Absent) {
                tracing::debug!(path = %self.path.display(), "lockfile deleted externally");
                self.notify(None);
            }
            return;
        };

        if !self.observe(Observed::Content(ContentHash::from_bytes(&bytes))) {
            return;
        }
        match serde_json::from_slice::<Lockfile>(&bytes) {
            Ok(lockfile) => {
                tracing::debug!(path = %self.path.display(), ?change, "lockfile changed externally");
                self.notify(Some(lockfile));
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "externally changed lockfile is not valid JSON");
            }
        }
    }

    fn new_lockfile(&self) -> Lockfile {
        Lockfile::new(&self.settings.schema_url, &self.settings.generated_by)
    }

    /// Record a new observed state; false when it equals the previous one
    fn observe(&self, state: Observed) -> bool {
        let mut observed = self.lock_observed();
        if *observed == state {
            return false;
        }
        *observed = state;
        true
    }

    fn notify(&self, lockfile: Option<Lockfile>) {
        let event = LockfileChanged {
            path: self.path.clone(),
            lockfile,
        };
        self.lock_subscribers()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn temp_path(&self) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!(".{}.{}.{}.tmp", self.settings.file_name, std::process::id(), n);
        self.path
            .parent()
            .map(|dir| dir.join(&name))
            .unwrap_or_else(|| PathBuf::from(&name))
    }

    /// Serialize and move into place via temp file + rename
    fn write_atomic(&self, lockfile: &Lockfile) -> LockfileResult<()> {
        let mut content =
            serde_json::to_vec_pretty(lockfile).map_err(|e| LockfileError::Serialization {
                message: e.to_string(),
            })?;
        content.push(b'\n');

        let temp = self.temp_path();
        let written = self
            .fs
            .write(&temp, &content)
            .and_then(|()| self.fs.rename(&temp, &self.path));
        if let Err(e) = written {
            if self.fs.exists(&temp) {
                if let Err(cleanup) = self.fs.remove(&temp) {
                    tracing::warn!(temp = %temp.display(), error = %cleanup, "failed to remove temp lockfile");
                }
            }
            return Err(LockfileError::Write {
                path: self.path.clone(),
                message: e.to_string(),
            });
        }

        *self.lock_observed() = Observed::Content(ContentHash::from_bytes(&content));
        tracing::debug!(path = %self.path.display(), bundles = lockfile.bundles.len(), "lockfile written");
        Ok(())
    }

    fn check_file(&self, file: &FileEntry) -> Option<ModifiedFileInfo> {
        let missing = || ModifiedFileInfo {
            path: file.path.clone(),
            original_checksum: file.checksum.clone(),
            current_checksum: String::new(),
            modification_type: ModificationType::Missing,
        };
        if !file.is_contained() {
            tracing::warn!(path = %file.path, "tracked path leaves the repository root, not reading it");
            return Some(missing());
        }
        let full = self.root.join(&file.path);

        if !self.fs.exists(&full) {
            return Some(missing());
        }
        match self.checksums.checksum(&full) {
            Ok(current) if current.matches_str(&file.checksum) => None,
            Ok(current) => Some(ModifiedFileInfo {
                path: file.path.clone(),
                original_checksum: file.checksum.clone(),
                current_checksum: current.as_str().to_string(),
                modification_type: ModificationType::Modified,
            }),
            Err(e) => {
                tracing::debug!(path = %full.display(), error = %e, "tracked file could not be hashed");
                Some(missing())
            }
        }
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<Sender<LockfileChanged>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_observed(&self) -> MutexGuard<'_, Observed> {
        self.observed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LockfileRepository for JsonLockfileRepository {
    fn repository_root(&self) -> &Path {
        &self.root
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Option<Lockfile> {
        match self.load() {
            Ok(lockfile) => lockfile,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "treating unreadable lockfile as absent");
                None
            }
        }
    }

    fn load(&self) -> LockfileResult<Option<Lockfile>> {
        let content = match self.fs.read(&self.path) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => {
                return Err(LockfileError::Io {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| LockfileError::Corrupted {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    fn validate(&self) -> LockfileValidation {
        let invalid = |message: String| LockfileValidation {
            valid: false,
            errors: vec![message],
            ..LockfileValidation::default()
        };

        let content = match self.fs.read(&self.path) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                return invalid(format!("lockfile not found: {}", self.path.display()))
            }
            Err(e) => return invalid(e.to_string()),
        };
        let document: serde_json::Value = match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(e) => return invalid(format!("lockfile is not valid JSON: {}", e)),
        };

        let schema_version = document
            .get("version")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let schema_ref = document
            .get("$schema")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.settings.schema_url);

        let report = self.validator.validate(&document, schema_ref);
        LockfileValidation {
            valid: report.valid,
            errors: report.errors,
            warnings: report.warnings,
            schema_version,
        }
    }

    fn create_or_update(&self, options: CreateOrUpdateOptions) -> LockfileResult<Lockfile> {
        options.validate()?;

        let _guard = self.lock_writes();
        let mut lockfile = self.load()?.unwrap_or_else(|| self.new_lockfile());

        lockfile.upsert_bundle(options.bundle_id.clone(), options.to_entry());
        lockfile.upsert_source(options.source_id.clone(), options.source.clone().into());
        if let Some((hub_id, hub)) = options.hub {
            lockfile.upsert_hub(hub_id, hub);
        }
        if let Some((profile_id, profile)) = options.profile {
            lockfile.upsert_profile(profile_id, profile);
        }
        let pruned = lockfile.prune_orphaned_sources();
        if !pruned.is_empty() {
            tracing::debug!(?pruned, "dropped unreferenced sources");
        }
        lockfile.touch(&self.settings.generated_by);

        self.write_atomic(&lockfile)?;
        tracing::debug!(bundle_id = %options.bundle_id, version = %options.version, "bundle recorded");
        self.notify(Some(lockfile.clone()));
        Ok(lockfile)
    }

    fn remove(&self, bundle_id: &str) -> LockfileResult<bool> {
        let _guard = self.lock_writes();
        let Some(mut lockfile) = self.load()? else {
            return Ok(false);
        };
        if lockfile.remove_bundle(bundle_id).is_none() {
            return Ok(false);
        }
        lockfile.prune_orphaned_sources();

        if lockfile.is_empty() {
            match self.fs.remove(&self.path) {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    return Err(LockfileError::Io {
                        path: self.path.clone(),
                        message: e.to_string(),
                    })
                }
            }
            *self.lock_observed() = Observed::Absent;
            tracing::debug!(bundle_id, path = %self.path.display(), "last bundle removed, lockfile deleted");
            self.notify(None);
        } else {
            lockfile.touch(&self.settings.generated_by);
            self.write_atomic(&lockfile)?;
            tracing::debug!(bundle_id, "bundle removed from lockfile");
            self.notify(Some(lockfile));
        }
        Ok(true)
    }

    fn detect_modified_files(&self, bundle_id: &str) -> Vec<ModifiedFileInfo> {
        let Some(lockfile) = self.read() else {
            return Vec::new();
        };
        let Some(entry) = lockfile.bundle(bundle_id) else {
            return Vec::new();
        };
        entry
            .files
            .iter()
            .filter_map(|file| self.check_file(file))
            .collect()
    }

    fn subscribe(&self) -> Receiver<LockfileChanged> {
        let (tx, rx) = channel();
        self.lock_subscribers().push(tx);
        rx
    }
}

impl std::fmt::Debug for JsonLockfileRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLockfileRepository")
            .field("path", &self.path)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
