//! LockfileRepository port - abstraction for lockfile persistence
//!
//! One repository instance owns the lockfile of one repository root. All
//! mutation goes through it; writes are serialized and atomic.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use serde::Serialize;

use crate::domain::entities::{
    BundleEntry, FileEntry, HubEntry, Lockfile, ModifiedFileInfo, ProfileEntry, SourceEntry,
};
use crate::domain::value_objects::CommitMode;

/// Result type for lockfile operations
pub type LockfileResult<T> = Result<T, LockfileError>;

/// Lockfile operation errors
#[derive(Debug, thiserror::Error)]
pub enum LockfileError {
    /// Input rejected before any I/O
    #[error("invalid lockfile entry: {field} {message}")]
    Validation { field: String, message: String },

    #[error(
        "lockfile corrupted: {}\n  → Fix: repair the JSON or delete the file and reinstall\n  → Details: {message}",
        path.display()
    )]
    Corrupted { path: PathBuf, message: String },

    #[error("failed to access lockfile {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Temp write or rename failed; the previous file is untouched
    #[error("failed to write lockfile {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    #[error("failed to serialize lockfile: {message}")]
    Serialization { message: String },
}

impl LockfileError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        LockfileError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Source details recorded alongside a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    pub source_type: String,
    pub url: String,
    pub branch: Option<String>,
}

impl From<SourceOptions> for SourceEntry {
    fn from(source: SourceOptions) -> Self {
        SourceEntry {
            source_type: source.source_type,
            url: source.url,
            branch: source.branch,
        }
    }
}

/// Everything needed to record an installed or updated bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrUpdateOptions {
    pub bundle_id: String,
    pub version: String,
    pub source_id: String,
    pub source_type: String,
    pub commit_mode: CommitMode,
    pub checksum: Option<String>,
    pub files: Vec<FileEntry>,
    pub source: SourceOptions,
    pub hub: Option<(String, HubEntry)>,
    pub profile: Option<(String, ProfileEntry)>,
}

impl CreateOrUpdateOptions {
    /// Reject malformed input; performs no I/O
    pub fn validate(&self) -> LockfileResult<()> {
        let required = [
            ("bundleId", &self.bundle_id),
            ("version", &self.version),
            ("sourceId", &self.source_id),
            ("sourceType", &self.source_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(LockfileError::validation(field, "must be a non-empty string"));
            }
        }
        if self.source.source_type.trim().is_empty() {
            return Err(LockfileError::validation("source.type", "must be a non-empty string"));
        }
        if self.source.url.trim().is_empty() {
            return Err(LockfileError::validation("source.url", "must be a non-empty string"));
        }
        for file in &self.files {
            if file.path.trim().is_empty() {
                return Err(LockfileError::validation("files[].path", "must be a non-empty string"));
            }
            if !file.is_contained() {
                return Err(LockfileError::validation(
                    "files[].path",
                    format!("must be relative to the repository root, got '{}'", file.path),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn to_entry(&self) -> BundleEntry {
        BundleEntry {
            version: self.version.clone(),
            source_id: self.source_id.clone(),
            source_type: self.source_type.clone(),
            installed_at: chrono::Utc::now(),
            commit_mode: self.commit_mode,
            checksum: self.checksum.clone(),
            files: self.files.clone(),
        }
    }
}

/// Result of validating the current lockfile against its schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockfileValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub schema_version: Option<String>,
}

/// Change notification: the new lockfile, or `None` when it was deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfileChanged {
    pub path: PathBuf,
    pub lockfile: Option<Lockfile>,
}

/// Abstract repository for lockfile persistence
pub trait LockfileRepository: Send + Sync {
    /// Repository root the lockfile belongs to
    fn repository_root(&self) -> &Path;

    /// Path of the lockfile
    fn path(&self) -> &Path;

    /// Read the lockfile; absent or corrupt both yield `None` (corrupt is logged)
    fn read(&self) -> Option<Lockfile>;

    /// Read the lockfile, distinguishing absent (`Ok(None)`) from corrupt (`Err`)
    fn load(&self) -> LockfileResult<Option<Lockfile>>;

    /// Validate the current lockfile against its schema
    fn validate(&self) -> LockfileValidation;

    /// Upsert a bundle and its source, then write atomically
    fn create_or_update(&self, options: CreateOrUpdateOptions) -> LockfileResult<Lockfile>;

    /// Remove a bundle; deletes the lockfile when it was the last one.
    /// Returns false when there was nothing to remove.
    fn remove(&self, bundle_id: &str) -> LockfileResult<bool>;

    /// Tracked files of `bundle_id` whose content no longer matches
    fn detect_modified_files(&self, bundle_id: &str) -> Vec<ModifiedFileInfo>;

    /// Receive every change (own writes and external edits)
    fn subscribe(&self) -> Receiver<LockfileChanged>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> CreateOrUpdateOptions {
        CreateOrUpdateOptions {
            bundle_id: "b".to_string(),
            version: "1.0.0".to_string(),
            source_id: "s".to_string(),
            source_type: "github".to_string(),
            commit_mode: CommitMode::Commit,
            checksum: None,
            files: vec![FileEntry::new("a.md", "abc")],
            source: SourceOptions {
                source_type: "github".to_string(),
                url: "https://github.com/acme/b".to_string(),
                branch: None,
            },
            hub: None,
            profile: None,
        }
    }

    #[test]
    fn valid_options_pass() {
        assert!(options().validate().is_ok());
    }

    #[test]
    fn empty_required_fields_are_rejected() {
        let mut opts = options();
        opts.version = "  ".to_string();
        let err = opts.validate().unwrap_err();
        assert!(matches!(err, LockfileError::Validation { ref field, .. } if field == "version"));
    }

    #[test]
    fn source_url_is_required() {
        let mut opts = options();
        opts.source.url.clear();
        let err = opts.validate().unwrap_err();
        assert!(err.to_string().contains("source.url"));
    }

    #[test]
    fn absolute_file_paths_are_rejected() {
        let mut opts = options();
        let abs = if cfg!(windows) { "C:\\x\\a.md" } else { "/x/a.md" };
        opts.files = vec![FileEntry::new(abs, "abc")];
        assert!(opts.validate().is_err());
    }

    #[test]
    fn parent_segments_are_rejected() {
        let mut opts = options();
        opts.files = vec![FileEntry::new("prompts/../../secret.txt", "abc")];
        let err = opts.validate().unwrap_err();
        assert!(err.to_string().contains("files[].path"));
    }

    #[test]
    fn corrupted_error_mentions_path() {
        let err = LockfileError::Corrupted {
            path: PathBuf::from("repo/prompt-registry.lock.json"),
            message: "expected value".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("lockfile corrupted"));
        assert!(msg.contains("prompt-registry.lock.json"));
    }
}
