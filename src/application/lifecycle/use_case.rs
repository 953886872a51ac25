//! Bundle Lifecycle Coordinator
//!
//! Install flow: conflict check, version resolution, installer, record.
//! Uninstall flow: installer removal, then record removal.
//!
//! Repository-scope installs are recorded in the lockfile with per-file
//! checksums; user and workspace installs go to the bundle store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{BundleVersion, FileEntry, InstalledBundle};
use crate::domain::ports::{
    BundleStore, ChecksumService, CreateOrUpdateOptions, InstallTarget, InstalledArtifacts,
    Installer, LockfileRepository, SourceOptions,
};
use crate::domain::services::{MigrationResult, ScopeConflictResolver, VersionConsolidator};
use crate::domain::value_objects::{BundleIdentity, Scope};
use crate::error::{BundleLockError, BundleLockResult};
use crate::infrastructure::stores::LockfileBundleStore;

use super::options::{DriftDecision, InstallRequest, MigrateRequest};
use super::result::{InstallOutcome, UninstallOutcome, UpdateOutcome};

/// Recorded when neither the listing nor the host names a source type
const UNKNOWN_SOURCE_TYPE: &str = "unknown";

/// Where an install lands and what source to record for it
struct Destination<'a> {
    scope: Scope,
    source_url: &'a str,
    branch: Option<&'a str>,
}

impl<'a> From<&'a InstallRequest> for Destination<'a> {
    fn from(request: &'a InstallRequest) -> Self {
        Self {
            scope: request.scope,
            source_url: &request.source_url,
            branch: request.branch.as_deref(),
        }
    }
}

pub struct BundleLifecycleCoordinator {
    lockfile: Arc<dyn LockfileRepository>,
    /// All three scopes: repository from the lockfile, the rest delegated
    scopes: Arc<dyn BundleStore>,
    resolver: ScopeConflictResolver,
    consolidator: Arc<VersionConsolidator>,
    installer: Arc<dyn Installer>,
    checksums: Arc<dyn ChecksumService>,
}

impl BundleLifecycleCoordinator {
    /// `store` keeps user and workspace installs; repository scope is
    /// always answered from `lockfile`.
    pub fn new(
        lockfile: Arc<dyn LockfileRepository>,
        store: Arc<dyn BundleStore>,
        consolidator: Arc<VersionConsolidator>,
        installer: Arc<dyn Installer>,
        checksums: Arc<dyn ChecksumService>,
    ) -> Self {
        let scopes: Arc<dyn BundleStore> =
            Arc::new(LockfileBundleStore::new(lockfile.clone(), store));
        Self {
            resolver: ScopeConflictResolver::new(scopes.clone()),
            lockfile,
            scopes,
            consolidator,
            installer,
            checksums,
        }
    }

    pub fn resolver(&self) -> &ScopeConflictResolver {
        &self.resolver
    }

    pub fn consolidator(&self) -> &VersionConsolidator {
        &self.consolidator
    }

    /// Install a bundle at the requested scope
    ///
    /// A bundle living at another scope is reported as a conflict unless the
    /// request allows migration. Nothing is recorded unless the installer
    /// succeeds and every file it reports can be hashed.
    pub fn install(&self, request: &InstallRequest) -> BundleLockResult<InstallOutcome> {
        let identity = self.consolidator.identity_of(&request.bundle);
        let bundle_id = identity.name().to_string();

        let conflict = match self.resolver.check_conflict(&bundle_id, request.scope)? {
            Some(conflict) if !request.allow_migration => {
                tracing::debug!(
                    bundle_id,
                    existing = %conflict.existing_scope,
                    target = %conflict.target_scope,
                    "install blocked by scope conflict"
                );
                return Ok(InstallOutcome::Conflict(conflict));
            }
            conflict => conflict,
        };

        let target = self.resolve_target(request, &identity)?;
        let destination = Destination::from(request);
        self.precheck(&target, &destination)?;

        let Some(conflict) = conflict else {
            let installed = self.place_and_record(&target, &destination)?;
            return Ok(InstallOutcome::Installed(installed));
        };

        let existing = conflict.installed_bundle;
        let result = self.resolver.migrate_bundle(
            &bundle_id,
            conflict.existing_scope,
            request.scope,
            || self.remove_installed(&existing),
            || self.place_and_record(&target, &destination).map(|_| ()),
        );
        Ok(InstallOutcome::Migrated(result))
    }

    /// Replace an installed bundle with the resolved version
    ///
    /// Locally edited tracked files stop the update unless `decision` is
    /// `Override`; with no decision the drift is returned for the caller to
    /// ask about.
    pub fn update(
        &self,
        request: &InstallRequest,
        decision: Option<DriftDecision>,
    ) -> BundleLockResult<UpdateOutcome> {
        let identity = self.consolidator.identity_of(&request.bundle);
        let bundle_id = identity.name().to_string();

        let existing = self
            .scopes
            .installed(&bundle_id, request.scope)?
            .ok_or_else(|| BundleLockError::NotInstalled {
                bundle_id: bundle_id.clone(),
                scope: request.scope,
            })?;

        if request.scope.is_tracked_by_lockfile() {
            let drift = self.lockfile.detect_modified_files(&bundle_id);
            if !drift.is_empty() {
                match decision {
                    None => return Ok(UpdateOutcome::DriftDetected(drift)),
                    Some(DriftDecision::Abort) => return Ok(UpdateOutcome::Aborted),
                    Some(DriftDecision::Override) => tracing::warn!(
                        bundle_id,
                        files = drift.len(),
                        "overwriting locally modified files"
                    ),
                }
            }
        }

        let target = self.resolve_target(request, &identity)?;
        let destination = Destination::from(request);
        self.precheck(&target, &destination)?;
        let installed = self.place_and_record(&target, &destination)?;
        tracing::debug!(bundle_id, from = %existing.version, to = %installed.version, "bundle updated");
        Ok(UpdateOutcome::Updated(installed))
    }

    /// Remove a bundle from a scope; a bundle that is not there is a no-op
    pub fn uninstall(&self, bundle_id: &str, scope: Scope) -> BundleLockResult<UninstallOutcome> {
        let Some(installed) = self.scopes.installed(bundle_id, scope)? else {
            return Ok(UninstallOutcome::NotInstalled);
        };
        self.remove_installed(&installed)?;
        Ok(UninstallOutcome::Removed(installed))
    }

    /// Move an installed bundle to another scope
    ///
    /// The same version is reinstalled at the destination. See
    /// `ScopeConflictResolver::migrate_bundle` for the failure states.
    pub fn migrate(&self, request: &MigrateRequest) -> BundleLockResult<MigrationResult> {
        let existing = self
            .scopes
            .installed(&request.bundle_id, request.from_scope)?;
        let target = existing.as_ref().map(|b| self.target_for_installed(b));
        let destination = Destination {
            scope: request.to_scope,
            source_url: &request.source_url,
            branch: request.branch.as_deref(),
        };
        if let Some(target) = &target {
            self.precheck(target, &destination)?;
        }

        let not_installed = || BundleLockError::NotInstalled {
            bundle_id: request.bundle_id.clone(),
            scope: request.from_scope,
        };
        Ok(self.resolver.migrate_bundle(
            &request.bundle_id,
            request.from_scope,
            request.to_scope,
            || {
                existing
                    .as_ref()
                    .ok_or_else(not_installed)
                    .and_then(|b| self.remove_installed(b))
            },
            || {
                target
                    .as_ref()
                    .ok_or_else(not_installed)
                    .and_then(|t| self.place_and_record(t, &destination))
                    .map(|_| ())
            },
        ))
    }

    fn resolve_target(
        &self,
        request: &InstallRequest,
        identity: &BundleIdentity,
    ) -> BundleLockResult<InstallTarget> {
        let listing = &request.bundle;
        let resolved = match &request.pinned_version {
            Some(pinned) => self
                .consolidator
                .get_bundle_version(identity, pinned)
                .or_else(|| same_version(&listing.version, pinned).then(|| BundleVersion::from(listing)))
                .ok_or_else(|| BundleLockError::VersionNotFound {
                    bundle_id: identity.name().to_string(),
                    version: pinned.clone(),
                })?,
            None => self
                .consolidator
                .latest_version(identity)
                .unwrap_or_else(|| BundleVersion::from(listing)),
        };

        let source_type = self
            .consolidator
            .source_type_of(listing)
            .map(|t| t.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_SOURCE_TYPE.to_string());

        Ok(InstallTarget {
            bundle_id: identity.name().to_string(),
            listing_id: resolved.bundle_id,
            version: resolved.version,
            source_id: listing.source_id.clone(),
            source_type,
            download_url: resolved.download_url,
            commit_mode: request.commit_mode,
        })
    }

    fn target_for_installed(&self, installed: &InstalledBundle) -> InstallTarget {
        let identity = BundleIdentity::new(&installed.source_id, &installed.bundle_id);
        let known = self
            .consolidator
            .get_bundle_version(&identity, &installed.version);
        InstallTarget {
            bundle_id: installed.bundle_id.clone(),
            listing_id: known
                .as_ref()
                .map(|v| v.bundle_id.clone())
                .unwrap_or_else(|| installed.bundle_id.clone()),
            version: installed.version.clone(),
            source_id: installed.source_id.clone(),
            source_type: installed.source_type.clone(),
            download_url: known.and_then(|v| v.download_url),
            commit_mode: installed.commit_mode,
        }
    }

    /// Reject lockfile input that would fail after the installer already ran
    fn precheck(&self, target: &InstallTarget, destination: &Destination<'_>) -> BundleLockResult<()> {
        if destination.scope.is_tracked_by_lockfile() {
            lockfile_options(target, destination, Vec::new(), None).validate()?;
        }
        Ok(())
    }

    fn place_and_record(
        &self,
        target: &InstallTarget,
        destination: &Destination<'_>,
    ) -> BundleLockResult<InstalledBundle> {
        let artifacts = self.installer.install(target, destination.scope)?;
        let files = self.checksum_artifacts(&artifacts, destination.scope)?;

        let installed = InstalledBundle {
            bundle_id: target.bundle_id.clone(),
            version: target.version.clone(),
            scope: destination.scope,
            source_id: target.source_id.clone(),
            source_type: target.source_type.clone(),
            installed_at: Utc::now(),
            commit_mode: target.commit_mode,
            files: files.iter().map(|f| f.path.clone()).collect(),
        };

        if destination.scope.is_tracked_by_lockfile() {
            let options =
                lockfile_options(target, destination, files, artifacts.archive_checksum.clone());
            self.lockfile.create_or_update(options)?;
        } else {
            self.scopes.record(installed.clone())?;
        }

        tracing::debug!(
            bundle_id = %installed.bundle_id,
            version = %installed.version,
            scope = %installed.scope,
            files = installed.files.len(),
            "bundle installed"
        );
        Ok(installed)
    }

    /// Hash every reported file; paths are recorded relative to the
    /// repository root for repository scope and to the install root otherwise
    fn checksum_artifacts(
        &self,
        artifacts: &InstalledArtifacts,
        scope: Scope,
    ) -> BundleLockResult<Vec<FileEntry>> {
        let base: &Path = if scope.is_tracked_by_lockfile() {
            self.lockfile.repository_root()
        } else {
            &artifacts.install_root
        };

        artifacts
            .files
            .iter()
            .map(|relative| {
                let absolute = artifacts.install_root.join(relative);
                let hash = self.checksums.checksum(&absolute).map_err(|e| {
                    BundleLockError::Artifact {
                        path: absolute.clone(),
                        message: format!("could not be read: {}", e),
                    }
                })?;
                let recorded =
                    relative_to(&absolute, base).ok_or_else(|| BundleLockError::Artifact {
                        path: absolute.clone(),
                        message: format!("is outside {}", base.display()),
                    })?;
                Ok(FileEntry::new(recorded.to_string_lossy(), hash.as_str()))
            })
            .collect()
    }

    fn remove_installed(&self, installed: &InstalledBundle) -> BundleLockResult<()> {
        self.installer.uninstall(installed)?;
        if installed.scope.is_tracked_by_lockfile() {
            self.lockfile.remove(&installed.bundle_id)?;
        } else {
            self.scopes.forget(&installed.bundle_id, installed.scope)?;
        }
        tracing::debug!(bundle_id = %installed.bundle_id, scope = %installed.scope, "bundle removed");
        Ok(())
    }
}

/// `path` relative to `base`, resolving symlinks on both sides when the
/// plain prefix does not match
fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    if let Ok(relative) = path.strip_prefix(base) {
        return Some(relative.to_path_buf());
    }
    let path = path.canonicalize().ok()?;
    let base = base.canonicalize().ok()?;
    path.strip_prefix(&base).ok().map(Path::to_path_buf)
}

fn lockfile_options(
    target: &InstallTarget,
    destination: &Destination<'_>,
    files: Vec<FileEntry>,
    checksum: Option<String>,
) -> CreateOrUpdateOptions {
    CreateOrUpdateOptions {
        bundle_id: target.bundle_id.clone(),
        version: target.version.clone(),
        source_id: target.source_id.clone(),
        source_type: target.source_type.clone(),
        commit_mode: target.commit_mode,
        checksum,
        files,
        source: SourceOptions {
            source_type: target.source_type.clone(),
            url: destination.source_url.to_string(),
            branch: destination.branch.map(str::to_string),
        },
        hub: None,
        profile: None,
    }
}

fn same_version(a: &str, b: &str) -> bool {
    a.trim_start_matches('v') == b.trim_start_matches('v')
}
