//! Lifecycle Use Case Tests

use super::*;
use crate::domain::entities::{Bundle, InstalledBundle, ModificationType};
use crate::domain::ports::{
    BundleStore, InstallTarget, InstalledArtifacts, Installer, InstallerError, LockfileRepository,
};
use crate::domain::services::{MigrationPhase, VersionConsolidator};
use crate::domain::value_objects::{ContentHash, Scope};
use crate::error::BundleLockError;
use crate::infrastructure::{JsonLockfileRepository, MemoryBundleStore, Sha256Checksum};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

/// Writes one `prompt.md` per bundle under a per-scope directory
struct FakeInstaller {
    repo_root: PathBuf,
    home_root: PathBuf,
    fail_install: AtomicBool,
    fail_uninstall: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeInstaller {
    fn scope_root(&self, scope: Scope) -> PathBuf {
        match scope {
            Scope::Repository => self.repo_root.join("bundles"),
            Scope::User => self.home_root.join("user"),
            Scope::Workspace => self.home_root.join("workspace"),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Installer for FakeInstaller {
    fn install(
        &self,
        target: &InstallTarget,
        scope: Scope,
    ) -> Result<InstalledArtifacts, InstallerError> {
        self.calls.lock().unwrap().push(format!(
            "install {}@{} {}",
            target.bundle_id, target.version, scope
        ));
        if self.fail_install.load(Ordering::SeqCst) {
            return Err(InstallerError::InstallFailed {
                bundle_id: target.bundle_id.clone(),
                scope,
                message: "download failed".to_string(),
            });
        }
        let install_root = self.scope_root(scope).join(&target.bundle_id);
        fs::create_dir_all(&install_root).unwrap();
        fs::write(
            install_root.join("prompt.md"),
            format!("{}@{}", target.bundle_id, target.version),
        )
        .unwrap();
        Ok(InstalledArtifacts {
            install_root,
            files: vec![PathBuf::from("prompt.md")],
            archive_checksum: None,
        })
    }

    fn uninstall(&self, bundle: &InstalledBundle) -> Result<(), InstallerError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("uninstall {} {}", bundle.bundle_id, bundle.scope));
        if self.fail_uninstall.load(Ordering::SeqCst) {
            return Err(InstallerError::UninstallFailed {
                bundle_id: bundle.bundle_id.clone(),
                scope: bundle.scope,
                message: "permission denied".to_string(),
            });
        }
        let _ = fs::remove_dir_all(self.scope_root(bundle.scope).join(&bundle.bundle_id));
        Ok(())
    }
}

struct Harness {
    repo: TempDir,
    _home: TempDir,
    lockfile: Arc<JsonLockfileRepository>,
    store: Arc<MemoryBundleStore>,
    installer: Arc<FakeInstaller>,
    coordinator: BundleLifecycleCoordinator,
}

impl Harness {
    fn new() -> Self {
        let repo = tempdir().unwrap();
        let home = tempdir().unwrap();
        let lockfile = Arc::new(JsonLockfileRepository::new(repo.path()));
        let store = Arc::new(MemoryBundleStore::new());
        let installer = Arc::new(FakeInstaller {
            repo_root: repo.path().to_path_buf(),
            home_root: home.path().to_path_buf(),
            fail_install: AtomicBool::new(false),
            fail_uninstall: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        });
        let coordinator = BundleLifecycleCoordinator::new(
            lockfile.clone(),
            store.clone(),
            Arc::new(VersionConsolidator::new(10).unwrap()),
            installer.clone(),
            Arc::new(Sha256Checksum::new()),
        );
        Self {
            repo,
            _home: home,
            lockfile,
            store,
            installer,
            coordinator,
        }
    }

    fn installed_file(&self, bundle_id: &str) -> PathBuf {
        self.repo.path().join("bundles").join(bundle_id).join("prompt.md")
    }

    fn scopes_of(&self, bundle_id: &str) -> Vec<Scope> {
        self.coordinator
            .resolver()
            .get_conflicting_scopes(bundle_id)
            .unwrap()
    }
}

fn listing(version: &str) -> Bundle {
    Bundle::new(format!("acme-tool-v{}", version), version, "acme-github")
}

fn request(version: &str, scope: Scope) -> InstallRequest {
    InstallRequest::new(listing(version), scope, "https://github.com/acme/tool")
}

fn hash_of(path: &Path) -> String {
    ContentHash::from_bytes(&fs::read(path).unwrap())
        .as_str()
        .to_string()
}

#[test]
fn install_at_repository_scope_records_lockfile_entry() {
    let h = Harness::new();

    let outcome = h.coordinator.install(&request("1.0.0", Scope::Repository)).unwrap();

    let InstallOutcome::Installed(installed) = outcome else {
        panic!("expected install, got {:?}", outcome);
    };
    assert_eq!(installed.bundle_id, "acme-tool");
    assert_eq!(installed.files, vec!["bundles/acme-tool/prompt.md".to_string()]);

    let lockfile = h.lockfile.load().unwrap().unwrap();
    let entry = lockfile.bundle("acme-tool").unwrap();
    assert_eq!(entry.version, "1.0.0");
    assert_eq!(entry.source_type, "github");
    assert_eq!(entry.files[0].path, "bundles/acme-tool/prompt.md");
    assert_eq!(entry.files[0].checksum, hash_of(&h.installed_file("acme-tool")));
    assert_eq!(
        lockfile.sources["acme-github"].url,
        "https://github.com/acme/tool"
    );
}

#[cfg(unix)]
#[test]
fn install_root_reached_through_a_symlink_is_inside_the_repository() {
    let repo = tempdir().unwrap();
    let home = tempdir().unwrap();
    let links = tempdir().unwrap();
    let link = links.path().join("repo");
    std::os::unix::fs::symlink(repo.path(), &link).unwrap();

    let lockfile = Arc::new(JsonLockfileRepository::new(repo.path()));
    let installer = Arc::new(FakeInstaller {
        repo_root: link,
        home_root: home.path().to_path_buf(),
        fail_install: AtomicBool::new(false),
        fail_uninstall: AtomicBool::new(false),
        calls: Mutex::new(Vec::new()),
    });
    let coordinator = BundleLifecycleCoordinator::new(
        lockfile.clone(),
        Arc::new(MemoryBundleStore::new()),
        Arc::new(VersionConsolidator::new(10).unwrap()),
        installer,
        Arc::new(Sha256Checksum::new()),
    );

    coordinator.install(&request("1.0.0", Scope::Repository)).unwrap();

    let lockfile = lockfile.load().unwrap().unwrap();
    let entry = lockfile.bundle("acme-tool").unwrap();
    assert_eq!(entry.files[0].path, "bundles/acme-tool/prompt.md");
}

#[test]
fn install_at_user_scope_uses_bundle_store() {
    let h = Harness::new();

    let outcome = h.coordinator.install(&request("1.0.0", Scope::User)).unwrap();

    assert!(outcome.is_installed());
    assert!(h.lockfile.read().is_none());
    let recorded = h.store.installed("acme-tool", Scope::User).unwrap().unwrap();
    assert_eq!(recorded.files, vec!["prompt.md".to_string()]);
}

#[test]
fn unpinned_install_resolves_latest_consolidated_version() {
    let h = Harness::new();
    h.coordinator
        .consolidator()
        .consolidate_bundles(&[listing("1.0.0"), listing("2.0.0")]);

    let outcome = h.coordinator.install(&request("1.0.0", Scope::Repository)).unwrap();

    let InstallOutcome::Installed(installed) = outcome else {
        panic!("expected install, got {:?}", outcome);
    };
    assert_eq!(installed.version, "2.0.0");
    assert_eq!(h.installer.calls(), vec!["install acme-tool@2.0.0 repository"]);
}

#[test]
fn pinned_install_uses_requested_version() {
    let h = Harness::new();
    h.coordinator
        .consolidator()
        .consolidate_bundles(&[listing("1.0.0"), listing("2.0.0")]);

    let request = request("2.0.0", Scope::Repository).with_version("v1.0.0");
    h.coordinator.install(&request).unwrap();

    let lockfile = h.lockfile.load().unwrap().unwrap();
    assert_eq!(lockfile.bundle("acme-tool").unwrap().version, "1.0.0");
}

#[test]
fn unknown_pinned_version_fails_before_installer() {
    let h = Harness::new();
    h.coordinator
        .consolidator()
        .consolidate_bundles(&[listing("1.0.0")]);

    let request = request("1.0.0", Scope::Repository).with_version("9.9.9");
    let err = h.coordinator.install(&request).unwrap_err();

    assert!(matches!(
        err,
        BundleLockError::VersionNotFound { ref version, .. } if version == "9.9.9"
    ));
    assert!(h.installer.calls().is_empty());
    assert!(h.lockfile.read().is_none());
}

#[test]
fn invalid_lockfile_input_fails_before_installer() {
    let h = Harness::new();

    let request = InstallRequest::new(listing("1.0.0"), Scope::Repository, "");
    assert!(h.coordinator.install(&request).is_err());
    assert!(h.installer.calls().is_empty());
}

#[test]
fn installer_failure_leaves_lockfile_untouched() {
    let h = Harness::new();
    h.coordinator
        .install(&request("1.0.0", Scope::Repository))
        .unwrap();
    let before = fs::read_to_string(h.lockfile.path()).unwrap();

    h.installer.fail_install.store(true, Ordering::SeqCst);
    let err = h
        .coordinator
        .install(&request("2.0.0", Scope::Repository).with_version("2.0.0"))
        .unwrap_err();

    assert!(matches!(err, BundleLockError::Installer(_)));
    assert_eq!(fs::read_to_string(h.lockfile.path()).unwrap(), before);
}

#[test]
fn conflict_is_reported_without_installing() {
    let h = Harness::new();
    h.coordinator.install(&request("1.0.0", Scope::User)).unwrap();

    let outcome = h
        .coordinator
        .install(&request("1.0.0", Scope::Repository))
        .unwrap();

    let InstallOutcome::Conflict(conflict) = outcome else {
        panic!("expected conflict, got {:?}", outcome);
    };
    assert_eq!(conflict.existing_scope, Scope::User);
    assert_eq!(conflict.target_scope, Scope::Repository);
    assert_eq!(h.installer.calls().len(), 1);
    assert!(h.lockfile.read().is_none());
}

#[test]
fn conflict_with_migration_moves_the_bundle() {
    let h = Harness::new();
    h.coordinator.install(&request("1.0.0", Scope::User)).unwrap();

    let outcome = h
        .coordinator
        .install(&request("1.0.0", Scope::Repository).allow_migration(true))
        .unwrap();

    let InstallOutcome::Migrated(result) = outcome else {
        panic!("expected migration, got {:?}", outcome);
    };
    assert!(result.success);
    assert_eq!(h.scopes_of("acme-tool"), vec![Scope::Repository]);
    assert_eq!(
        h.installer.calls(),
        vec![
            "install acme-tool@1.0.0 user",
            "uninstall acme-tool user",
            "install acme-tool@1.0.0 repository",
        ]
    );
}

#[test]
fn reinstall_at_same_scope_is_not_a_conflict() {
    let h = Harness::new();
    h.coordinator.install(&request("1.0.0", Scope::Workspace)).unwrap();

    let outcome = h
        .coordinator
        .install(&request("1.0.0", Scope::Workspace))
        .unwrap();

    assert!(outcome.is_installed());
    assert_eq!(h.scopes_of("acme-tool"), vec![Scope::Workspace]);
}

#[test]
fn update_reports_drift_and_waits_for_decision() {
    let h = Harness::new();
    h.coordinator
        .install(&request("1.0.0", Scope::Repository))
        .unwrap();
    fs::write(h.installed_file("acme-tool"), "local edit").unwrap();

    let update = request("2.0.0", Scope::Repository);
    let outcome = h.coordinator.update(&update, None).unwrap();

    let UpdateOutcome::DriftDetected(drift) = outcome else {
        panic!("expected drift, got {:?}", outcome);
    };
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].modification_type, ModificationType::Modified);
    assert_eq!(h.installer.calls().len(), 1);
}

#[test]
fn update_abort_keeps_local_edits() {
    let h = Harness::new();
    h.coordinator
        .install(&request("1.0.0", Scope::Repository))
        .unwrap();
    fs::write(h.installed_file("acme-tool"), "local edit").unwrap();

    let outcome = h
        .coordinator
        .update(&request("2.0.0", Scope::Repository), Some(DriftDecision::Abort))
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::Aborted);
    assert_eq!(
        fs::read_to_string(h.installed_file("acme-tool")).unwrap(),
        "local edit"
    );
    assert_eq!(
        h.lockfile.load().unwrap().unwrap().bundle("acme-tool").unwrap().version,
        "1.0.0"
    );
}

#[test]
fn update_override_replaces_files() {
    let h = Harness::new();
    h.coordinator
        .install(&request("1.0.0", Scope::Repository))
        .unwrap();
    fs::write(h.installed_file("acme-tool"), "local edit").unwrap();

    let outcome = h
        .coordinator
        .update(
            &request("2.0.0", Scope::Repository),
            Some(DriftDecision::Override),
        )
        .unwrap();

    assert!(matches!(outcome, UpdateOutcome::Updated(ref b) if b.version == "2.0.0"));
    assert!(h.lockfile.detect_modified_files("acme-tool").is_empty());
}

#[test]
fn update_of_missing_bundle_is_an_error() {
    let h = Harness::new();
    let err = h
        .coordinator
        .update(&request("1.0.0", Scope::User), None)
        .unwrap_err();
    assert!(matches!(err, BundleLockError::NotInstalled { scope: Scope::User, .. }));
}

#[test]
fn uninstall_removes_files_and_entry() {
    let h = Harness::new();
    h.coordinator
        .install(&request("1.0.0", Scope::Repository))
        .unwrap();

    let outcome = h
        .coordinator
        .uninstall("acme-tool", Scope::Repository)
        .unwrap();

    assert!(matches!(outcome, UninstallOutcome::Removed(_)));
    assert!(!h.installed_file("acme-tool").exists());
    // last bundle gone, so the lockfile is deleted
    assert!(!h.lockfile.path().exists());
    assert_eq!(
        h.coordinator
            .uninstall("acme-tool", Scope::Repository)
            .unwrap(),
        UninstallOutcome::NotInstalled
    );
}

#[test]
fn failed_uninstall_keeps_the_record() {
    let h = Harness::new();
    h.coordinator
        .install(&request("1.0.0", Scope::Repository))
        .unwrap();
    h.installer.fail_uninstall.store(true, Ordering::SeqCst);

    assert!(h
        .coordinator
        .uninstall("acme-tool", Scope::Repository)
        .is_err());
    assert!(h.lockfile.load().unwrap().unwrap().bundle("acme-tool").is_some());
}

#[test]
fn migrate_install_failure_leaves_bundle_nowhere() {
    let h = Harness::new();
    h.coordinator.install(&request("1.0.0", Scope::User)).unwrap();
    h.installer.fail_install.store(true, Ordering::SeqCst);

    let result = h
        .coordinator
        .migrate(&MigrateRequest {
            bundle_id: "acme-tool".to_string(),
            from_scope: Scope::User,
            to_scope: Scope::Workspace,
            source_url: String::new(),
            branch: None,
        })
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.failed_phase(), Some(MigrationPhase::Install));
    assert!(h.scopes_of("acme-tool").is_empty());
}

#[test]
fn migrate_of_absent_bundle_fails_verification() {
    let h = Harness::new();
    let result = h
        .coordinator
        .migrate(&MigrateRequest {
            bundle_id: "acme-tool".to_string(),
            from_scope: Scope::User,
            to_scope: Scope::Repository,
            source_url: "https://github.com/acme/tool".to_string(),
            branch: None,
        })
        .unwrap();

    assert_eq!(result.failed_phase(), Some(MigrationPhase::Verify));
    assert!(h.installer.calls().is_empty());
}

#[test]
fn migrate_to_repository_scope_writes_lockfile() {
    let h = Harness::new();
    h.coordinator.install(&request("1.0.0", Scope::Workspace)).unwrap();

    let result = h
        .coordinator
        .migrate(&MigrateRequest {
            bundle_id: "acme-tool".to_string(),
            from_scope: Scope::Workspace,
            to_scope: Scope::Repository,
            source_url: "https://github.com/acme/tool".to_string(),
            branch: Some("main".to_string()),
        })
        .unwrap();

    assert!(result.success);
    let lockfile = h.lockfile.load().unwrap().unwrap();
    assert_eq!(lockfile.bundle("acme-tool").unwrap().version, "1.0.0");
    assert_eq!(lockfile.sources["acme-github"].branch.as_deref(), Some("main"));
    assert!(h.store.installed("acme-tool", Scope::Workspace).unwrap().is_none());
}
