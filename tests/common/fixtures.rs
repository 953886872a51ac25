//! Reusable fixtures: lockfile seeding and a scripted installer.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use bundlelock::domain::entities::FileEntry;
use bundlelock::domain::ports::{
    CreateOrUpdateOptions, InstallTarget, InstalledArtifacts, InstallerError, SourceOptions,
};
use bundlelock::domain::value_objects::ContentHash;
use bundlelock::{CommitMode, InstalledBundle, Installer, JsonLockfileRepository, LockfileRepository, Scope};

pub const SOURCE_URL: &str = "https://github.com/acme/prompts";

/// Lockfile text that is not JSON at all
pub const CORRUPT_LOCKFILE: &str = "{ \"bundles\": { this is not json";

/// Options for a bundle from the `acme-github` source
pub fn bundle_options(bundle_id: &str, version: &str, files: Vec<FileEntry>) -> CreateOrUpdateOptions {
    CreateOrUpdateOptions {
        bundle_id: bundle_id.to_string(),
        version: version.to_string(),
        source_id: "acme-github".to_string(),
        source_type: "github".to_string(),
        commit_mode: CommitMode::Commit,
        checksum: None,
        files,
        source: SourceOptions {
            source_type: "github".to_string(),
            url: SOURCE_URL.to_string(),
            branch: None,
        },
        hub: None,
        profile: None,
    }
}

/// Write `files` under `root` and record them for `bundle_id`
pub fn seed_bundle(root: &Path, bundle_id: &str, files: &[(&str, &str)]) {
    let entries = files
        .iter()
        .map(|(path, content)| {
            let absolute = root.join(path);
            std::fs::create_dir_all(absolute.parent().unwrap()).unwrap();
            std::fs::write(&absolute, content).unwrap();
            FileEntry::new(*path, ContentHash::from_bytes(content.as_bytes()).as_str())
        })
        .collect();
    JsonLockfileRepository::new(root)
        .create_or_update(bundle_options(bundle_id, "1.0.0", entries))
        .unwrap();
}

/// Places one `prompt.md` per bundle; can be told to fail
pub struct ScriptedInstaller {
    repo_root: PathBuf,
    home_root: PathBuf,
    pub fail_install: AtomicBool,
    pub fail_uninstall: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedInstaller {
    pub fn new(repo_root: &Path, home_root: &Path) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            home_root: home_root.to_path_buf(),
            fail_install: AtomicBool::new(false),
            fail_uninstall: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn install_root(&self, bundle_id: &str, scope: Scope) -> PathBuf {
        let base = match scope {
            Scope::Repository => self.repo_root.join(".github/prompts"),
            Scope::User => self.home_root.join("user"),
            Scope::Workspace => self.home_root.join("workspace"),
        };
        base.join(bundle_id)
    }

    pub fn set_failing(&self, install: bool) {
        self.fail_install.store(install, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Installer for ScriptedInstaller {
    fn install(
        &self,
        target: &InstallTarget,
        scope: Scope,
    ) -> Result<InstalledArtifacts, InstallerError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("install {}@{} {}", target.bundle_id, target.version, scope));
        if self.fail_install.load(Ordering::SeqCst) {
            return Err(InstallerError::InstallFailed {
                bundle_id: target.bundle_id.clone(),
                scope,
                message: "network unreachable".to_string(),
            });
        }
        let install_root = self.install_root(&target.bundle_id, scope);
        std::fs::create_dir_all(&install_root).unwrap();
        std::fs::write(
            install_root.join("prompt.md"),
            format!("# {} {}\n", target.bundle_id, target.version),
        )
        .unwrap();
        Ok(InstalledArtifacts {
            install_root,
            files: vec![PathBuf::from("prompt.md")],
            archive_checksum: Some("0".repeat(64)),
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
                message: "file in use".to_string(),
            });
        }
        let _ = std::fs::remove_dir_all(self.install_root(&bundle.bundle_id, bundle.scope));
        Ok(())
    }
}
