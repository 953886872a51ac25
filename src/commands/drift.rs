use std::path::Path;

use anyhow::{bail, Result};

use bundlelock::domain::entities::ModificationType;
use bundlelock::presentation::{create_lockfile_repository, create_repository_registry};
use bundlelock::{Config, LockfileRepository};

pub fn cmd_drift(root: &Path, config: &Config, bundle_id: &str, json: bool) -> Result<()> {
    let registry = create_repository_registry(config);
    let repo = create_lockfile_repository(&registry, root);
    let tracked = repo
        .load()?
        .is_some_and(|lockfile| lockfile.bundle(bundle_id).is_some());
    if !tracked {
        bail!("'{}' is not in {}", bundle_id, repo.path().display());
    }

    let drift = repo.detect_modified_files(bundle_id);

    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "drift",
            "bundleId": bundle_id,
            "files": drift,
        }))?;
    } else if drift.is_empty() {
        println!("✓ {}: no local changes", bundle_id);
    } else {
        println!("{}: {} files changed", bundle_id, drift.len());
        for file in &drift {
            let label = match file.modification_type {
                ModificationType::Modified => "modified",
                ModificationType::Missing => "missing",
            };
            println!("  {:<9} {}", label, file.path);
        }
    }

    if !drift.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
