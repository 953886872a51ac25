use std::path::Path;

use anyhow::{bail, Result};

use bundlelock::presentation::{create_lockfile_repository, create_repository_registry};
use bundlelock::{Config, LockfileRepository};

/// Drops the lockfile entry only; installed files are left in place
pub fn cmd_remove(root: &Path, config: &Config, bundle_id: &str, json: bool) -> Result<()> {
    let registry = create_repository_registry(config);
    let repo = create_lockfile_repository(&registry, root);
    if !repo.remove(bundle_id)? {
        bail!("'{}' is not in {}", bundle_id, repo.path().display());
    }

    let lockfile_deleted = !repo.path().exists();
    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "remove",
            "bundleId": bundle_id,
            "lockfileDeleted": lockfile_deleted,
        }))?;
    } else {
        println!("✓ Removed {}", bundle_id);
        if lockfile_deleted {
            println!("  Last bundle removed; deleted {}", repo.path().display());
        }
    }
    Ok(())
}
