use std::path::Path;

use anyhow::Result;

use bundlelock::presentation::{create_lockfile_repository, create_repository_registry};
use bundlelock::{Config, LockfileRepository};

pub fn cmd_show(root: &Path, config: &Config, json: bool) -> Result<()> {
    let registry = create_repository_registry(config);
    let repo = create_lockfile_repository(&registry, root);
    let lockfile = repo.load()?;

    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "show",
            "path": repo.path().display().to_string(),
            "lockfile": lockfile,
        }))?;
        return Ok(());
    }

    let Some(lockfile) = lockfile else {
        println!("No lockfile at {}", repo.path().display());
        return Ok(());
    };

    println!("Lockfile: {}", repo.path().display());
    println!(
        "Generated by {} at {}",
        lockfile.generated_by,
        lockfile.generated_at.to_rfc3339()
    );

    println!("\nBundles ({}):", lockfile.bundles.len());
    for (id, entry) in &lockfile.bundles {
        println!(
            "  {} {} [{}] from {} ({} files)",
            id,
            entry.version,
            entry.commit_mode,
            entry.source_id,
            entry.files.len()
        );
    }

    println!("\nSources ({}):", lockfile.sources.len());
    for (id, source) in &lockfile.sources {
        match &source.branch {
            Some(branch) => println!("  {} {} {} ({})", id, source.source_type, source.url, branch),
            None => println!("  {} {} {}", id, source.source_type, source.url),
        }
    }

    if let Some(profiles) = &lockfile.profiles {
        println!("\nProfiles ({}):", profiles.len());
        for (id, profile) in profiles {
            println!("  {} {}: {}", id, profile.name, profile.bundle_ids.join(", "));
        }
    }

    Ok(())
}
