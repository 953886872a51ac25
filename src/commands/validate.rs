use std::path::Path;

use anyhow::Result;

use bundlelock::presentation::{create_lockfile_repository, create_repository_registry};
use bundlelock::{Config, LockfileRepository};

pub fn cmd_validate(root: &Path, config: &Config, json: bool) -> Result<()> {
    let registry = create_repository_registry(config);
    let repo = create_lockfile_repository(&registry, root);
    let report = repo.validate();

    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "validate",
            "path": repo.path().display().to_string(),
            "valid": report.valid,
            "schemaVersion": report.schema_version,
            "errors": report.errors,
            "warnings": report.warnings,
        }))?;
    } else {
        for error in &report.errors {
            println!("  ✗ {}", error);
        }
        for warning in &report.warnings {
            println!("  ⚠ {}", warning);
        }
        if report.valid {
            println!("✓ {} is valid", repo.path().display());
        } else {
            println!(
                "✗ {} is invalid ({} errors)",
                repo.path().display(),
                report.errors.len()
            );
        }
    }

    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}
