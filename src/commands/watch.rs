use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use bundlelock::domain::ports::LockfileChanged;
use bundlelock::presentation::{create_lockfile_repository, create_repository_registry};
use bundlelock::{Config, LockfileRepository, LockfileWatcher};

const TICK: Duration = Duration::from_millis(200);

pub fn cmd_watch(root: &Path, config: &Config, json: bool) -> Result<()> {
    if !config.watch.enabled {
        bail!("watching is disabled by configuration ([watch] enabled = false)");
    }

    let registry = create_repository_registry(config);
    let repo = create_lockfile_repository(&registry, root);
    let changes = repo.subscribe();

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    let mut watcher = LockfileWatcher::start(repo.clone(), config.debounce())?;

    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "start",
            "command": "watch",
            "path": repo.path().display().to_string(),
        }))?;
    } else {
        println!("Watching {}", repo.path().display());
        println!("Press Ctrl+C to stop\n");
    }

    while running.load(Ordering::SeqCst) {
        match changes.recv_timeout(TICK) {
            Ok(change) => render(&change, json)?,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    watcher.stop();
    if json {
        crate::ui::json::emit(serde_json::json!({ "event": "shutdown" }))?;
    } else {
        println!("\nStopped");
    }
    Ok(())
}

fn render(change: &LockfileChanged, json: bool) -> Result<()> {
    if json {
        crate::ui::json::emit(serde_json::json!({
            "event": "changed",
            "path": change.path.display().to_string(),
            "lockfile": change.lockfile,
        }))?;
        return Ok(());
    }

    match &change.lockfile {
        Some(lockfile) => println!(
            "Changed: {} ({} bundles)",
            change.path.display(),
            lockfile.bundles.len()
        ),
        None => println!("Deleted: {}", change.path.display()),
    }
    Ok(())
}
