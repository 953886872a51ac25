//! Background lockfile watcher

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use notify::event::EventKind;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::ports::LockfileRepository;
use crate::infrastructure::repositories::{ExternalChange, JsonLockfileRepository};

use super::debounce::DebounceState;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to watch {}: {message}", path.display())]
    Watch { path: PathBuf, message: String },

    #[error("failed to start watcher thread: {0}")]
    Thread(#[from] std::io::Error),
}

/// Watches one repository's lockfile until stopped or dropped
pub struct LockfileWatcher {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl LockfileWatcher {
    /// Start watching the lockfile of `repository`
    ///
    /// The repository root is watched non-recursively; only events naming
    /// the lockfile are considered.
    pub fn start(
        repository: Arc<JsonLockfileRepository>,
        debounce: Duration,
    ) -> Result<Self, WatchError> {
        let root = repository.repository_root().to_path_buf();
        let watch_error = |e: notify::Error| WatchError::Watch {
            path: root.clone(),
            message: e.to_string(),
        };

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                let _ = tx.send(res);
            },
            Config::default(),
        )
        .map_err(watch_error)?;
        watcher
            .watch(&root, RecursiveMode::NonRecursive)
            .map_err(watch_error)?;

        repository.refresh_observed();
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let file_name = repository.settings().file_name.clone();

        let handle = std::thread::Builder::new()
            .name("bundlelock-watch".to_string())
            .spawn(move || {
                // Keep the notify watcher alive for the lifetime of the loop
                let _watcher = watcher;
                let mut state = DebounceState::new(debounce);

                while flag.load(Ordering::SeqCst) {
                    match rx.recv_timeout(POLL_INTERVAL) {
                        Ok(Ok(event)) => {
                            let names_lockfile = event
                                .paths
                                .iter()
                                .any(|p| p.file_name().is_some_and(|n| n == file_name.as_str()));
                            if names_lockfile {
                                if let Some(change) = classify(&event.kind) {
                                    state.record(change);
                                }
                            }
                        }
                        Ok(Err(e)) => tracing::warn!(error = %e, "lockfile watcher error"),
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }

                    if state.is_ready() {
                        if let Some(change) = state.take() {
                            repository.handle_external_change(settle(change, &repository));
                        }
                    }
                }
                tracing::debug!("lockfile watcher stopped");
            })?;

        tracing::debug!(root = %root.display(), "watching lockfile");
        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop watching and wait for the background thread to finish
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("lockfile watcher thread panicked");
            }
        }
    }
}

impl Drop for LockfileWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn classify(kind: &EventKind) -> Option<ExternalChange> {
    match kind {
        EventKind::Create(_) => Some(ExternalChange::Created),
        EventKind::Remove(_) => Some(ExternalChange::Deleted),
        // Includes renames onto the lockfile, which is how atomic writers replace it
        EventKind::Modify(_) => Some(ExternalChange::Modified),
        _ => None,
    }
}

/// Reconcile the debounced kind with what is on disk now
fn settle(change: ExternalChange, repository: &JsonLockfileRepository) -> ExternalChange {
    match (change, repository.lockfile_exists()) {
        (_, false) => ExternalChange::Deleted,
        (ExternalChange::Deleted, true) => ExternalChange::Modified,
        (change, true) => change,
    }
}
