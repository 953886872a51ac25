//! Lockfile watching
//!
//! Feeds external edits of a lockfile back into its repository:
//! - `notify` reports raw file system events for the repository root
//! - events are filtered to the lockfile name and debounced
//! - the repository re-reads and notifies its subscribers

mod debounce;
mod watcher;

pub use debounce::{DebounceState, DEFAULT_DEBOUNCE_MS};
pub use watcher::{LockfileWatcher, WatchError};
