//! Debouncing of lockfile events

use std::time::{Duration, Instant};

use crate::infrastructure::repositories::ExternalChange;

/// Debounce duration in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Collapses a burst of events into one change
///
/// Editors and atomic writers produce several events per save (create temp,
/// rename, modify). Only the settled outcome matters.
#[derive(Debug)]
pub struct DebounceState {
    pending: Option<ExternalChange>,
    last_change: Option<Instant>,
    debounce: Duration,
}

impl Default for DebounceState {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl DebounceState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            pending: None,
            last_change: None,
            debounce,
        }
    }

    /// Note an event; a creation stays a creation until flushed
    pub fn record(&mut self, change: ExternalChange) {
        self.pending = match (self.pending, change) {
            (Some(ExternalChange::Created), ExternalChange::Modified) => {
                Some(ExternalChange::Created)
            }
            _ => Some(change),
        };
        self.last_change = Some(Instant::now());
    }

    /// True once the burst has been quiet for the debounce period
    pub fn is_ready(&self) -> bool {
        match (self.pending, self.last_change) {
            (Some(_), Some(last)) => last.elapsed() >= self.debounce,
            _ => false,
        }
    }

    /// Take the settled change, resetting state
    pub fn take(&mut self) -> Option<ExternalChange> {
        self.last_change = None;
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
