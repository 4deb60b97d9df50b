//! Trailing-edge debouncing of bursty input.

use std::time::Duration;

/// Holds back values until no new one arrived for the quiet period.
///
/// Only the last value of a burst comes out.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Duration)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Replaces the pending value and restarts the quiet period at `now`.
    pub fn push(&mut self, value: T, now: Duration) {
        self.pending = Some((value, now + self.quiet));
    }

    /// Returns the pending value once its quiet period is over.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
