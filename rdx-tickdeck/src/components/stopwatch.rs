//! Elapsed-time tracking with start/stop/reset.

use std::time::{Duration, Instant};

/// Tracks elapsed time across any number of start/stop cycles.
///
/// While running, `elapsed()` is the folded total plus the time since the
/// last start; while stopped it is the folded total alone.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    elapsed: Duration,
    started_at: Option<Instant>,
}

impl Stopwatch {
    /// Creates a stopped, zeroed stopwatch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a stopped stopwatch, or stops a running one and folds the
    /// finished interval into the total.
    pub fn toggle(&mut self) {
        match self.started_at.take() {
            Some(started) => self.elapsed += started.elapsed(),
            None => self.started_at = Some(Instant::now()),
        }
    }

    /// Zeroes the total and stops, whatever the current state.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.started_at = None;
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started) => self.elapsed + started.elapsed(),
            None => self.elapsed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}
