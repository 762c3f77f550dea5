//! The master ticker and the blink phase it drives.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// How many ticks pass between two flips of the blink phase.
pub const BLINK_EVERY_TICKS: u64 = 5;

/// One firing of the periodic redraw timer.
#[derive(Debug, Clone)]
pub struct TickEvent {
    /// Monotonic tick number, starting at 1.
    pub tick_count: u64,
    pub timestamp: Instant,
}

/// A fixed-interval ticker that acts as the single source of redraw time.
///
/// The first tick fires one full interval after creation, not immediately.
pub struct SystemClock {
    ticker: Interval,
    tick_count: u64,
}

impl SystemClock {
    pub fn new(interval: Duration) -> Self {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            ticker,
            tick_count: 0,
        }
    }

    /// Waits for the next tick.
    pub async fn next(&mut self) -> TickEvent {
        let timestamp = self.ticker.tick().await;
        self.tick_count += 1;
        TickEvent {
            tick_count: self.tick_count,
            timestamp,
        }
    }
}

/// A boolean toggled every `BLINK_EVERY_TICKS` ticks to animate a separator.
#[derive(Debug, Clone)]
pub struct BlinkPhase {
    ticks: u64,
    visible: bool,
}

impl BlinkPhase {
    pub fn new() -> Self {
        Self {
            ticks: 0,
            visible: true,
        }
    }

    /// Counts one tick and flips the phase on every fifth.
    pub fn advance(&mut self) {
        self.ticks += 1;
        if self.ticks % BLINK_EVERY_TICKS == 0 {
            self.visible = !self.visible;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for BlinkPhase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blink_flips_every_fifth_tick() {
        let mut blink = BlinkPhase::new();
        assert!(blink.is_visible());
        for _ in 0..4 {
            blink.advance();
            assert!(blink.is_visible());
        }
        blink.advance();
        assert!(!blink.is_visible());
        for _ in 0..5 {
            blink.advance();
        }
        assert!(blink.is_visible());
    }

    #[tokio::test]
    async fn clock_counts_ticks_from_one() {
        let mut clock = SystemClock::new(Duration::from_millis(5));
        let first = clock.next().await;
        let second = clock.next().await;
        assert_eq!(first.tick_count, 1);
        assert_eq!(second.tick_count, 2);
        assert!(second.timestamp >= first.timestamp);
    }
}
