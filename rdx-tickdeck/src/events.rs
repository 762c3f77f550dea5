//! Defines the public event types broadcast by the render engine.
//!
//! Subscribers (loggers, tests, embedding applications) receive these on a
//! `tokio::sync::broadcast` channel. Sending never blocks the loop; events
//! are dropped when nobody listens.

use crate::common::Mode;
use tokio::time::Instant;

/// Why a render loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The quit key was pressed.
    Quit,
    /// An interrupt signal (or Ctrl+C in raw mode) arrived.
    Interrupted,
    /// The active view reported that it has nothing more to show.
    Finished,
}

/// Events related to the lifecycle and state of the engine itself.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Fired once when the loop begins, after the first frame is drawn.
    EngineStarted { timestamp: Instant },
    /// Fired when a key switches the active view.
    ModeChanged { from: Mode, to: Mode },
    /// Fired once when the loop is about to return.
    EngineShutdown { reason: ExitReason },
}
