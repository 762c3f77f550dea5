//! # Tickdeck
//!
//! A small toolkit of terminal utilities built around one shared render loop.
//!
//! Tickdeck provides the pieces behind a block-digit clock with stopwatch and
//! prayer-time modes, a scrolling-text and countdown animator, a system
//! resource dashboard, and an error-tolerant directory backup walker.
//!
//! ## Core Concepts
//!
//! - **RenderEngine**: A single control point that waits on a fixed-interval
//!   ticker and a key-event channel, then redraws the active view.
//! - **View Providers**: Each mode is a `ViewProvider` that owns its own state
//!   (a stopwatch keeps running while you look at the clock) and turns the
//!   current `RenderState` into text.
//! - **Key Sources**: Raw keyboard input is read on a dedicated thread by a
//!   platform `KeySource` and forwarded as decoded `Key`s.
//! - **Backup Walker**: `backup::backup_dir` mirrors a tree, collecting
//!   per-entry failures instead of aborting.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tickdeck::prelude::*;
//! use tickdeck::keys::StdinKeySource;
//! use tickdeck::screen::TerminalScreen;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut engine = RenderEngine::new(Duration::from_millis(100))
//!         .with_view(ClockView::new())
//!         .with_view(StopwatchView::new());
//!
//!     let mut screen = TerminalScreen::stdout(false);
//!     let reason = engine.run(&mut screen, StdinKeySource::new()).await?;
//!     println!("exited: {:?}", reason);
//!     Ok(())
//! }
//! ```

pub const TOOLKIT_NAME: &str = "Tickdeck";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod audio;
pub mod backup;
pub mod common;
pub mod components;
pub mod config;
pub mod engine;
pub mod events;
pub mod keys;
pub mod prayer;
pub mod screen;
pub mod time;
pub mod views;

/// A prelude module for easy importing of the most common Tickdeck types.
pub mod prelude {
    pub use crate::common::{Key, Mode};
    pub use crate::config::TickdeckConfig;
    pub use crate::engine::{ExitReason, RenderEngine, RenderState};
    pub use crate::events::SystemEvent;
    pub use crate::keys::KeySource;
    pub use crate::screen::Screen;
    pub use crate::views::animate::{CountdownView, ScrollView};
    pub use crate::views::clock::ClockView;
    pub use crate::views::dashboard::DashboardView;
    pub use crate::views::prayer::PrayerView;
    pub use crate::views::stopwatch::StopwatchView;
    pub use crate::views::ViewProvider;
}
