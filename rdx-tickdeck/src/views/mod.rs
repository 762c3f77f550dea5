//! View providers: one per mode, each turning the render state into text.
//!
//! A view owns whatever state its mode needs, so that state survives mode
//! switches. The engine calls `on_tick` on every view each tick, offers keys
//! it does not handle itself to every view, and renders only the active one.

pub mod animate;
pub mod clock;
pub mod dashboard;
pub mod prayer;
pub mod stopwatch;

use crate::common::{Key, Mode};
use crate::engine::RenderState;
use crate::time::TickEvent;
use chrono::{DateTime, Local};
use colored::Colorize;

pub trait ViewProvider: Send {
    fn mode(&self) -> Mode;

    /// Advances time-driven state. Runs for every view, active or not.
    fn on_tick(&mut self, _tick: &TickEvent, _state: &RenderState, _now: DateTime<Local>) {}

    /// Handles a key the engine did not consume. Returns `true` if handled.
    fn on_key(&mut self, _key: Key, _active: bool) -> bool {
        false
    }

    fn render(&self, state: &RenderState, now: DateTime<Local>) -> String;

    /// Key hint shown while this view is active.
    fn hint(&self) -> Option<&'static str> {
        None
    }

    /// Key hint shown whichever view is active.
    fn global_hint(&self) -> Option<&'static str> {
        None
    }

    /// When the active view reports `true`, the render loop ends.
    fn is_finished(&self) -> bool {
        false
    }
}

/// Renders the mode bar and key hints shown above multi-view frames.
pub fn render_nav(views: &[Box<dyn ViewProvider>], active: Mode) -> String {
    let tabs: Vec<String> = views
        .iter()
        .map(|view| {
            let label = view.mode().label();
            if view.mode() == active {
                format!(" {} ", format!(" {} ", label).bold().reversed())
            } else {
                format!(" {} ", label.bright_black())
            }
        })
        .collect();

    let mut nav = tabs.join("│");
    nav.push('\n');
    nav.push_str("  ← → switch modes");
    if let Some(hint) = views
        .iter()
        .find(|view| view.mode() == active)
        .and_then(|view| view.hint())
    {
        nav.push_str("  |  ");
        nav.push_str(hint);
    }
    for hint in views.iter().filter_map(|view| view.global_hint()) {
        nav.push_str("  |  ");
        nav.push_str(hint);
    }
    nav.push_str("\n\n");
    nav
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::clock::ClockView;
    use crate::views::stopwatch::StopwatchView;

    #[test]
    fn nav_lists_every_mode_and_active_hint() {
        let views: Vec<Box<dyn ViewProvider>> =
            vec![Box::new(ClockView::new()), Box::new(StopwatchView::new())];

        let on_clock = render_nav(&views, Mode::Clock);
        assert!(on_clock.contains("Clock"));
        assert!(on_clock.contains("Stopwatch"));
        assert!(!on_clock.contains("start/stop"));

        let on_stopwatch = render_nav(&views, Mode::Stopwatch);
        assert!(on_stopwatch.contains("SPACE: start/stop"));
    }
}
