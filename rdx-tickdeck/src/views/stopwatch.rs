use super::clock::render_duration;
use super::ViewProvider;
use crate::common::{Key, Mode};
use crate::components::stopwatch::Stopwatch;
use crate::engine::RenderState;
use chrono::{DateTime, Local};
use colored::Colorize;

/// Big-digit stopwatch. Keeps running while other views are shown.
#[derive(Debug, Default)]
pub struct StopwatchView {
    stopwatch: Stopwatch,
}

impl StopwatchView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }
}

impl ViewProvider for StopwatchView {
    fn mode(&self) -> Mode {
        Mode::Stopwatch
    }

    fn on_key(&mut self, key: Key, active: bool) -> bool {
        if !active {
            return false;
        }
        match key {
            Key::Byte(b' ') => self.stopwatch.toggle(),
            k if k.is_char('r') => self.stopwatch.reset(),
            _ => return false,
        }
        true
    }

    fn render(&self, state: &RenderState, _now: DateTime<Local>) -> String {
        let elapsed = self.stopwatch.elapsed();
        let status = if self.stopwatch.is_running() {
            "● Running".green()
        } else {
            "⏸ Stopped".red()
        };
        format!(
            "{}\n\n  .{:03}   {}\n",
            render_duration(elapsed, state.show_separator()),
            elapsed.subsec_millis(),
            status
        )
    }

    fn hint(&self) -> Option<&'static str> {
        Some("SPACE: start/stop  |  r: reset")
    }
}
