//! Scrolling text and countdown frames, plus the views that animate them.

use super::ViewProvider;
use crate::common::Mode;
use crate::engine::RenderState;
use crate::time::TickEvent;
use chrono::{DateTime, Local};
use colored::Colorize;

/// One frame of `text` scrolling right to left across `width` columns.
///
/// At `position` 0 the text sits just past the right edge; at `width` it
/// starts in column 0. Widths and positions count characters, and the frame
/// is always exactly `width` characters long.
pub fn scroll_frame(text: &str, width: usize, position: usize) -> String {
    let mut line = vec![' '; width];
    let start = width as isize - position as isize;
    for (i, ch) in text.chars().enumerate() {
        let col = start + i as isize;
        if (0..width as isize).contains(&col) {
            line[col as usize] = ch;
        }
    }
    line.into_iter().collect()
}

/// Positions needed for `text` to cross `width` columns completely.
pub fn scroll_cycle_length(text: &str, width: usize) -> usize {
    width + text.chars().count()
}

/// `MM:SS` of the remaining seconds; negative input counts as zero.
pub fn countdown_frame(seconds_left: i64) -> String {
    let secs = seconds_left.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// The countdown framed by `=` borders.
pub fn countdown_banner(seconds_left: i64) -> String {
    let text = countdown_frame(seconds_left);
    let border = "=".repeat(text.len() + 4);
    format!("{}\n| {} |\n{}", border, text, border)
}

/// Scrolls a line of text forever, one column per tick.
#[derive(Debug)]
pub struct ScrollView {
    text: String,
    width: usize,
    position: usize,
}

impl ScrollView {
    pub fn new(text: impl Into<String>, width: usize) -> Self {
        Self {
            text: text.into(),
            width,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl ViewProvider for ScrollView {
    fn mode(&self) -> Mode {
        Mode::Scroll
    }

    fn on_tick(&mut self, _tick: &TickEvent, _state: &RenderState, _now: DateTime<Local>) {
        self.position += 1;
        if self.position > scroll_cycle_length(&self.text, self.width) {
            self.position = 0;
        }
    }

    fn render(&self, _state: &RenderState, _now: DateTime<Local>) -> String {
        scroll_frame(&self.text, self.width, self.position)
            .cyan()
            .to_string()
    }
}

/// Counts down one second per tick and finishes at zero.
#[derive(Debug)]
pub struct CountdownView {
    remaining: u64,
}

impl CountdownView {
    pub fn new(seconds: u64) -> Self {
        Self { remaining: seconds }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl ViewProvider for CountdownView {
    fn mode(&self) -> Mode {
        Mode::Countdown
    }

    fn on_tick(&mut self, _tick: &TickEvent, _state: &RenderState, _now: DateTime<Local>) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    fn render(&self, _state: &RenderState, _now: DateTime<Local>) -> String {
        let seconds = i64::try_from(self.remaining).unwrap_or(i64::MAX);
        countdown_banner(seconds).yellow().to_string()
    }

    fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn tick() -> TickEvent {
        TickEvent {
            tick_count: 1,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn frame_length_always_matches_width() {
        for width in [1, 5, 40] {
            for position in [0, 3, 40, 100] {
                assert_eq!(scroll_frame("Hi", width, position).chars().count(), width);
            }
        }
    }

    #[test]
    fn zero_width_is_empty() {
        assert_eq!(scroll_frame("test", 0, 5), "");
    }

    #[test]
    fn text_is_visible_at_position_width() {
        assert!(scroll_frame("Hello", 20, 20).starts_with("Hello"));
        assert_eq!(scroll_frame("Hello", 20, 0).trim(), "");
    }

    #[test]
    fn text_leaves_on_the_left() {
        assert_eq!(scroll_frame("Hello", 10, 12), "llo       ");
        assert_eq!(scroll_frame("Hello", 10, 15).trim(), "");
    }

    #[test]
    fn cycle_is_width_plus_text() {
        assert_eq!(scroll_cycle_length("Hello", 20), 25);
        assert_eq!(scroll_cycle_length("", 0), 0);
    }

    #[test]
    fn countdown_frames() {
        assert_eq!(countdown_frame(0), "00:00");
        assert_eq!(countdown_frame(59), "00:59");
        assert_eq!(countdown_frame(60), "01:00");
        assert_eq!(countdown_frame(125), "02:05");
        assert_eq!(countdown_frame(-1), "00:00");
    }

    #[test]
    fn banner_is_framed() {
        let banner = countdown_banner(90);
        assert!(banner.contains("| 01:30 |"));
        assert!(banner.starts_with("========="));
    }

    #[test]
    fn scroll_view_wraps_after_the_cycle() {
        let mut view = ScrollView::new("ab", 3);
        let state = RenderState::new(Mode::Scroll);
        for _ in 0..5 {
            view.on_tick(&tick(), &state, Local::now());
        }
        assert_eq!(view.position(), 5);
        view.on_tick(&tick(), &state, Local::now());
        assert_eq!(view.position(), 0);
    }

    #[test]
    fn countdown_view_finishes_at_zero() {
        let mut view = CountdownView::new(2);
        let state = RenderState::new(Mode::Countdown);
        assert!(!view.is_finished());
        view.on_tick(&tick(), &state, Local::now());
        view.on_tick(&tick(), &state, Local::now());
        assert!(view.is_finished());
        view.on_tick(&tick(), &state, Local::now());
        assert_eq!(view.remaining(), 0);
    }
}
