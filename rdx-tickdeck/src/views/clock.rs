//! Seven-segment ASCII digits and the wall-clock view.

use super::ViewProvider;
use crate::common::Mode;
use crate::engine::RenderState;
use chrono::{DateTime, Local, Timelike};
use std::time::Duration;

/// Rows per rendered glyph.
pub const GLYPH_ROWS: usize = 5;

type Glyph = [&'static str; GLYPH_ROWS];

const DIGITS: [Glyph; 10] = [
    [" _ ", "| |", "   ", "| |", " _ "],
    ["   ", "  |", "   ", "  |", "   "],
    [" _ ", "  |", " _ ", "|  ", " _ "],
    [" _ ", "  |", " _ ", "  |", " _ "],
    ["   ", "| |", " _ ", "  |", "   "],
    [" _ ", "|  ", " _ ", "  |", " _ "],
    [" _ ", "|  ", " _ ", "| |", " _ "],
    [" _ ", "  |", "   ", "  |", "   "],
    [" _ ", "| |", " _ ", "| |", " _ "],
    [" _ ", "| |", " _ ", "  |", " _ "],
];

const BLANK_DIGIT: Glyph = ["   "; GLYPH_ROWS];
const COLON_ON: Glyph = [" ", "o", " ", "o", " "];
const COLON_OFF: Glyph = [" "; GLYPH_ROWS];

/// The three-column glyph of a digit; anything else renders blank.
pub fn render_digit(ch: char) -> Glyph {
    match ch.to_digit(10) {
        Some(d) => DIGITS[d as usize],
        None => BLANK_DIGIT,
    }
}

/// Lays out `text` (digits and `:`) as five rows joined by single spaces.
fn render_glyphs(text: &str, show_colon: bool) -> String {
    let glyphs: Vec<Glyph> = text
        .chars()
        .map(|ch| match ch {
            ':' if show_colon => COLON_ON,
            ':' => COLON_OFF,
            other => render_digit(other),
        })
        .collect();

    (0..GLYPH_ROWS)
        .map(|row| {
            glyphs
                .iter()
                .map(|glyph| glyph[row])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders `HH:MM` of `time`. `show_colon` drives the blinking separator.
pub fn render_time<T: Timelike>(time: &T, show_colon: bool) -> String {
    render_glyphs(
        &format!("{:02}:{:02}", time.hour(), time.minute()),
        show_colon,
    )
}

/// Renders a duration as `MM:SS`, or `HH:MM:SS` from one hour on.
pub fn render_duration(elapsed: Duration, show_colon: bool) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    let text = if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    };
    render_glyphs(&text, show_colon)
}

/// Large digits of the local time with the date underneath.
#[derive(Debug, Default)]
pub struct ClockView;

impl ClockView {
    pub fn new() -> Self {
        Self
    }
}

impl ViewProvider for ClockView {
    fn mode(&self) -> Mode {
        Mode::Clock
    }

    fn render(&self, state: &RenderState, now: DateTime<Local>) -> String {
        format!(
            "{}\n\n  {}\n",
            render_time(&now, state.show_separator()),
            now.format("%A, %d %B %Y")
        )
    }
}
