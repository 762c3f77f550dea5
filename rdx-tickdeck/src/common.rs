//! Contains common, primitive types shared by the engine, the key sources,
//! and the views.
//!
//! `Mode` names the views a render loop can switch between, and `Key` is the
//! decoded form of one keyboard event. Using distinct types keeps the raw
//! byte protocol of the terminal out of the dispatch logic.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Identifies the view a `RenderEngine` is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Clock,
    Stopwatch,
    #[serde(alias = "prayer")]
    PrayerTimes,
    Dashboard,
    Scroll,
    Countdown,
}

impl Mode {
    /// The label shown in the navigation bar.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Clock => "🕐 Clock",
            Mode::Stopwatch => "⏱  Stopwatch",
            Mode::PrayerTimes => "🕌 Prayer Times",
            Mode::Dashboard => "🖥  Dashboard",
            Mode::Scroll => "Scroll",
            Mode::Countdown => "Countdown",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Clock => "clock",
            Mode::Stopwatch => "stopwatch",
            Mode::PrayerTimes => "prayer",
            Mode::Dashboard => "dashboard",
            Mode::Scroll => "scroll",
            Mode::Countdown => "countdown",
        };
        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clock" => Ok(Mode::Clock),
            "stopwatch" => Ok(Mode::Stopwatch),
            "prayer" | "prayertimes" | "prayer-times" => Ok(Mode::PrayerTimes),
            "dashboard" => Ok(Mode::Dashboard),
            "scroll" => Ok(Mode::Scroll),
            "countdown" => Ok(Mode::Countdown),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

/// One decoded keyboard event.
///
/// Arrow keys collapse to the `Left` and `Right` sentinels so they can never
/// be confused with the letters of their escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Ctrl+C delivered as a key because raw mode swallowed the signal.
    Interrupt,
    Byte(u8),
}

impl Key {
    /// Returns `true` if this key is the given ASCII character, ignoring case.
    pub fn is_char(&self, ch: char) -> bool {
        match self {
            Key::Byte(b) => (*b as char).eq_ignore_ascii_case(&ch),
            _ => false,
        }
    }
}
