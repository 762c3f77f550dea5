//! Defines all configuration structures for the Tickdeck utilities.
//!
//! These structs are deserialized with `serde` through the `config` crate.
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed `TICKDECK__` (for example
//! `TICKDECK__CLOCK__TICK_MS=50`).

use crate::common::Mode;
use anyhow::Context;
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tickdeck.toml";

/// The top-level configuration shared by every utility.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TickdeckConfig {
    pub clock: ClockConfig,
    pub prayer: PrayerConfig,
    pub audio: AudioConfig,
    pub animate: AnimateConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

impl TickdeckConfig {
    /// Loads the layered configuration.
    ///
    /// An explicit `path` must exist; without one, `tickdeck.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("TICKDECK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?;
        settings
            .try_deserialize()
            .context("invalid configuration")
    }
}

/// Settings for the clock command's render loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Redraw interval in milliseconds. The separator blinks every 5 ticks.
    pub tick_ms: u64,
    pub initial_mode: Mode,
}

impl ClockConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            initial_mode: Mode::Clock,
        }
    }
}

/// Where and how prayer times are fetched.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrayerConfig {
    pub city: String,
    pub country: String,
    /// Aladhan calculation method; 3 is the Muslim World League.
    pub method: u8,
    /// IANA zone the returned times are interpreted in.
    pub timezone: Tz,
    pub api_base: String,
    pub timeout_secs: u64,
    pub azan_enabled: bool,
}

impl Default for PrayerConfig {
    fn default() -> Self {
        Self {
            city: "Dar es Salaam".to_string(),
            country: "Tanzania".to_string(),
            method: 3,
            timezone: chrono_tz::Africa::Dar_es_Salaam,
            api_base: "https://api.aladhan.com/v1".to_string(),
            timeout_secs: 10,
            azan_enabled: true,
        }
    }
}

/// One external program able to play an audio file given as its last argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl PlayerCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Settings for the prayer alert sound.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Audio file to play; without one the terminal bell is used.
    pub file: Option<PathBuf>,
    /// Players tried in order until one starts.
    pub players: Vec<PlayerCommand>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            file: None,
            players: default_players(),
        }
    }
}

fn default_players() -> Vec<PlayerCommand> {
    if cfg!(target_os = "macos") {
        vec![PlayerCommand::new("afplay", &[])]
    } else if cfg!(windows) {
        Vec::new()
    } else {
        vec![
            PlayerCommand::new("mpv", &["--no-video", "--really-quiet"]),
            PlayerCommand::new("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
            PlayerCommand::new("paplay", &[]),
            PlayerCommand::new("aplay", &["-q"]),
        ]
    }
}

/// Defaults for the animate command.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimateConfig {
    pub scroll_ms: u64,
    pub width: usize,
    pub text: String,
    pub seconds: u64,
}

impl Default for AnimateConfig {
    fn default() -> Self {
        Self {
            scroll_ms: 80,
            width: 60,
            text: "Good Morning Dadi".to_string(),
            seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub refresh_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { refresh_secs: 2 }
    }
}

/// Logging output. `RUST_LOG` takes precedence over `level` when set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file. Without one, screen commands discard logs and `backup` uses stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_clock_contract() {
        let config = TickdeckConfig::default();
        assert_eq!(config.clock.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.clock.initial_mode, Mode::Clock);
        assert_eq!(config.prayer.method, 3);
        assert_eq!(config.animate.width, 60);
        assert_eq!(config.dashboard.refresh_secs, 2);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[clock]\ntick_ms = 50\ninitial_mode = \"stopwatch\"\n\n[prayer]\ncity = \"Mombasa\"\ntimezone = \"Africa/Nairobi\"\n\n[audio]\nplayers = [{{ program = \"mpv\" }}]"
        )
        .unwrap();

        let config = TickdeckConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.clock.tick_ms, 50);
        assert_eq!(config.clock.initial_mode, Mode::Stopwatch);
        assert_eq!(config.prayer.city, "Mombasa");
        assert_eq!(config.prayer.timezone, chrono_tz::Africa::Nairobi);
        assert_eq!(config.prayer.country, "Tanzania");
        assert_eq!(config.audio.players, vec![PlayerCommand::new("mpv", &[])]);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(TickdeckConfig::load(Some(&missing)).is_err());
    }
}
