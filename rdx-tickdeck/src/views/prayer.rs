//! Prayer times view with the daily alert.
//!
//! Fetching happens on background tasks so a slow network never stalls the
//! render loop. Results come back over a channel that `on_tick` drains. A
//! failed fetch is simply attempted again on a later tick.

use super::ViewProvider;
use crate::audio::{self, AlertPlayer};
use crate::common::{Key, Mode};
use crate::components::watcher::AzanWatcher;
use crate::config::{PrayerConfig, TickdeckConfig};
use crate::engine::RenderState;
use crate::prayer::{AladhanClient, DailyTimes, PrayerCache, PrayerError, PrayerSource};
use crate::time::TickEvent;
use chrono::{DateTime, Local, NaiveDate};
use chrono_tz::Tz;
use colored::Colorize;
use std::fmt::Write;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct FetchOutcome {
    date: NaiveDate,
    result: Result<DailyTimes, PrayerError>,
}

pub struct PrayerView {
    source: Arc<dyn PrayerSource>,
    player: Arc<dyn AlertPlayer>,
    timezone: Tz,
    city: String,
    cache: PrayerCache,
    watcher: AzanWatcher,
    alert_enabled: bool,
    in_flight: Option<NaiveDate>,
    last_error: Option<String>,
    last_method: Option<String>,
    results_tx: mpsc::UnboundedSender<FetchOutcome>,
    results_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl PrayerView {
    pub fn new(
        source: Arc<dyn PrayerSource>,
        player: Arc<dyn AlertPlayer>,
        config: &PrayerConfig,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            source,
            player,
            timezone: config.timezone,
            city: config.city.clone(),
            cache: PrayerCache::new(),
            watcher: AzanWatcher::new(),
            alert_enabled: config.azan_enabled,
            in_flight: None,
            last_error: None,
            last_method: None,
            results_tx,
            results_rx,
        }
    }

    /// Wires the Aladhan client and the configured alert player.
    pub fn from_config(config: &TickdeckConfig) -> anyhow::Result<Self> {
        let source = Arc::new(AladhanClient::new(&config.prayer)?);
        let player = audio::from_config(&config.audio);
        Ok(Self::new(source, player, &config.prayer))
    }

    pub fn alert_enabled(&self) -> bool {
        self.alert_enabled
    }

    fn drain_results(&mut self) {
        while let Ok(outcome) = self.results_rx.try_recv() {
            self.in_flight = None;
            match outcome.result {
                Ok(daily) => {
                    info!("Prayer times loaded for {}", outcome.date);
                    self.last_method = Some(daily.method.clone());
                    self.last_error = None;
                    self.cache.store(daily);
                }
                Err(e) => {
                    warn!("Prayer times fetch for {} failed: {}", outcome.date, e);
                    self.last_error = Some(e.to_string());
                }
            }
        }
    }

    fn request(&mut self, date: NaiveDate) {
        let Ok(handle) = Handle::try_current() else {
            self.last_error = Some("no async runtime to fetch prayer times".to_string());
            return;
        };
        debug!("Requesting prayer times for {}", date);
        self.in_flight = Some(date);
        let source = Arc::clone(&self.source);
        let results = self.results_tx.clone();
        handle.spawn(async move {
            let result = source.fetch(date).await;
            results.send(FetchOutcome { date, result }).ok();
        });
    }

    fn render_board(&self, out: &mut String, now: DateTime<Tz>) {
        let header = format!(
            "╔══════════════════════════════════════╗\n\
             ║   🕌  Prayer Times - {:<15} ║\n\
             ╚══════════════════════════════════════╝",
            self.city
        );
        let _ = writeln!(out, "{}", header.bold().cyan());
        if let Some(method) = &self.last_method {
            let _ = writeln!(out, "  {}", format!("Method: {}", method).bright_black());
        }
        out.push('\n');

        if let Some(err) = &self.last_error {
            let _ = writeln!(out, "  {}", format!("⚠ {}", err).red());
            let _ = writeln!(out, "  {}", "Check internet connection and retry.".bright_black());
            return;
        }

        let Some(daily) = self.cache.get(now.date_naive()) else {
            let _ = writeln!(out, "  {}", "Loading prayer times...".yellow());
            return;
        };

        let next = daily.next_after(now);
        for prayer in &daily.times {
            let is_next = next.is_some_and(|n| std::ptr::eq(n, prayer));
            let marker = if is_next { "▶ " } else { "  " };
            let line = format!("{}{:<10} {}", marker, prayer.name, prayer.time.format("%H:%M"));
            let line = if is_next {
                line.yellow().bold()
            } else if prayer.time < now {
                line.bright_black()
            } else {
                line.normal()
            };
            let _ = writeln!(out, "  {}", line);
        }
        if next.is_none() {
            let _ = writeln!(out, "\n  {}", "All prayers completed for today ✓".green());
        }
    }
}

impl ViewProvider for PrayerView {
    fn mode(&self) -> Mode {
        Mode::PrayerTimes
    }

    fn on_tick(&mut self, _tick: &TickEvent, state: &RenderState, now: DateTime<Local>) {
        self.drain_results();

        let local = now.with_timezone(&self.timezone);
        let today = local.date_naive();
        let wanted = state.mode == Mode::PrayerTimes || self.alert_enabled;
        if wanted && self.in_flight.is_none() && self.cache.get(today).is_none() {
            self.request(today);
        }

        if !self.alert_enabled {
            return;
        }
        if let Some(daily) = self.cache.get(today) {
            if let Some(prayer) = self.watcher.check(local, &daily.times) {
                info!("Azan for {} at {}", prayer.name, prayer.time.format("%H:%M"));
                if let Err(e) = self.player.play() {
                    warn!("Could not play the azan: {:#}", e);
                }
            }
        }
    }

    fn on_key(&mut self, key: Key, _active: bool) -> bool {
        if key.is_char('a') {
            self.alert_enabled = !self.alert_enabled;
            info!("Azan alert {}", if self.alert_enabled { "enabled" } else { "disabled" });
            true
        } else if key.is_char('s') {
            self.player.stop();
            true
        } else {
            false
        }
    }

    fn render(&self, _state: &RenderState, now: DateTime<Local>) -> String {
        let mut out = String::new();
        self.render_board(&mut out, now.with_timezone(&self.timezone));
        if self.alert_enabled {
            let _ = writeln!(out, "  {}", "🔊 Azan: ON".green());
        } else {
            let _ = writeln!(out, "  {}", "🔇 Azan: OFF".bright_black());
        }
        if self.player.is_playing() {
            let _ = writeln!(out, "  {}", "♪ Playing azan... (press 's' to stop)".yellow());
        }
        out
    }

    fn global_hint(&self) -> Option<&'static str> {
        Some("a: azan on/off  |  s: stop audio")
    }
}
