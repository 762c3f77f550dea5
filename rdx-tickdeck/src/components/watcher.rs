//! Watches the wall clock for the moments a prayer alert should sound.

use crate::prayer::{PrayerTime, SUNRISE};
use chrono::{DateTime, NaiveDate, TimeDelta};
use chrono_tz::Tz;
use std::collections::HashSet;

/// How long after a prayer time the alert may still fire.
pub fn alert_window() -> TimeDelta {
    TimeDelta::minutes(1)
}

/// Fires at most once per named prayer per calendar day.
///
/// Delivery is best effort: if no check happens inside the one-minute
/// window after a prayer time, that alert is skipped for the day.
#[derive(Debug, Default)]
pub struct AzanWatcher {
    last_known_date: Option<NaiveDate>,
    triggered: HashSet<String>,
}

impl AzanWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the prayer whose alert should fire now, marking it as fired.
    ///
    /// The fired set resets whenever the date of `now` changes. Sunrise is
    /// listed with the prayers but never alerts.
    pub fn check<'a>(&mut self, now: DateTime<Tz>, times: &'a [PrayerTime]) -> Option<&'a PrayerTime> {
        let today = now.date_naive();
        if self.last_known_date != Some(today) {
            self.triggered.clear();
            self.last_known_date = Some(today);
        }

        for prayer in times {
            if prayer.name == SUNRISE || self.triggered.contains(&prayer.name) {
                continue;
            }
            let since = now.signed_duration_since(prayer.time);
            if since >= TimeDelta::zero() && since < alert_window() {
                self.triggered.insert(prayer.name.clone());
                return Some(prayer);
            }
        }
        None
    }

    pub fn has_fired(&self, name: &str) -> bool {
        self.triggered.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Africa::Dar_es_Salaam;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Tz> {
        Dar_es_Salaam.with_ymd_and_hms(2025, 3, 10, h, m, s).unwrap()
    }

    fn schedule() -> Vec<PrayerTime> {
        vec![
            PrayerTime::new("Fajr", at(5, 10, 0)),
            PrayerTime::new(SUNRISE, at(6, 20, 0)),
            PrayerTime::new("Dhuhr", at(12, 30, 0)),
        ]
    }

    #[test]
    fn fires_inside_the_window_once() {
        let times = schedule();
        let mut watcher = AzanWatcher::new();

        let fired = watcher.check(at(12, 30, 20), &times).map(|p| p.name.clone());
        assert_eq!(fired.as_deref(), Some("Dhuhr"));
        assert!(watcher.check(at(12, 30, 40), &times).is_none());
        assert!(watcher.has_fired("Dhuhr"));
    }

    #[test]
    fn outside_the_window_nothing_fires() {
        let times = schedule();
        let mut watcher = AzanWatcher::new();
        assert!(watcher.check(at(12, 29, 59), &times).is_none());
        assert!(watcher.check(at(12, 31, 0), &times).is_none());
    }

    #[test]
    fn sunrise_never_fires() {
        let times = schedule();
        let mut watcher = AzanWatcher::new();
        assert!(watcher.check(at(6, 20, 5), &times).is_none());
    }

    #[test]
    fn fired_set_resets_on_a_new_day() {
        let times = schedule();
        let mut watcher = AzanWatcher::new();
        assert!(watcher.check(at(5, 10, 1), &times).is_some());

        let tomorrow = Dar_es_Salaam.with_ymd_and_hms(2025, 3, 11, 0, 0, 1).unwrap();
        assert!(watcher.check(tomorrow, &times).is_none());
        assert!(!watcher.has_fired("Fajr"));
    }
}
