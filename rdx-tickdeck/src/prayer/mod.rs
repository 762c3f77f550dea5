//! Daily prayer times: the data types, the source abstraction, and the
//! single-slot cache that keeps the render loop from refetching every tick.

pub mod aladhan;

pub use aladhan::AladhanClient;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use chrono_tz::Tz;

/// Listed with the prayers but never triggers an alert.
pub const SUNRISE: &str = "Sunrise";

/// The name and local time of one prayer.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerTime {
    pub name: String,
    pub time: DateTime<Tz>,
}

impl PrayerTime {
    pub fn new(name: &str, time: DateTime<Tz>) -> Self {
        Self {
            name: name.to_string(),
            time,
        }
    }
}

/// All prayer times for one calendar date, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTimes {
    pub date: NaiveDate,
    pub times: Vec<PrayerTime>,
    /// Calculation method reported by the source, shown as status.
    pub method: String,
}

impl DailyTimes {
    /// The first prayer strictly after `now`.
    pub fn next_after(&self, now: DateTime<Tz>) -> Option<&PrayerTime> {
        self.times.iter().find(|p| p.time > now)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrayerError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Status(u16),

    #[error("API error: {0}")]
    Api(String),

    #[error("failed to parse API response: {0}")]
    Parse(String),
}

/// Anything that can produce the prayer times of a date.
#[async_trait]
pub trait PrayerSource: Send + Sync {
    async fn fetch(&self, date: NaiveDate) -> Result<DailyTimes, PrayerError>;
}

/// Holds the times of at most one date; storing another date replaces it.
#[derive(Debug, Default)]
pub struct PrayerCache {
    slot: Option<DailyTimes>,
}

impl PrayerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached times, only if they belong to `date`.
    pub fn get(&self, date: NaiveDate) -> Option<&DailyTimes> {
        self.slot.as_ref().filter(|daily| daily.date == date)
    }

    pub fn store(&mut self, daily: DailyTimes) {
        self.slot = Some(daily);
    }
}

/// Parses `HH:MM`, optionally followed by a suffix such as ` (EAT)`, as a
/// time on `date` in zone `tz`.
pub fn parse_time(raw: &str, date: NaiveDate, tz: Tz) -> Result<DateTime<Tz>, PrayerError> {
    let clock = raw.split_whitespace().next().unwrap_or("");
    let invalid = || PrayerError::Parse(format!("invalid time '{}'", raw));

    let (h, m) = clock.split_once(':').ok_or_else(invalid)?;
    let hour: u32 = h.parse().map_err(|_| invalid())?;
    let minute: u32 = m.parse().map_err(|_| invalid())?;

    tz.with_ymd_and_hms(date.year(), date.month(), date.day(), hour, minute, 0)
        .earliest()
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Africa::Dar_es_Salaam;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn parse_time_accepts_zone_suffix() {
        let t = parse_time("05:07 (EAT)", day(10), Dar_es_Salaam).unwrap();
        assert_eq!((t.hour(), t.minute()), (5, 7));
        assert_eq!(t.date_naive(), day(10));

        let plain = parse_time(" 18:45 ", day(10), Dar_es_Salaam).unwrap();
        assert_eq!((plain.hour(), plain.minute()), (18, 45));
    }

    #[test]
    fn parse_time_rejects_garbage() {
        assert!(parse_time("noon", day(10), Dar_es_Salaam).is_err());
        assert!(parse_time("25:00", day(10), Dar_es_Salaam).is_err());
        assert!(parse_time("", day(10), Dar_es_Salaam).is_err());
    }

    #[test]
    fn cache_keeps_one_date() {
        let mut cache = PrayerCache::new();
        assert!(cache.get(day(10)).is_none());

        cache.store(DailyTimes { date: day(10), times: Vec::new(), method: "MWL".into() });
        assert!(cache.get(day(10)).is_some());
        assert!(cache.get(day(11)).is_none());

        cache.store(DailyTimes { date: day(11), times: Vec::new(), method: "MWL".into() });
        assert!(cache.get(day(10)).is_none());
        assert!(cache.get(day(11)).is_some());
    }

    #[test]
    fn next_after_skips_past_prayers() {
        let at = |h| Dar_es_Salaam.with_ymd_and_hms(2025, 3, 10, h, 0, 0).unwrap();
        let daily = DailyTimes {
            date: day(10),
            times: vec![PrayerTime::new("Fajr", at(5)), PrayerTime::new("Dhuhr", at(12))],
            method: String::new(),
        };
        assert_eq!(daily.next_after(at(6)).map(|p| p.name.as_str()), Some("Dhuhr"));
        assert!(daily.next_after(at(13)).is_none());
    }
}
