//! Prayer times from the Aladhan `timingsByCity` endpoint.

use super::{parse_time, DailyTimes, PrayerError, PrayerSource, PrayerTime};
use crate::config::PrayerConfig;
use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct AladhanResponse {
    code: u16,
    status: String,
    data: Option<AladhanData>,
}

#[derive(Debug, Deserialize)]
struct AladhanData {
    timings: AladhanTimings,
    #[serde(default)]
    meta: Option<AladhanMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AladhanTimings {
    fajr: String,
    sunrise: String,
    dhuhr: String,
    asr: String,
    maghrib: String,
    isha: String,
}

#[derive(Debug, Deserialize)]
struct AladhanMeta {
    method: AladhanMethod,
}

#[derive(Debug, Deserialize)]
struct AladhanMethod {
    name: String,
}

/// HTTP client for one configured city.
pub struct AladhanClient {
    http: reqwest::Client,
    api_base: String,
    city: String,
    country: String,
    method: u8,
    timezone: Tz,
}

impl AladhanClient {
    pub fn new(config: &PrayerConfig) -> Result<Self, PrayerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            city: config.city.clone(),
            country: config.country.clone(),
            method: config.method,
            timezone: config.timezone,
        })
    }

    fn url(&self, date: NaiveDate) -> String {
        format!("{}/timingsByCity/{}", self.api_base, date.format("%d-%m-%Y"))
    }
}

impl AladhanResponse {
    /// Converts a decoded response into display-ordered times on `date`.
    ///
    /// The status label is the method name the API reports, or the
    /// requested method id when the response carries no meta block.
    pub(crate) fn into_daily(
        self,
        date: NaiveDate,
        tz: Tz,
        method_id: u8,
    ) -> Result<DailyTimes, PrayerError> {
        if self.code != 200 {
            return Err(PrayerError::Api(self.status));
        }
        let data = self
            .data
            .ok_or_else(|| PrayerError::Parse("response has no data".to_string()))?;
        let t = data.timings;
        let named = [
            ("Fajr", t.fajr),
            (super::SUNRISE, t.sunrise),
            ("Dhuhr", t.dhuhr),
            ("Asr", t.asr),
            ("Maghrib", t.maghrib),
            ("Isha", t.isha),
        ];
        let times = named
            .iter()
            .map(|(name, raw)| Ok(PrayerTime::new(name, parse_time(raw, date, tz)?)))
            .collect::<Result<Vec<_>, PrayerError>>()?;
        let method = match data.meta {
            Some(meta) => meta.method.name,
            None => format!("method {}", method_id),
        };
        Ok(DailyTimes { date, times, method })
    }
}

#[async_trait]
impl PrayerSource for AladhanClient {
    async fn fetch(&self, date: NaiveDate) -> Result<DailyTimes, PrayerError> {
        let method = self.method.to_string();
        debug!("Fetching prayer times for {} in {}", date, self.city);
        let response = self
            .http
            .get(self.url(date))
            .query(&[
                ("city", self.city.as_str()),
                ("country", self.country.as_str()),
                ("method", method.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrayerError::Status(status.as_u16()));
        }
        let body: AladhanResponse = response
            .json()
            .await
            .map_err(|e| PrayerError::Parse(e.to_string()))?;
        body.into_daily(date, self.timezone, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Africa::Dar_es_Salaam;

    const SAMPLE: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {
                "Fajr": "05:01", "Sunrise": "06:17", "Dhuhr": "12:24",
                "Asr": "15:46 (EAT)", "Maghrib": "18:28", "Isha": "19:36",
                "Imsak": "04:51"
            },
            "meta": { "method": { "id": 3, "name": "Muslim World League" } }
        }
    }"#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn sample_response_yields_six_ordered_times() {
        let response: AladhanResponse = serde_json::from_str(SAMPLE).unwrap();
        let daily = response.into_daily(date(), Dar_es_Salaam, 3).unwrap();

        let names: Vec<_> = daily.times.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Fajr", "Sunrise", "Dhuhr", "Asr", "Maghrib", "Isha"]);
        assert_eq!(daily.times[3].time.hour(), 15);
        assert_eq!(daily.times[3].time.minute(), 46);
        assert_eq!(daily.method, "Muslim World League");
    }

    #[test]
    fn method_label_follows_the_reported_method() {
        let isna = SAMPLE.replace(
            r#"{ "id": 3, "name": "Muslim World League" }"#,
            r#"{ "id": 2, "name": "Islamic Society of North America (ISNA)" }"#,
        );
        let response: AladhanResponse = serde_json::from_str(&isna).unwrap();
        let daily = response.into_daily(date(), Dar_es_Salaam, 2).unwrap();
        assert_eq!(daily.method, "Islamic Society of North America (ISNA)");
    }

    #[test]
    fn method_label_without_meta_names_the_requested_id() {
        let json = r#"{"code": 200, "status": "OK", "data": {"timings": {
            "Fajr": "05:01", "Sunrise": "06:17", "Dhuhr": "12:24",
            "Asr": "15:46", "Maghrib": "18:28", "Isha": "19:36"}}}"#;
        let response: AladhanResponse = serde_json::from_str(json).unwrap();
        let daily = response.into_daily(date(), Dar_es_Salaam, 4).unwrap();
        assert_eq!(daily.method, "method 4");
    }

    #[test]
    fn api_error_code_is_reported() {
        let response: AladhanResponse =
            serde_json::from_str(r#"{"code": 400, "status": "Bad Request", "data": null}"#).unwrap();
        let err = response.into_daily(date(), Dar_es_Salaam, 3).unwrap_err();
        assert!(matches!(err, PrayerError::Api(ref s) if s == "Bad Request"));
    }

    #[test]
    fn url_uses_day_month_year() {
        let client = AladhanClient::new(&PrayerConfig::default()).unwrap();
        assert_eq!(
            client.url(date()),
            "https://api.aladhan.com/v1/timingsByCity/10-03-2025"
        );
    }
}
