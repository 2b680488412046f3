//! Rolling-window summary statistics over stored observations.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::{
    Error, Result, WeatherRecord,
    filter::{Filter, Sort},
    store::RecordStore,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPeriod {
    pub days: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl StatsPeriod {
    /// Trailing window ending at `now`. Fails when the start falls outside the representable range.
    pub fn trailing(days: u32, now: DateTime<Utc>) -> Result<Self> {
        let start_date = Duration::try_days(i64::from(days))
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| {
                Error::validation(format!("a {days}-day window reaches before the earliest supported date"))
            })?;

        Ok(Self {
            days,
            start_date,
            end_date: now,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakSummary {
    pub avg: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherStats {
    pub period: StatsPeriod,
    pub total_records: usize,
    pub temperature: RangeSummary,
    pub humidity: RangeSummary,
    pub uv_index: PeakSummary,
}

/// Fetch the window's records from `store` and summarize them.
///
/// Returns `Ok(None)` when the window holds no records.
pub async fn compute_stats(
    store: &dyn RecordStore,
    city: Option<&str>,
    window_days: u32,
    now: DateTime<Utc>,
) -> Result<Option<WeatherStats>> {
    if window_days == 0 {
        return Err(Error::validation("days must be greater than zero"));
    }

    let period = StatsPeriod::trailing(window_days, now)?;
    let filter = Filter::since(period.start_date).for_city(city);
    let records = store.find_many(&filter, Sort::NewestFirst, None).await?;

    debug!(records = records.len(), days = window_days, city = ?city, "Fetched stats window");
    Ok(summarize(&records, period))
}

/// Arithmetic over an already-fetched set; `None` for an empty set.
pub fn summarize(records: &[WeatherRecord], period: StatsPeriod) -> Option<WeatherStats> {
    let temperature = range(records.iter().map(|r| r.current.temperature))?;
    let humidity = range(records.iter().map(|r| r.current.humidity))?;
    let uv = range(records.iter().map(|r| r.current.uv_index))?;

    Some(WeatherStats {
        period,
        total_records: records.len(),
        temperature,
        humidity,
        uv_index: PeakSummary {
            avg: uv.avg,
            max: uv.max,
        },
    })
}

fn range(values: impl Iterator<Item = f64>) -> Option<RangeSummary> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for v in values {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }

    (count > 0).then(|| RangeSummary {
        avg: sum / count as f64,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::fixtures::{new_record, record},
        store::MemoryStore,
    };
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn three_temperatures_average_to_the_middle() {
        let records: Vec<_> = [20.0, 25.0, 30.0]
            .into_iter()
            .map(|t| record("Porto Alegre", now(), t))
            .collect();

        let stats = summarize(&records, StatsPeriod::trailing(7, now()).unwrap()).unwrap();

        assert_eq!(stats.temperature, RangeSummary { avg: 25.0, min: 20.0, max: 30.0 });
        assert_eq!(stats.total_records, 3);
    }

    #[test]
    fn empty_set_has_no_stats() {
        assert!(summarize(&[], StatsPeriod::trailing(7, now()).unwrap()).is_none());
    }

    #[test]
    fn mean_lies_between_min_and_max() {
        let temps = [-3.5, 0.0, 12.25, 40.0, 7.75, 7.75];
        let mut records: Vec<_> = temps.iter().map(|&t| record("Gramado", now(), t)).collect();
        for (i, r) in records.iter_mut().enumerate() {
            r.current.humidity = 30.0 + i as f64 * 11.0;
            r.current.uv_index = (i % 4) as f64;
        }

        let stats = summarize(&records, StatsPeriod::trailing(1, now()).unwrap()).unwrap();

        for s in [stats.temperature, stats.humidity] {
            assert!(s.min <= s.avg && s.avg <= s.max, "{s:?}");
        }
        assert!(stats.uv_index.avg <= stats.uv_index.max);
        assert_eq!(stats.uv_index.max, 3.0);
    }

    #[test]
    fn period_is_derived_from_now_not_records() {
        let period = StatsPeriod::trailing(7, now()).unwrap();

        assert_eq!(period.end_date, now());
        assert_eq!(period.start_date, Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn window_and_city_restrict_the_fetch() {
        let store = MemoryStore::new();
        let old = now() - Duration::days(10);
        for (city, ts, temp) in [
            ("Porto Alegre", now() - Duration::hours(2), 20.0),
            ("Porto Alegre", now() - Duration::days(2), 30.0),
            ("Porto Alegre", old, -50.0),
            ("Manaus", now() - Duration::hours(1), 35.0),
        ] {
            store.insert(new_record(city, ts, temp)).await.unwrap();
        }

        let stats = compute_stats(&store, Some("Porto Alegre"), 7, now()).await.unwrap().unwrap();

        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.temperature.avg, 25.0);
        assert_eq!(stats.period.days, 7);

        let none = compute_stats(&store, Some("Belém"), 7, now()).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn zero_day_window_is_rejected() {
        let store = MemoryStore::new();
        let err = compute_stats(&store, None, 0, now()).await.unwrap_err();
        assert!(matches!(err, Error::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn window_past_calendar_range_is_rejected() {
        let store = MemoryStore::new();
        store.insert(new_record("Porto Alegre", now(), 21.0)).await.unwrap();

        let err = compute_stats(&store, None, 4_000_000_000, now()).await.unwrap_err();
        assert!(matches!(err, Error::ValidationFailed { .. }));

        let widest = compute_stats(&store, None, 36_500, now()).await.unwrap().unwrap();
        assert_eq!(widest.total_records, 1);
    }
}
