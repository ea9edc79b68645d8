use chrono::{NaiveDate, TimeZone};
use indexmap::IndexMap;

use crate::models::{DailyAggregate, ForecastSample};

pub fn local_date<Tz: TimeZone>(sample: &ForecastSample, tz: &Tz) -> Option<NaiveDate> {
    sample
        .utc()
        .map(|instant| instant.with_timezone(tz).date_naive())
}

/// Group samples by local calendar day.
///
/// Samples whose timestamp is out of range for `chrono` are skipped.
pub fn group_by_day<Tz: TimeZone>(
    samples: &[ForecastSample],
    tz: &Tz,
) -> IndexMap<NaiveDate, DailyAggregate> {
    let mut days: IndexMap<NaiveDate, DailyAggregate> = IndexMap::new();

    for sample in samples {
        let Some(date) = local_date(sample, tz) else {
            tracing::warn!(timestamp = sample.timestamp, "skipping sample with invalid timestamp");
            continue;
        };

        let entry = days.entry(date).or_insert(DailyAggregate {
            date,
            min: sample.temp_min,
            max: sample.temp_max,
            sample_count: 0,
        });
        entry.min = entry.min.min(sample.temp_min);
        entry.max = entry.max.max(sample.temp_max);
        entry.sample_count += 1;
    }

    days
}

pub fn aggregate_daily_minimums<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<f64> {
    group_by_day(samples, tz)
        .values()
        .map(|day| round_half_up(day.min))
        .collect()
}

/// Daily highs, restricted to days with a full set of samples so a
/// truncated day at either edge of the window is never read as a record.
pub fn aggregate_daily_maximums<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<f64> {
    group_by_day(samples, tz)
        .values()
        .filter(|day| day.is_full_day())
        .map(|day| round_half_up(day.max))
        .collect()
}

/// Rounds to the nearest integer with ties going toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn lowest(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn highest(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
