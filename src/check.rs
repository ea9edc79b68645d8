use chrono::{FixedOffset, Offset, Utc};

use crate::aggregate;
use crate::cold_front;
use crate::error::AlertError;
use crate::forecast::{ForecastSource, Location};
use crate::models::{AlertRequest, RecordKind, RunOutcome, RunSummary};
use crate::notify::{self, Notifier};
use crate::record::RecordTracker;
use crate::store::{self, StateStore};

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub location: Location,
    pub cold_front_threshold: f64,
    pub lows_below: f64,
    pub highs_below: f64,
}

impl RunConfig {
    pub async fn load(store: &dyn StateStore) -> Result<Self, AlertError> {
        Ok(Self {
            location: Location {
                lat: store::require_number(store, store::LAT).await?,
                lon: store::require_number(store, store::LONG).await?,
            },
            cold_front_threshold: store::require_number(store, store::THRESHOLD).await?,
            lows_below: store::require_number(store, store::RECORD_LOW_ROUNDED_UP).await?,
            highs_below: store::require_number(store, store::RECORD_LOW_HIGH_ROUNDED_UP).await?,
        })
    }
}

pub async fn run(
    config: &RunConfig,
    store: &dyn StateStore,
    source: &dyn ForecastSource,
    notifier: &dyn Notifier,
) -> Result<RunSummary, AlertError> {
    let forecast = match source.fetch(&config.location).await {
        Ok(forecast) => forecast,
        Err(err) => {
            tracing::error!(error = %err, "error getting forecast");
            return Ok(RunSummary::aborted());
        }
    };

    let tz = observer_offset(forecast.city.timezone);
    let samples = forecast.samples();

    let daily_mins = aggregate::aggregate_daily_minimums(&samples, &tz);
    let lowest_min = aggregate::lowest(&daily_mins);
    tracing::info!(?daily_mins, ?lowest_min, "daily mins");

    let daily_maxes = aggregate::aggregate_daily_maximums(&samples, &tz);
    let lowest_max = aggregate::lowest(&daily_maxes);
    tracing::info!(
        ?daily_maxes,
        highest = ?aggregate::highest(&daily_maxes),
        lowest = ?lowest_max,
        "daily maxes"
    );

    let cold_front = cold_front::has_cold_front(&daily_mins, config.cold_front_threshold);
    tracing::info!(
        city = %forecast.city.name,
        days = daily_mins.len(),
        threshold = config.cold_front_threshold,
        largest_drop = ?cold_front::largest_drop(&daily_mins),
        cold_front,
        "{} day forecast for {} {}",
        daily_mins.len(),
        forecast.city.name,
        if cold_front {
            "has a cold front"
        } else {
            "doesn't have a cold front"
        }
    );

    let mut records = Vec::new();
    let trackers = [
        (RecordTracker::new(RecordKind::Low, config.lows_below), lowest_min),
        (RecordTracker::new(RecordKind::High, config.highs_below), lowest_max),
    ];

    for (mut tracker, observed) in trackers {
        let Some(observed) = observed else {
            tracing::info!(kind = %tracker.kind(), "no complete days to compare against the record");
            continue;
        };

        let Some(alert) = tracker.observe(observed)? else {
            continue;
        };

        store
            .set(tracker.store_key(), &store::format_threshold(tracker.threshold()))
            .await?;
        tracing::info!(
            key = tracker.store_key(),
            value = tracker.threshold(),
            "record threshold lowered"
        );
        records.push(alert);
    }

    // Every threshold is persisted before anything is sent; a failed push
    // never rolls a record back.
    let mut requests = Vec::with_capacity(records.len() + 1);
    if cold_front {
        requests.push(AlertRequest::ColdFront);
    }
    requests.extend(records.iter().copied().map(AlertRequest::Record));

    let mut alerts_sent = 0;
    for request in &requests {
        if notify::dispatch(notifier, request).await {
            alerts_sent += 1;
        }
    }

    Ok(RunSummary {
        outcome: RunOutcome::Completed,
        city: Some(forecast.city.name),
        daily_mins,
        daily_maxes,
        cold_front,
        lowest_min,
        lowest_max,
        records,
        alerts_sent,
    })
}

/// The forecast location's offset from UTC, used as the observer's calendar.
pub fn observer_offset(seconds_east: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds_east).unwrap_or_else(|| {
        tracing::warn!(
            seconds_east,
            "forecast timezone offset out of range, grouping days in UTC"
        );
        Utc.fix()
    })
}
