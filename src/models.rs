use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

/// Samples per full calendar day at the forecast's 3-hour interval.
pub const SAMPLES_PER_DAY: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    pub list: Vec<ForecastEntry>,
    pub city: City,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReadings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct City {
    pub name: String,
    /// Shift in seconds from UTC.
    #[serde(default)]
    pub timezone: i32,
}

impl Forecast {
    pub fn samples(&self) -> Vec<ForecastSample> {
        self.list
            .iter()
            .map(|entry| ForecastSample {
                timestamp: entry.dt,
                temp_min: entry.main.temp_min,
                temp_max: entry.main.temp_max,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSample {
    pub timestamp: i64,
    pub temp_min: f64,
    pub temp_max: f64,
}

impl ForecastSample {
    pub fn utc(&self) -> Option<DateTime<chrono::Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub min: f64,
    pub max: f64,
    pub sample_count: usize,
}

impl DailyAggregate {
    pub fn is_full_day(&self) -> bool {
        self.sample_count == SAMPLES_PER_DAY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Low,
    High,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Low => "low",
            RecordKind::High => "high",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A threshold crossed for the first time this season.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordAlert {
    pub kind: RecordKind,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertRequest {
    ColdFront,
    Record(RecordAlert),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Aborted,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Aborted => "aborted",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub city: Option<String>,
    pub daily_mins: Vec<f64>,
    pub daily_maxes: Vec<f64>,
    pub cold_front: bool,
    pub lowest_min: Option<f64>,
    pub lowest_max: Option<f64>,
    pub records: Vec<RecordAlert>,
    pub alerts_sent: usize,
}

impl RunSummary {
    pub fn aborted() -> Self {
        Self {
            outcome: RunOutcome::Aborted,
            city: None,
            daily_mins: Vec::new(),
            daily_maxes: Vec::new(),
            cold_front: false,
            lowest_min: None,
            lowest_max: None,
            records: Vec::new(),
            alerts_sent: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunRecord {
    pub ran_at: DateTime<chrono::Utc>,
    pub city: Option<String>,
    pub outcome: String,
    pub cold_front: bool,
    pub lowest_min: Option<f64>,
    pub lowest_max: Option<f64>,
    pub alerts_sent: i32,
}
