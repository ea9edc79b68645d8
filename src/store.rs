use async_trait::async_trait;

use crate::error::AlertError;

pub const RECORD_LOW_ROUNDED_UP: &str = "RECORD_LOW_ROUNDED_UP";
pub const RECORD_LOW_HIGH_ROUNDED_UP: &str = "RECORD_LOW_HIGH_ROUNDED_UP";
pub const THRESHOLD: &str = "THRESHOLD";
pub const OPENWEATHERKEY: &str = "OPENWEATHERKEY";
pub const LAT: &str = "LAT";
pub const LONG: &str = "LONG";
pub const PUSHBULLETKEY: &str = "PUSHBULLETKEY";

pub const NUMERIC_KEYS: [&str; 5] = [
    RECORD_LOW_ROUNDED_UP,
    RECORD_LOW_HIGH_ROUNDED_UP,
    THRESHOLD,
    LAT,
    LONG,
];

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AlertError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), AlertError>;
}

pub fn parse_number(key: &str, raw: &str) -> Result<f64, AlertError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AlertError::InvalidNumericInput(format!(
            "{key} has value \"{raw}\", which is not a number"
        ))),
    }
}

pub async fn require(store: &dyn StateStore, key: &'static str) -> Result<String, AlertError> {
    match store.get(key).await? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AlertError::ConfigurationMissing(key)),
    }
}

pub async fn require_number(store: &dyn StateStore, key: &'static str) -> Result<f64, AlertError> {
    let raw = require(store, key).await?;
    parse_number(key, &raw)
}

pub fn normalize_value(key: &str, raw: &str) -> Result<String, AlertError> {
    if NUMERIC_KEYS.contains(&key) {
        Ok(parse_number(key, raw)?.to_string())
    } else {
        Ok(raw.to_string())
    }
}

/// Whole-degree thresholds are stored without a fractional part.
pub fn format_threshold(value: f64) -> String {
    format!("{:.0}", value)
}

#[cfg(test)]
pub use memory::MemoryStore;
