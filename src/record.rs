use crate::error::AlertError;
use crate::models::{RecordAlert, RecordKind};
use crate::store;

/// `ceil(x / 10) * 10`, so `21 -> 30`, `20 -> 20` and `-23 -> -20`.
pub fn round_up_to_nearest_ten(value: f64) -> Result<f64, AlertError> {
    if !value.is_finite() {
        return Err(AlertError::InvalidNumericInput(format!(
            "value \"{value}\" is not a number"
        )));
    }
    // `+ 0.0` turns a negative zero into zero.
    Ok((value / 10.0).ceil() * 10.0 + 0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordTracker {
    kind: RecordKind,
    threshold: f64,
}

impl RecordTracker {
    pub fn new(kind: RecordKind, threshold: f64) -> Self {
        Self { kind, threshold }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn store_key(&self) -> &'static str {
        store_key(self.kind)
    }

    /// Compare an observed extreme against the current threshold and lower
    /// the threshold when the rounded-up candidate is strictly below it.
    pub fn observe(&mut self, observed: f64) -> Result<Option<RecordAlert>, AlertError> {
        let candidate = round_up_to_nearest_ten(observed)?;
        tracing::info!(
            kind = %self.kind,
            observed,
            candidate,
            threshold = self.threshold,
            "lowest {} is below {}",
            self.kind,
            candidate
        );

        if candidate < self.threshold {
            self.threshold = candidate;
            Ok(Some(RecordAlert {
                kind: self.kind,
                value: candidate,
            }))
        } else {
            Ok(None)
        }
    }
}

pub fn store_key(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Low => store::RECORD_LOW_ROUNDED_UP,
        RecordKind::High => store::RECORD_LOW_HIGH_ROUNDED_UP,
    }
}
