//! Operator speed limit.

use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use crate::translator::BASE_LIMIT;

pub const DEFAULT_MIN: f64 = 1.0;
pub const DEFAULT_MAX: f64 = 3.0;
pub const DEFAULT_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SpeedBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            step: DEFAULT_STEP,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SpeedControlError {
    #[error("speed bounds are inverted: min {min} > max {max}")]
    InvertedBounds { min: f64, max: f64 },
    #[error("speed step must be positive and finite, got {0}")]
    InvalidStep(f64),
    #[error("speed limit must be finite, got {0}")]
    NonFinite(f64),
    #[error("initial speed limit {initial} is outside [{min}, {max}]")]
    InitialOutOfRange { initial: f64, min: f64, max: f64 },
}

/// Bounded operator control that owns the current speed limit.
///
/// Readers hold a [`SpeedLimitHandle`] and always observe the latest value.
#[derive(Debug)]
pub struct SpeedControl {
    bounds: SpeedBounds,
    tx: watch::Sender<f64>,
}

impl SpeedControl {
    /// The initial value must lie within the bounds, or be the reference
    /// limit [`BASE_LIMIT`]. It is stored as given; only operator
    /// adjustments are snapped.
    pub fn new(bounds: SpeedBounds, initial: f64) -> Result<Self, SpeedControlError> {
        if !(bounds.min.is_finite() && bounds.max.is_finite()) || bounds.min > bounds.max {
            return Err(SpeedControlError::InvertedBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }
        if !bounds.step.is_finite() || bounds.step <= 0.0 {
            return Err(SpeedControlError::InvalidStep(bounds.step));
        }
        if !initial.is_finite() {
            return Err(SpeedControlError::NonFinite(initial));
        }
        if (initial < bounds.min || initial > bounds.max) && initial != BASE_LIMIT {
            return Err(SpeedControlError::InitialOutOfRange {
                initial,
                min: bounds.min,
                max: bounds.max,
            });
        }
        let (tx, _) = watch::channel(initial);
        Ok(Self { bounds, tx })
    }

    pub fn bounds(&self) -> SpeedBounds {
        self.bounds
    }

    pub fn current(&self) -> f64 {
        *self.tx.borrow()
    }

    pub fn handle(&self) -> SpeedLimitHandle {
        SpeedLimitHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Applies an operator adjustment and returns the value actually stored.
    pub fn set(&self, requested: f64) -> Result<f64, SpeedControlError> {
        if !requested.is_finite() {
            return Err(SpeedControlError::NonFinite(requested));
        }
        let applied = self.normalize(requested);
        self.tx.send_replace(applied);
        debug!(requested, applied, "speed limit updated");
        Ok(applied)
    }

    fn normalize(&self, requested: f64) -> f64 {
        let SpeedBounds { min, max, step } = self.bounds;
        let clamped = requested.clamp(min, max);
        // Highest grid index that still lies at or below `max`.
        let last_step = ((max - min) / step + 1e-9).floor();
        let steps = ((clamped - min) / step).round().min(last_step);
        // Round away float noise from the step multiplication.
        let snapped = ((min + steps * step) * 1e9).round() / 1e9;
        snapped.min(max)
    }
}

impl Default for SpeedControl {
    fn default() -> Self {
        let (tx, _) = watch::channel(BASE_LIMIT);
        Self {
            bounds: SpeedBounds::default(),
            tx,
        }
    }
}

/// Live read access to the speed limit.
#[derive(Debug, Clone)]
pub struct SpeedLimitHandle {
    rx: watch::Receiver<f64>,
}

impl SpeedLimitHandle {
    pub fn get(&self) -> f64 {
        *self.rx.borrow()
    }
}

#[cfg(test)]
#[path = "tests/speed_tests.rs"]
mod tests;
