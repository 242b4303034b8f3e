//! Error types for the simulation engine.
//!
//! Only caller mistakes are errors. Overcurrent, jams, the door and the
//! limit switches are simulated outcomes reported through `TripState`.

use thiserror::Error;

pub use hoist_common::config::ConfigError;

/// Step size rejected before any state was touched.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid step size {dt_ms} ms: must be finite and > 0")]
pub struct InvalidStepError {
    /// The rejected step [ms].
    pub dt_ms: f64,
}

impl InvalidStepError {
    /// Check a step size, returning it unchanged when usable.
    #[inline]
    pub fn check(dt_ms: f64) -> Result<f64, Self> {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            Ok(dt_ms)
        } else {
            Err(Self { dt_ms })
        }
    }
}
