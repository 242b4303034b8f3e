//! Fixed-step frame accumulator.
//!
//! Hosts that pace on a wall clock hand over variable frame deltas; the
//! engine must only ever see whole, identical steps. The remainder is kept in
//! integer nanoseconds so nothing is dropped or counted twice across frames.

use std::time::Duration;

use tracing::trace;

use crate::engine::HoistEngine;
use crate::error::InvalidStepError;

/// Splits wall-clock frames into fixed simulation steps.
#[derive(Debug, Clone)]
pub struct FixedStepper {
    step_ns: u128,
    pending_ns: u128,
    step_ms: f64,
}

impl FixedStepper {
    /// # Errors
    ///
    /// `InvalidStepError` for a zero step.
    pub fn new(step: Duration) -> Result<Self, InvalidStepError> {
        let step_ns = step.as_nanos();
        if step_ns == 0 {
            return Err(InvalidStepError { dt_ms: 0.0 });
        }
        Ok(Self {
            step_ns,
            pending_ns: 0,
            step_ms: step.as_secs_f64() * 1000.0,
        })
    }

    /// Stepper from a configured step size in milliseconds.
    pub fn from_millis_f64(step_ms: f64) -> Result<Self, InvalidStepError> {
        let step_ms = InvalidStepError::check(step_ms)?;
        let step = Duration::try_from_secs_f64(step_ms / 1000.0)
            .map_err(|_| InvalidStepError { dt_ms: step_ms })?;
        let mut stepper = Self::new(step)?;
        stepper.step_ms = step_ms;
        Ok(stepper)
    }

    /// Add `frame` to the carry and return how many whole steps are due.
    pub fn advance(&mut self, frame: Duration) -> u64 {
        self.pending_ns += frame.as_nanos();
        let due = self.pending_ns / self.step_ns;
        self.pending_ns %= self.step_ns;
        // A u64 of steps covers far more than any realistic frame.
        u64::try_from(due).unwrap_or(u64::MAX)
    }

    /// Advance by `frame` and tick `engine` once per whole step due.
    pub fn run_frame(
        &mut self,
        engine: &mut HoistEngine,
        frame: Duration,
    ) -> Result<u64, InvalidStepError> {
        let due = self.advance(frame);
        for _ in 0..due {
            engine.tick(self.step_ms)?;
        }
        trace!("frame {:?}: {} steps, {:?} carried", frame, due, self.pending());
        Ok(due)
    }

    /// Time carried into the next frame.
    pub fn pending(&self) -> Duration {
        // pending < step_ns, and step_ns came from a Duration.
        Duration::from_nanos(u64::try_from(self.pending_ns).unwrap_or(u64::MAX))
    }

    /// Step size handed to `HoistEngine::tick` [ms].
    #[inline]
    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}
