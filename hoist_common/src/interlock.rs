//! Interlock intent types set by the host between steps.
//!
//! None of these act immediately. The engine reads them at the start of
//! the next step.

use serde::{Deserialize, Serialize};

/// Forced limit switch readings for test harnesses.
///
/// `None` on a side returns that switch to sensed (hysteresis) behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LimitOverride {
    #[serde(default)]
    pub top: Option<bool>,
    #[serde(default)]
    pub bottom: Option<bool>,
}

impl LimitOverride {
    /// Both sides sensed.
    pub const fn released() -> Self {
        Self {
            top: None,
            bottom: None,
        }
    }

    #[inline]
    pub const fn is_released(&self) -> bool {
        self.top.is_none() && self.bottom.is_none()
    }
}

/// Injected load overload (jam) window.
///
/// Active while simulated time is strictly below `active_until_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverloadWindow {
    /// End of the window [ms of simulated time]. Infinite for a latched overload.
    pub active_until_ms: f64,
    /// Load torque multiplier, always >= 1.
    pub factor: f64,
}

impl OverloadWindow {
    /// Multiplier used when the caller does not pick one.
    pub const DEFAULT_FACTOR: f64 = 2.5;

    /// No overload.
    pub const fn inactive() -> Self {
        Self {
            active_until_ms: 0.0,
            factor: Self::DEFAULT_FACTOR,
        }
    }

    /// Switch an open-ended overload on or off.
    pub fn set_active(&mut self, active: bool, factor: f64) {
        self.active_until_ms = if active { f64::INFINITY } else { 0.0 };
        self.factor = clamp_factor(factor);
    }

    /// Extend the window to at least `now_ms + duration_ms`.
    ///
    /// A pulse never shortens a window already running.
    pub fn pulse(&mut self, now_ms: f64, duration_ms: f64, factor: f64) {
        let until = now_ms + duration_ms.max(0.0);
        self.active_until_ms = self.active_until_ms.max(until);
        self.factor = clamp_factor(factor);
    }

    #[inline]
    pub fn is_active(&self, elapsed_ms: f64) -> bool {
        elapsed_ms < self.active_until_ms
    }

    /// Factor applied to load torque at `elapsed_ms` (1.0 outside the window).
    #[inline]
    pub fn load_factor(&self, elapsed_ms: f64) -> f64 {
        if self.is_active(elapsed_ms) {
            self.factor
        } else {
            1.0
        }
    }
}

impl Default for OverloadWindow {
    fn default() -> Self {
        Self::inactive()
    }
}

/// Factor is floored at 1; NaN collapses to 1.
fn clamp_factor(factor: f64) -> f64 {
    factor.max(1.0)
}
