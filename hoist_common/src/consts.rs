//! Physical and drive constants for the hoist simulator.
//!
//! Single source of truth for every fixed number the engine uses.
//! Imported by both crates; no duplication permitted.

/// Standard gravity [m/s²].
pub const GRAVITY_MS2: f64 = 9.81;

/// Reference simulation step [ms]. One call to `tick` per simulated millisecond.
pub const DEFAULT_STEP_MS: f64 = 1.0;

/// Default telemetry decimation: publish one snapshot every N steps.
pub const DEFAULT_SAMPLE_EVERY_STEPS: u64 = 100;

/// Default configuration file path for the host binary.
pub const DEFAULT_CONFIG_PATH: &str = "config/hoist.toml";

// ─── Drive ──────────────────────────────────────────────────────────

/// Duty target while lifting.
pub const UP_DUTY_TARGET: f64 = 0.9;

/// Duty target while lowering. Gravity assists, so far less drive is needed.
pub const DOWN_DUTY_TARGET: f64 = -0.2;

/// Maximum duty change per simulated millisecond (driver slew limit).
pub const DUTY_SLEW_PER_MS: f64 = 0.02;

/// Duty magnitude cap while a soft trip is active.
pub const SOFT_TRIP_DUTY_CAP: f64 = 0.5;

// ─── Speed loop ─────────────────────────────────────────────────────

/// Proportional gain of the velocity loop [1/s].
pub const SPEED_LOOP_GAIN: f64 = 5.0;

/// Acceleration authority of the velocity loop [m/s²].
pub const SPEED_LOOP_ACCEL_LIMIT: f64 = 1.0;

/// Below this speed [m/s] the carriage counts as stationary.
pub const STANDSTILL_SPEED_MS: f64 = 1e-4;
