//! Prelude module for common re-exports.
//!
//! ```rust
//! use hoist_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, HoistConfig, LogLevel, SharedConfig, StepConfig};

// ─── Plant ──────────────────────────────────────────────────────────
pub use crate::plant::PlantParams;

// ─── State ──────────────────────────────────────────────────────────
pub use crate::state::{Command, Direction, FaultFlags, PlantState, TripState};

// ─── Interlocks ─────────────────────────────────────────────────────
pub use crate::interlock::{LimitOverride, OverloadWindow};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::DEFAULT_STEP_MS;
