//! # Hoist Simulation Library
//!
//! Deterministic fixed-step simulation of a motor-driven vertical hoist:
//! carriage dynamics, DC motor electrical model, limit switches with
//! hysteresis, door interlock, and overcurrent/jam trip protection.
//!
//! ## Step Pipeline
//!
//! Every `tick(dt_ms)` runs three stages in strict order:
//!
//! 1. **Interlocks** ([`interlock`]): limit switches and door, before any dynamics
//! 2. **Dynamics** ([`dynamics`]): duty slew, holds, motor model, Euler integration
//! 3. **Safety** ([`safety`]): `None → Soft → Hard` trip state machine
//!
//! The published `PlantState` is the only state the engine keeps between
//! steps. Nothing reads the wall clock; hosts pace the engine through
//! [`stepper::FixedStepper`] or replay scripts through [`scenario`].

pub mod dynamics;
pub mod engine;
pub mod error;
pub mod interlock;
pub mod safety;
pub mod scenario;
pub mod stepper;

pub use engine::{HoistEngine, StepInputs, step};
pub use error::InvalidStepError;
