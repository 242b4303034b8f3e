//! Hoist simulation engine.
//!
//! [`HoistEngine`] owns one `PlantState` plus the host's intent (command,
//! door, overload window, limit overrides). Setters only record intent;
//! everything observable changes inside [`HoistEngine::tick`], which delegates
//! to the pure [`step`] function:
//!
//! ```text
//! resolve interlocks → slew duty → holds → classify trip → integrate → publish
//! ```
//!
//! Identical parameters and identical command/tick sequences give
//! bit-identical snapshots. Nothing reads the wall clock.

use hoist_common::config::ConfigError;
use hoist_common::consts::STANDSTILL_SPEED_MS;
use hoist_common::interlock::{LimitOverride, OverloadWindow};
use hoist_common::plant::PlantParams;
use hoist_common::state::{Command, Direction, PlantState, TripState};
use tracing::{debug, info, trace, warn};

use crate::dynamics::{self, Hold, MotionInput};
use crate::error::InvalidStepError;
use crate::interlock::{self, InterlockInput};
use crate::safety::{self, TripEvent, TripInput};

/// Host intent read at the start of every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepInputs {
    pub command: Command,
    pub door_open: bool,
    pub overload: OverloadWindow,
    pub limit_override: LimitOverride,
}

/// Advance `state` by `dt_ms` and return the new state.
///
/// `dt_ms` must already be validated (finite, > 0).
pub fn step(
    params: &PlantParams,
    state: &PlantState,
    inputs: &StepInputs,
    dt_ms: f64,
) -> PlantState {
    let mut s = *state;
    s.elapsed_ms += dt_ms;

    // ── Interlocks ──
    let interlocks = interlock::resolve(
        &s,
        params,
        &InterlockInput {
            command: inputs.command,
            door_open: inputs.door_open,
            limit_override: inputs.limit_override,
        },
    );
    s.limit_top = interlocks.limits.top;
    s.limit_bottom = interlocks.limits.bottom;
    s.trip = interlock::classify_trip(s.trip, &interlocks, s.is_hard_latched());
    if interlocks.door_open {
        // Door cuts drive power outright; the carriage coasts down.
        s.duty = 0.0;
    }

    // ── Duty slew ──
    s.duty = dynamics::ramp_duty(s.duty, dynamics::duty_target(interlocks.drive), dt_ms);

    // ── Holds ──
    match dynamics::hold_condition(params, &interlocks, s.trip) {
        Some(Hold::AtLimit) => {
            s.trip = TripState::Limit;
            s.hold();
            return s;
        }
        Some(Hold::Worm) => {
            s.hold();
            s.trip = safety::next_trip(s.trip, TripEvent::AtRest);
            return s;
        }
        None => {}
    }

    // ── Trips ──
    let jam_active = inputs.overload.is_active(s.elapsed_ms);
    let event = safety::classify(
        params,
        &TripInput {
            current_a: dynamics::motor_current(params, s.duty, s.velocity_ms),
            jam_active,
            in_motion: s.velocity_ms.abs() > STANDSTILL_SPEED_MS || !interlocks.drive.is_idle(),
        },
    );
    let outcome = safety::evaluate(s.trip, event);
    s.trip = outcome.trip;
    s.latched |= outcome.latched;
    s.duty = safety::limit_duty(s.trip, s.duty);
    let drive = if s.trip == TripState::Hard {
        Direction::Idle
    } else {
        interlocks.drive
    };

    // ── Dynamics ──
    let motion = dynamics::integrate(
        params,
        s.position_m,
        s.velocity_ms,
        &MotionInput {
            drive,
            duty: s.duty,
            load_factor: inputs.overload.load_factor(s.elapsed_ms),
            dt_ms,
        },
    );
    s.position_m = motion.position_m;
    s.velocity_ms = motion.velocity_ms;
    s.acceleration_ms2 = motion.acceleration_ms2;
    s.current_a = motion.current_a;
    s.direction = Direction::from_duty(s.duty);

    if s.duty != 0.0 {
        s.motor_run_ms += dt_ms;
    }
    if drive.is_idle() && s.velocity_ms == 0.0 {
        s.trip = safety::next_trip(s.trip, TripEvent::AtRest);
    }

    s
}

/// One simulated hoist.
#[derive(Debug, Clone)]
pub struct HoistEngine {
    params: PlantParams,
    state: PlantState,
    command: Command,
    door_open: bool,
    overload: OverloadWindow,
    limit_override: LimitOverride,
}

impl HoistEngine {
    /// Construct an engine at rest at the bottom of travel.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationError` if `params` violate any plant invariant.
    pub fn new(params: PlantParams) -> Result<Self, ConfigError> {
        Self::with_initial_position(params, 0.0)
    }

    /// Construct an engine at rest at `position_m`.
    pub fn with_initial_position(
        params: PlantParams,
        position_m: f64,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        if !position_m.is_finite() || position_m < 0.0 || position_m > params.travel_m {
            return Err(ConfigError::ValidationError(format!(
                "initial position {position_m} outside [0, {}]",
                params.travel_m
            )));
        }

        debug!(
            "Hoist engine created: travel={} m, mass={} kg, start={} m",
            params.travel_m, params.mass_kg, position_m
        );

        Ok(Self {
            params,
            state: PlantState::at_rest(position_m),
            command: Command::Stop,
            door_open: false,
            overload: OverloadWindow::inactive(),
            limit_override: LimitOverride::released(),
        })
    }

    /// Advance simulated time by `dt_ms`.
    ///
    /// # Errors
    ///
    /// `InvalidStepError` if `dt_ms` is not finite or not positive. The
    /// state is left untouched.
    pub fn tick(&mut self, dt_ms: f64) -> Result<(), InvalidStepError> {
        let dt_ms = InvalidStepError::check(dt_ms)?;
        let prev = self.state;
        let next = step(&self.params, &prev, &self.inputs(), dt_ms);

        if next.trip == TripState::Hard && self.command != Command::Stop {
            self.command = Command::Stop;
        }
        log_transitions(&prev, &next);
        trace!(
            "t={:.0}ms pos={:.4} vel={:.4} I={:.2} duty={:.3} trip={:?}",
            next.elapsed_ms,
            next.position_m,
            next.velocity_ms,
            next.current_a,
            next.duty,
            next.trip
        );

        self.state = next;
        Ok(())
    }

    /// Set operator intent. Takes effect on the next tick.
    pub fn command(&mut self, command: Command) {
        self.command = command;
    }

    /// Current operator intent (reset to `Stop` by a hard trip).
    #[inline]
    pub fn current_command(&self) -> Command {
        self.command
    }

    /// Set the door interlock input.
    ///
    /// Closing the door clears a `Door` trip, restoring `Hard` if one latched.
    pub fn set_door_open(&mut self, open: bool) {
        if open != self.door_open {
            debug!("Door {}", if open { "opened" } else { "closed" });
        }
        self.door_open = open;
        if !open && self.state.trip == TripState::Door {
            self.state.trip = if self.state.is_hard_latched() {
                TripState::Hard
            } else {
                TripState::None
            };
        }
    }

    #[inline]
    pub fn door_open(&self) -> bool {
        self.door_open
    }

    /// Switch an open-ended load overload on or off. `factor` is floored at 1.
    pub fn set_overload_active(&mut self, active: bool, factor: f64) {
        self.overload.set_active(active, factor);
        debug!("Overload {} (factor {})", if active { "on" } else { "off" }, self.overload.factor);
    }

    /// Inject an overload lasting `duration_ms` of simulated time from now.
    pub fn pulse_overload(&mut self, duration_ms: f64, factor: f64) {
        self.overload.pulse(self.state.elapsed_ms, duration_ms, factor);
        debug!(
            "Overload pulse until {} ms (factor {})",
            self.overload.active_until_ms, self.overload.factor
        );
    }

    #[inline]
    pub fn overload(&self) -> OverloadWindow {
        self.overload
    }

    /// Force limit switch readings. `None` returns a side to sensed behavior.
    pub fn set_limit_override(&mut self, limit_override: LimitOverride) {
        self.limit_override = limit_override;
        if limit_override.is_released() {
            debug!("Limit override released, both switches sensed");
        } else {
            debug!("Limit override: {:?}", limit_override);
        }
    }

    #[inline]
    pub fn limit_override(&self) -> LimitOverride {
        self.limit_override
    }

    /// Snapshot of the plant state.
    #[inline]
    pub fn state(&self) -> PlantState {
        self.state
    }

    #[inline]
    pub fn params(&self) -> &PlantParams {
        &self.params
    }

    fn inputs(&self) -> StepInputs {
        StepInputs {
            command: self.command,
            door_open: self.door_open,
            overload: self.overload,
            limit_override: self.limit_override,
        }
    }
}

fn log_transitions(prev: &PlantState, next: &PlantState) {
    if prev.trip != next.trip {
        match next.trip {
            TripState::Hard => warn!(
                "HARD trip at {:.0} ms: I={:.2} A, cause {:?}",
                next.elapsed_ms, next.current_a, next.latched
            ),
            TripState::Soft => warn!(
                "Soft trip at {:.0} ms: duty capped",
                next.elapsed_ms
            ),
            other => info!(
                "Trip {:?} -> {:?} at {:.0} ms",
                prev.trip, other, next.elapsed_ms
            ),
        }
    }
    if prev.limit_top != next.limit_top || prev.limit_bottom != next.limit_bottom {
        debug!(
            "Limit switches: top={} bottom={} at pos {:.4} m",
            next.limit_top, next.limit_bottom, next.position_m
        );
    }
}
