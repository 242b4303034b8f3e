//! Command & dynamics integrator.
//!
//! Duty slew, the two short-circuit holds (limit, worm gear), the DC motor
//! electrical model and the explicit Euler integration of carriage motion.
//!
//! Motor model (armature inductance neglected):
//!
//! ```text
//! ω   = v / r_drum
//! I   = max(0, sgn(duty) · (V_supply · duty − Ke · ω) / Ra)
//! τ_m = Kt · I
//! ```
//!
//! Net torque above the (possibly jam-scaled) gravity load accelerates the
//! carriage tangentially; a proportional velocity loop adds a bounded
//! acceleration toward the cruise speed.

use hoist_common::consts::{
    DOWN_DUTY_TARGET, DUTY_SLEW_PER_MS, SPEED_LOOP_ACCEL_LIMIT, SPEED_LOOP_GAIN,
    STANDSTILL_SPEED_MS, UP_DUTY_TARGET,
};
use hoist_common::plant::PlantParams;
use hoist_common::state::{Direction, TripState};

use crate::interlock::Interlocks;

// ─── Duty ───────────────────────────────────────────────────────────

/// Duty the driver slews toward for a permitted drive direction.
///
/// Lifting and lowering are deliberately asymmetric.
#[inline]
pub const fn duty_target(drive: Direction) -> f64 {
    match drive {
        Direction::Up => UP_DUTY_TARGET,
        Direction::Down => DOWN_DUTY_TARGET,
        Direction::Idle => 0.0,
    }
}

/// Move `duty` toward `target` by at most `DUTY_SLEW_PER_MS · dt_ms`.
///
/// Never overshoots the target.
#[inline]
pub fn ramp_duty(duty: f64, target: f64, dt_ms: f64) -> f64 {
    let max_step = DUTY_SLEW_PER_MS * dt_ms;
    let step = (target - duty).clamp(-max_step, max_step);
    (duty + step).clamp(-1.0, 1.0)
}

// ─── Holds ──────────────────────────────────────────────────────────

/// Conditions that end a step before any dynamics are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// Drive pushes into an engaged limit switch.
    AtLimit,
    /// Non-backdrivable drivetrain at rest.
    Worm,
}

/// Decide whether this step short-circuits into a hold.
///
/// `trip` is the classification after interlock resolution.
pub fn hold_condition(
    params: &PlantParams,
    interlocks: &Interlocks,
    trip: TripState,
) -> Option<Hold> {
    if interlocks.pushing_into_limit() {
        return Some(Hold::AtLimit);
    }
    if params.non_backdrivable
        && interlocks.drive.is_idle()
        && !interlocks.door_open
        && trip != TripState::Limit
    {
        return Some(Hold::Worm);
    }
    None
}

// ─── Electrical ─────────────────────────────────────────────────────

/// Armature current [A] at `duty` and carriage speed `velocity_ms`.
///
/// Current flows in the direction of the applied voltage; regeneration is
/// not modeled, so the result is clamped at zero.
#[inline]
pub fn motor_current(params: &PlantParams, duty: f64, velocity_ms: f64) -> f64 {
    if duty == 0.0 {
        return 0.0;
    }
    let omega = velocity_ms / params.drum_radius_m;
    let net_v = params.supply_v * duty - params.back_emf_constant * omega;
    (duty.signum() * net_v / params.armature_resistance).max(0.0)
}

// ─── Motion ─────────────────────────────────────────────────────────

/// Inputs to one integration step.
#[derive(Debug, Clone, Copy)]
pub struct MotionInput {
    /// Effective drive direction after interlocks and trips.
    pub drive: Direction,
    /// Duty after trip limiting.
    pub duty: f64,
    /// Load torque multiplier (1.0 unless a jam window is active).
    pub load_factor: f64,
    pub dt_ms: f64,
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    pub position_m: f64,
    pub velocity_ms: f64,
    pub acceleration_ms2: f64,
    /// Current at the new operating point.
    pub current_a: f64,
}

/// Integrate carriage motion over one step (explicit Euler).
///
/// Position is clamped to `[0, travel_m]`; hitting either end is an
/// inelastic stop. An undriven carriage below `STANDSTILL_SPEED_MS` is
/// snapped to rest.
pub fn integrate(
    params: &PlantParams,
    position_m: f64,
    velocity_ms: f64,
    input: &MotionInput,
) -> MotionStep {
    let sign = input.drive.sign();

    let a_tangential = if input.drive.is_idle() {
        0.0
    } else {
        let tau_load = params.load_torque_nm() * input.load_factor;
        let tau_motor = params.torque_constant * motor_current(params, input.duty, velocity_ms);
        let tau_net = (tau_motor - tau_load).max(0.0);
        sign * tau_net / (params.mass_kg * params.drum_radius_m)
    };

    let v_target = params.target_speed_ms * sign;
    let a_ctrl = ((v_target - velocity_ms) * SPEED_LOOP_GAIN)
        .clamp(-SPEED_LOOP_ACCEL_LIMIT, SPEED_LOOP_ACCEL_LIMIT);
    let acceleration = a_ctrl + a_tangential;

    let dt_s = input.dt_ms / 1000.0;
    let mut velocity = velocity_ms + acceleration * dt_s;
    let mut position = position_m + velocity * dt_s;

    if position <= 0.0 {
        position = 0.0;
        velocity = 0.0;
    } else if position >= params.travel_m {
        position = params.travel_m;
        velocity = 0.0;
    }

    if input.drive.is_idle() && velocity.abs() < STANDSTILL_SPEED_MS {
        velocity = 0.0;
    }

    MotionStep {
        position_m: position,
        velocity_ms: velocity,
        acceleration_ms2: acceleration,
        current_a: motor_current(params, input.duty, velocity),
    }
}
