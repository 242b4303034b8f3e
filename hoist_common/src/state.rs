//! Published plant state and the enums it is built from.
//!
//! `PlantState` is the only channel through which renderers and telemetry
//! observe the simulation. It is `Copy`, so a snapshot can never alias the
//! engine's internal record.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use static_assertions::{assert_impl_all, const_assert_eq};

// ─── Trip State ─────────────────────────────────────────────────────

/// Protective state of the drive.
///
/// `Door` and `Limit` are imposed by the interlock checks and pre-empt
/// overcurrent evaluation. `Hard` latches for the lifetime of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TripState {
    /// No protective action.
    #[default]
    None = 0,
    /// Overcurrent warning: duty capped, motion continues at reduced speed.
    Soft = 1,
    /// Overcurrent or jam: drive off, command cancelled. Sticky.
    Hard = 2,
    /// Door interlock open.
    Door = 3,
    /// Held against an engaged limit switch.
    Limit = 4,
}

const_assert_eq!(core::mem::size_of::<TripState>(), 1);

impl TripState {
    /// Whether the trip is imposed by an interlock rather than by current.
    #[inline]
    pub const fn is_interlock(self) -> bool {
        matches!(self, Self::Door | Self::Limit)
    }
}

// ─── Operator Command ───────────────────────────────────────────────

/// Operator intent. Held until changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    #[default]
    Stop,
    Up,
    Down,
}

impl Command {
    /// Direction of travel this command asks for.
    #[inline]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Stop => Direction::Idle,
            Self::Up => Direction::Up,
            Self::Down => Direction::Down,
        }
    }
}

// ─── Direction ──────────────────────────────────────────────────────

/// Signed direction of drive: −1 down, 0 idle, +1 up.
///
/// Serialized as the plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
#[repr(i8)]
pub enum Direction {
    Down = -1,
    #[default]
    Idle = 0,
    Up = 1,
}

impl Direction {
    /// Direction matching the sign of a duty value (zero maps to `Idle`).
    #[inline]
    pub fn from_duty(duty: f64) -> Self {
        if duty > 0.0 {
            Self::Up
        } else if duty < 0.0 {
            Self::Down
        } else {
            Self::Idle
        }
    }

    /// Direction as a signed unit factor.
    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Down => -1.0,
            Self::Idle => 0.0,
            Self::Up => 1.0,
        }
    }

    #[inline]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl From<Direction> for i8 {
    fn from(d: Direction) -> Self {
        d as i8
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Down),
            0 => Ok(Self::Idle),
            1 => Ok(Self::Up),
            other => Err(format!("direction must be -1, 0 or 1, got {other}")),
        }
    }
}

// ─── Latched Faults ─────────────────────────────────────────────────

bitflags! {
    /// Causes recorded when a hard trip latches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct FaultFlags: u8 {
        /// Motor current reached the hard trip threshold.
        const OVERCURRENT = 0x01;
        /// Injected jam while moving or commanded to move.
        const JAM         = 0x02;
    }
}

impl Default for FaultFlags {
    fn default() -> Self {
        Self::empty()
    }
}

// ─── Snapshot ───────────────────────────────────────────────────────

/// Complete mutable state of one hoist, published after every step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantState {
    /// Simulated time since construction [ms].
    pub elapsed_ms: f64,
    /// Carriage height above the bottom of travel [m], within `[0, travel_m]`.
    pub position_m: f64,
    /// Carriage velocity, positive upward [m/s].
    pub velocity_ms: f64,
    /// Acceleration applied during the last step [m/s²].
    pub acceleration_ms2: f64,
    /// Motor current [A], never negative.
    pub current_a: f64,
    /// Signed drive duty in `[-1, 1]`.
    pub duty: f64,
    /// Sign of `duty`.
    pub direction: Direction,
    pub trip: TripState,
    pub limit_top: bool,
    pub limit_bottom: bool,
    /// Time the drive was energised [ms]. Excludes time held at a limit.
    pub motor_run_ms: f64,
    /// Causes of a latched hard trip.
    pub latched: FaultFlags,
}

assert_impl_all!(PlantState: Copy, Send, Sync);

impl PlantState {
    /// Carriage at rest at `position_m` with everything else cleared.
    pub const fn at_rest(position_m: f64) -> Self {
        Self {
            elapsed_ms: 0.0,
            position_m,
            velocity_ms: 0.0,
            acceleration_ms2: 0.0,
            current_a: 0.0,
            duty: 0.0,
            direction: Direction::Idle,
            trip: TripState::None,
            limit_top: false,
            limit_bottom: false,
            motor_run_ms: 0.0,
            latched: FaultFlags::empty(),
        }
    }

    /// Whether a hard trip has latched on this engine.
    #[inline]
    pub const fn is_hard_latched(&self) -> bool {
        !self.latched.is_empty()
    }

    /// Zero the drive and all motion quantities, leaving position in place.
    #[inline]
    pub fn hold(&mut self) {
        self.duty = 0.0;
        self.direction = Direction::Idle;
        self.velocity_ms = 0.0;
        self.acceleration_ms2 = 0.0;
        self.current_a = 0.0;
    }
}

impl Default for PlantState {
    fn default() -> Self {
        Self::at_rest(0.0)
    }
}
