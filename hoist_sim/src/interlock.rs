//! Interlock & sensor resolver: first stage of every step.
//!
//! Resolves the limit switches (hysteresis or forced override) and the door
//! interlock, and decides which drive direction the rest of the step may use.
//! Runs before any dynamics so an open door or an engaged switch always
//! wins over anything computed later in the step.

use hoist_common::interlock::LimitOverride;
use hoist_common::plant::PlantParams;
use hoist_common::state::{Command, Direction, PlantState, TripState};

/// Sensed (or forced) state of both limit switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LimitSwitches {
    pub top: bool,
    pub bottom: bool,
}

impl LimitSwitches {
    #[inline]
    pub const fn any(&self) -> bool {
        self.top || self.bottom
    }

    /// Whether driving in `drive` pushes into a switch that is already engaged.
    #[inline]
    pub const fn blocks(&self, drive: Direction) -> bool {
        match drive {
            Direction::Up => self.top,
            Direction::Down => self.bottom,
            Direction::Idle => false,
        }
    }
}

/// Host-side inputs the resolver reads.
#[derive(Debug, Clone, Copy)]
pub struct InterlockInput {
    pub command: Command,
    pub door_open: bool,
    pub limit_override: LimitOverride,
}

/// Resolver output for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interlocks {
    pub limits: LimitSwitches,
    pub door_open: bool,
    /// Direction the drive may use this step. Idle when the door is open or a
    /// hard trip has latched, whatever the operator commands.
    pub drive: Direction,
}

impl Interlocks {
    /// Drive is pushing into an engaged limit switch.
    #[inline]
    pub const fn pushing_into_limit(&self) -> bool {
        self.limits.blocks(self.drive)
    }
}

/// Resolve the interlocks for the step starting from `state`.
pub fn resolve(state: &PlantState, params: &PlantParams, input: &InterlockInput) -> Interlocks {
    let limits = resolve_limit_switches(
        state.position_m,
        LimitSwitches {
            top: state.limit_top,
            bottom: state.limit_bottom,
        },
        params,
        input.limit_override,
    );

    let drive = if input.door_open || state.is_hard_latched() {
        Direction::Idle
    } else {
        input.command.direction()
    };

    Interlocks {
        limits,
        door_open: input.door_open,
        drive,
    }
}

/// Limit switch update with hysteresis.
///
/// An engaged switch releases only once position backs off past
/// `limit ∓ hyst`; a released switch engages only once position reaches
/// `limit ± hyst`. A forced side ignores position entirely.
pub fn resolve_limit_switches(
    position_m: f64,
    previous: LimitSwitches,
    params: &PlantParams,
    overrides: LimitOverride,
) -> LimitSwitches {
    let hyst = params.limit_hyst_m;

    let top = match overrides.top {
        Some(forced) => forced,
        None if previous.top => position_m >= params.limit_top_m - hyst,
        None => position_m >= params.limit_top_m + hyst,
    };

    let bottom = match overrides.bottom {
        Some(forced) => forced,
        None if previous.bottom => position_m <= params.limit_bottom_m + hyst,
        None => position_m <= params.limit_bottom_m - hyst,
    };

    LimitSwitches { top, bottom }
}

/// Trip classification imposed by the interlocks, before overcurrent checks.
///
/// - Door open → `Door`, regardless of anything else.
/// - `Door` with the door closed → back to `Hard` if latched, else `None`.
/// - `Limit` releases once the drive heads away from every engaged switch
///   or no switch remains engaged. Resting against a switch keeps it.
pub fn classify_trip(
    previous: TripState,
    interlocks: &Interlocks,
    hard_latched: bool,
) -> TripState {
    let restored = if hard_latched {
        TripState::Hard
    } else {
        TripState::None
    };

    if interlocks.door_open {
        return TripState::Door;
    }

    match previous {
        TripState::Door => restored,
        TripState::Limit if interlocks.pushing_into_limit() => TripState::Limit,
        TripState::Limit if !interlocks.drive.is_idle() || !interlocks.limits.any() => restored,
        other => other,
    }
}
