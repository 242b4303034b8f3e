//! Trip/safety state machine.
//!
//! `None → Soft → Hard`, with `Door` and `Limit` imposed by the interlock
//! resolver ahead of this stage. Trip state lives in `PlantState`; this
//! module is a pure transition function over it.
//!
//! | from \ event      | Nominal | SoftOvercurrent | HardOvercurrent | Jam  | AtRest |
//! |-------------------|---------|-----------------|-----------------|------|--------|
//! | None              | None    | Soft            | Hard            | Hard | None   |
//! | Soft              | Soft    | Soft            | Hard            | Hard | None   |
//! | Hard              | Hard    | Hard            | Hard            | Hard | Hard   |
//! | Door / Limit      | (held)  | (held)          | (held)          | (held) | (held) |

use hoist_common::consts::SOFT_TRIP_DUTY_CAP;
use hoist_common::plant::PlantParams;
use hoist_common::state::{FaultFlags, TripState};

/// Condition observed during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripEvent {
    /// Current below both thresholds, no jam.
    Nominal,
    /// Current at or above the soft threshold.
    SoftOvercurrent,
    /// Current at or above the hard threshold.
    HardOvercurrent,
    /// Overload window active while moving or commanded to move.
    Jam,
    /// Drive idle and carriage stationary.
    AtRest,
}

impl TripEvent {
    /// Fault recorded when this event latches a hard trip.
    #[inline]
    pub const fn latch_cause(self) -> FaultFlags {
        match self {
            Self::HardOvercurrent => FaultFlags::OVERCURRENT,
            Self::Jam => FaultFlags::JAM,
            _ => FaultFlags::empty(),
        }
    }
}

/// Measurements the classifier needs.
#[derive(Debug, Clone, Copy)]
pub struct TripInput {
    /// Drive current at this step's duty and entry speed [A].
    pub current_a: f64,
    pub jam_active: bool,
    /// Carriage moving, or the drive is commanded to move.
    pub in_motion: bool,
}

/// Result of evaluating one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripOutcome {
    pub trip: TripState,
    /// Causes newly latched this step (empty unless the step entered `Hard`).
    pub latched: FaultFlags,
}

/// Reduce the measurements to the single most severe event.
///
/// Precedence: hard overcurrent, jam, soft overcurrent.
pub fn classify(params: &PlantParams, input: &TripInput) -> TripEvent {
    if input.current_a >= params.hard_trip_a {
        TripEvent::HardOvercurrent
    } else if input.jam_active && input.in_motion {
        TripEvent::Jam
    } else if input.current_a >= params.soft_trip_a {
        TripEvent::SoftOvercurrent
    } else {
        TripEvent::Nominal
    }
}

/// Transition function.
///
/// Interlock trips are left untouched: the resolver owns them for the step.
/// `Hard` is terminal. `Soft` only arises from `None`, and only clears at rest.
pub fn next_trip(state: TripState, event: TripEvent) -> TripState {
    use TripEvent as E;
    use TripState as S;

    match (state, event) {
        (s, _) if s.is_interlock() => s,
        (S::Hard, _) => S::Hard,
        (_, E::HardOvercurrent | E::Jam) => S::Hard,
        (S::None, E::SoftOvercurrent) => S::Soft,
        (S::Soft, E::AtRest) => S::None,
        (s, _) => s,
    }
}

/// Evaluate one step: transition plus latch bookkeeping.
pub fn evaluate(state: TripState, event: TripEvent) -> TripOutcome {
    let trip = next_trip(state, event);
    let latched = if trip == TripState::Hard && state != TripState::Hard {
        event.latch_cause()
    } else {
        FaultFlags::empty()
    };
    TripOutcome { trip, latched }
}

/// Apply the trip to the drive duty: `Hard` cuts it, `Soft` caps its magnitude.
///
/// The sign (direction) of the duty is preserved.
#[inline]
pub fn limit_duty(trip: TripState, duty: f64) -> f64 {
    match trip {
        TripState::Hard => 0.0,
        TripState::Soft => duty.clamp(-SOFT_TRIP_DUTY_CAP, SOFT_TRIP_DUTY_CAP),
        _ => duty,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
