//! Integration test: invariants that hold after every tick.

use hoist_common::interlock::LimitOverride;
use hoist_common::plant::PlantParams;
use hoist_common::state::{Command, Direction, PlantState, TripState};
use hoist_sim::engine::HoistEngine;
use proptest::prelude::*;

use super::{default_engine, run_ms};

#[derive(Debug, Clone, Copy)]
enum HostAction {
    Up,
    Down,
    Stop,
    ToggleDoor,
}

fn host_action() -> impl Strategy<Value = HostAction> {
    prop_oneof![
        3 => Just(HostAction::Up),
        3 => Just(HostAction::Down),
        1 => Just(HostAction::Stop),
        1 => Just(HostAction::ToggleDoor),
    ]
}

fn step_ms() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![0.5, 1.0, 2.0, 5.0])
}

/// Host session: each entry is an action, then a run of ticks at a fixed dt.
fn session() -> impl Strategy<Value = Vec<(HostAction, f64, usize)>> {
    prop::collection::vec((host_action(), step_ms(), 1usize..400), 1..60)
}

fn fast_backdrivable() -> PlantParams {
    PlantParams {
        non_backdrivable: false,
        target_speed_ms: 2.0,
        mass_kg: 5.0,
        torque_constant: 0.5,
        soft_trip_a: 40.0,
        hard_trip_a: 60.0,
        ..PlantParams::default()
    }
}

fn check(s: &PlantState, p: &PlantParams) -> Result<(), TestCaseError> {
    prop_assert!(s.position_m >= 0.0 && s.position_m <= p.travel_m, "{s:?}");
    prop_assert!(s.current_a >= 0.0, "{s:?}");
    prop_assert!((-1.0..=1.0).contains(&s.duty), "{s:?}");
    prop_assert_eq!(s.direction, Direction::from_duty(s.duty), "{:?}", s);
    prop_assert!(s.motor_run_ms <= s.elapsed_ms, "{s:?}");
    if s.trip == TripState::Hard {
        prop_assert_eq!(s.duty, 0.0, "{:?}", s);
    }
    if s.trip == TripState::Soft {
        prop_assert!(s.duty.abs() <= 0.5, "{s:?}");
    }
    Ok(())
}

fn replay(params: PlantParams, plan: &[(HostAction, f64, usize)]) -> Result<(), TestCaseError> {
    let mut e = HoistEngine::with_initial_position(params, params.travel_m / 2.0).unwrap();
    for &(action, dt, ticks) in plan {
        match action {
            HostAction::Up => e.command(Command::Up),
            HostAction::Down => e.command(Command::Down),
            HostAction::Stop => e.command(Command::Stop),
            HostAction::ToggleDoor => e.set_door_open(!e.door_open()),
        }
        for _ in 0..ticks {
            e.tick(dt).unwrap();
            check(&e.state(), &params)?;
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_every_tick_default_plant(plan in session()) {
        replay(PlantParams::default(), &plan)?;
    }

    #[test]
    fn invariants_hold_every_tick_fast_backdrivable_plant(plan in session()) {
        replay(fast_backdrivable(), &plan)?;
    }
}

#[test]
fn top_switch_holds_through_dip_below_limit() {
    let p = PlantParams::default();
    let mut e = default_engine();
    e.command(Command::Up);
    run_ms(&mut e, 12_000);
    assert!(e.state().limit_top);

    e.command(Command::Down);
    let mut dipped_while_engaged = false;
    let mut prev = e.state();
    for _ in 0..1_000 {
        e.tick(1.0).unwrap();
        let s = e.state();
        if prev.position_m >= p.limit_top_m - p.limit_hyst_m {
            assert!(s.limit_top, "released early at {}", prev.position_m);
        }
        if s.limit_top && s.position_m < p.limit_top_m {
            dipped_while_engaged = true;
        }
        prev = s;
    }
    assert!(dipped_while_engaged);
    assert!(!e.state().limit_top);
    assert!(e.state().position_m < p.limit_top_m - p.limit_hyst_m);
}

#[test]
fn forced_switch_ignores_position() {
    let mut e = HoistEngine::with_initial_position(PlantParams::default(), 1.0).unwrap();
    e.set_limit_override(LimitOverride {
        top: None,
        bottom: Some(true),
    });
    e.command(Command::Down);
    run_ms(&mut e, 100);
    let s = e.state();
    assert!(s.limit_bottom);
    assert_eq!(s.trip, TripState::Limit);
    assert_eq!(s.position_m, 1.0);

    // Releasing the override returns the side to sensed behavior.
    e.set_limit_override(LimitOverride::released());
    assert!(e.limit_override().is_released());
    run_ms(&mut e, 100);
    assert!(!e.state().limit_bottom);
    assert_ne!(e.state().trip, TripState::Limit);
    assert!(e.state().position_m < 1.0);
}

#[test]
fn forced_off_switch_lets_carriage_reach_end_stop() {
    let mut e = HoistEngine::with_initial_position(PlantParams::default(), 1.9).unwrap();
    e.set_limit_override(LimitOverride {
        top: Some(false),
        bottom: None,
    });
    e.command(Command::Up);
    run_ms(&mut e, 3_000);
    let s = e.state();
    assert!(!s.limit_top);
    assert_eq!(s.position_m, PlantParams::default().travel_m);
    assert_eq!(s.velocity_ms, 0.0);
}
