//! Integration test: reference scenarios with default plant parameters.

use hoist_common::plant::PlantParams;
use hoist_common::state::{Command, Direction, FaultFlags, TripState};
use hoist_sim::engine::HoistEngine;

use super::{default_engine, run_ms};

#[test]
fn full_lift_ends_held_on_top_switch() {
    let mut e = default_engine();
    e.command(Command::Up);
    run_ms(&mut e, 20_000);

    let s = e.state();
    let p = PlantParams::default();
    assert!(s.limit_top);
    assert!(!s.limit_bottom);
    assert_eq!(s.trip, TripState::Limit);
    assert_eq!(s.velocity_ms, 0.0);
    assert_eq!(s.duty, 0.0);
    assert_eq!(s.direction, Direction::Idle);
    assert!(s.position_m >= p.limit_top_m + p.limit_hyst_m);
    assert!(s.position_m <= p.travel_m);
    assert!((p.travel_m - s.position_m).abs() < 0.01);
    assert_eq!(s.elapsed_ms, 20_000.0);
}

#[test]
fn lift_creeps_at_cruise_speed_under_soft_trip() {
    let mut e = default_engine();
    e.command(Command::Up);
    run_ms(&mut e, 3_000);

    let s = e.state();
    assert_eq!(s.trip, TripState::Soft);
    assert_eq!(s.duty, 0.5);
    assert!((s.velocity_ms - 0.2).abs() < 1e-3);
    assert!((s.position_m - 0.56).abs() < 0.01);
    // (12 · 0.5 − 0.08 · 4) / 0.4
    assert!((s.current_a - 14.2).abs() < 0.01);
}

#[test]
fn run_time_stops_while_held_at_limit() {
    let mut e = default_engine();
    e.command(Command::Up);
    run_ms(&mut e, 15_000);
    let held = e.state();
    assert_eq!(held.trip, TripState::Limit);
    assert!(held.motor_run_ms < held.elapsed_ms);

    run_ms(&mut e, 5_000);
    let s = e.state();
    assert_eq!(s.motor_run_ms, held.motor_run_ms);
    assert_eq!(s.elapsed_ms, 20_000.0);
}

#[test]
fn jam_pulse_from_rest_trips_hard_inside_window() {
    let mut e = default_engine();
    e.command(Command::Up);
    e.pulse_overload(2_000.0, 2.5);

    let mut tripped_at = None;
    for _ in 0..2_000 {
        e.tick(1.0).unwrap();
        if e.state().trip == TripState::Hard {
            tripped_at = Some(e.state().elapsed_ms);
            break;
        }
    }

    let t = tripped_at.expect("hard trip inside the overload window");
    assert!(t < 2_000.0);
    let s = e.state();
    assert_eq!(s.duty, 0.0);
    assert!(s.latched.contains(FaultFlags::JAM));
    assert_eq!(e.current_command(), Command::Stop);
}

#[test]
fn worm_gear_holds_position_exactly() {
    let mut e = HoistEngine::with_initial_position(PlantParams::default(), 1.0).unwrap();
    e.command(Command::Stop);
    for _ in 0..10_000 {
        e.tick(1.0).unwrap();
        let s = e.state();
        assert_eq!(s.position_m, 1.0);
        assert_eq!(s.velocity_ms, 0.0);
    }
    assert_eq!(e.state().motor_run_ms, 0.0);
}

#[test]
fn lowering_returns_to_bottom_switch() {
    let mut e = HoistEngine::with_initial_position(PlantParams::default(), 0.3).unwrap();
    e.command(Command::Down);
    run_ms(&mut e, 5_000);

    let s = e.state();
    assert!(s.limit_bottom);
    assert_eq!(s.trip, TripState::Limit);
    assert_eq!(s.velocity_ms, 0.0);
    assert!(s.position_m <= PlantParams::default().limit_bottom_m);
}
