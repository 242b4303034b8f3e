//! Integration test: trip protection across long runs.
//!
//! Hard trips latch for the engine's lifetime; the door interlock overrides
//! every other classification while open.

use hoist_common::plant::PlantParams;
use hoist_common::state::{Command, FaultFlags, TripState};
use hoist_sim::engine::HoistEngine;

use super::run_ms;

/// Doubled supply: stall current at 0.9 duty far exceeds the hard threshold.
fn overdriven() -> HoistEngine {
    HoistEngine::new(PlantParams {
        supply_v: 24.0,
        ..PlantParams::default()
    })
    .unwrap()
}

fn backdrivable() -> PlantParams {
    PlantParams {
        non_backdrivable: false,
        ..PlantParams::default()
    }
}

fn trip_hard(e: &mut HoistEngine) {
    e.command(Command::Up);
    for _ in 0..1_000 {
        e.tick(1.0).unwrap();
        if e.state().trip == TripState::Hard {
            return;
        }
    }
    panic!("no hard trip within 1 s: {:?}", e.state());
}

// ── Hard trip ──

#[test]
fn overcurrent_latches_hard() {
    let mut e = overdriven();
    trip_hard(&mut e);
    let s = e.state();
    assert_eq!(s.duty, 0.0);
    assert_eq!(s.latched, FaultFlags::OVERCURRENT);
    assert_eq!(e.current_command(), Command::Stop);
}

#[test]
fn hard_trip_survives_reissued_commands() {
    let mut e = overdriven();
    trip_hard(&mut e);

    for command in [Command::Up, Command::Down, Command::Stop, Command::Up] {
        e.command(command);
        for _ in 0..500 {
            e.tick(1.0).unwrap();
            let s = e.state();
            assert_eq!(s.trip, TripState::Hard);
            assert_eq!(s.duty, 0.0);
            assert_eq!(s.current_a, 0.0);
        }
    }
}

#[test]
fn hard_trip_survives_door_cycle() {
    let mut e = overdriven();
    trip_hard(&mut e);

    e.set_door_open(true);
    run_ms(&mut e, 100);
    assert_eq!(e.state().trip, TripState::Door);

    e.set_door_open(false);
    e.command(Command::Up);
    run_ms(&mut e, 100);
    assert_eq!(e.state().trip, TripState::Hard);
    assert_eq!(e.state().duty, 0.0);
}

#[test]
fn fresh_engine_clears_hard() {
    let mut e = overdriven();
    trip_hard(&mut e);
    let e = HoistEngine::new(*e.params()).unwrap();
    assert_eq!(e.state().trip, TripState::None);
    assert!(e.state().latched.is_empty());
}

// ── Door ──

#[test]
fn door_stops_moving_carriage() {
    for params in [PlantParams::default(), backdrivable()] {
        let mut e = HoistEngine::new(params).unwrap();
        e.command(Command::Up);
        run_ms(&mut e, 3_000);
        assert!(e.state().velocity_ms > 0.1);

        e.set_door_open(true);
        for _ in 0..3_000 {
            e.tick(1.0).unwrap();
            let s = e.state();
            assert_eq!(s.trip, TripState::Door);
            assert_eq!(s.duty, 0.0);
            assert!(s.velocity_ms >= 0.0);
        }
        assert_eq!(e.state().velocity_ms, 0.0);
        assert_eq!(e.current_command(), Command::Up);
    }
}

#[test]
fn door_overrides_overcurrent_and_jam() {
    let mut e = overdriven();
    e.set_door_open(true);
    e.command(Command::Up);
    e.set_overload_active(true, 4.0);
    run_ms(&mut e, 500);

    let s = e.state();
    assert_eq!(s.trip, TripState::Door);
    assert_eq!(s.current_a, 0.0);
    assert!(s.latched.is_empty());
}

#[test]
fn closing_door_resumes_motion() {
    let mut e = HoistEngine::with_initial_position(PlantParams::default(), 1.0).unwrap();
    e.set_door_open(true);
    e.command(Command::Up);
    run_ms(&mut e, 100);
    assert_eq!(e.state().position_m, 1.0);

    e.set_door_open(false);
    assert_eq!(e.state().trip, TripState::None);
    run_ms(&mut e, 500);
    assert!(e.state().position_m > 1.0);
    assert!(e.state().velocity_ms > 0.0);
}

#[test]
fn jam_while_door_open_trips_on_close() {
    let mut e = HoistEngine::with_initial_position(PlantParams::default(), 1.0).unwrap();
    e.command(Command::Up);
    e.set_door_open(true);
    e.pulse_overload(1_000.0, 3.0);
    run_ms(&mut e, 500);
    assert_eq!(e.state().trip, TripState::Door);

    e.set_door_open(false);
    e.tick(1.0).unwrap();
    assert_eq!(e.state().trip, TripState::Hard);
    assert!(e.state().latched.contains(FaultFlags::JAM));
}

#[test]
fn expired_pulse_does_not_trip() {
    let mut e = HoistEngine::with_initial_position(PlantParams::default(), 1.0).unwrap();
    e.pulse_overload(100.0, 3.0);
    run_ms(&mut e, 200);
    e.command(Command::Up);
    run_ms(&mut e, 200);
    assert_ne!(e.state().trip, TripState::Hard);
    assert!(e.state().velocity_ms > 0.0);
}

// ── Soft trip ──

#[test]
fn soft_trip_clears_when_backdrivable_carriage_stops() {
    let mut e = HoistEngine::new(backdrivable()).unwrap();
    e.command(Command::Up);
    run_ms(&mut e, 1_000);
    assert_eq!(e.state().trip, TripState::Soft);

    e.command(Command::Stop);
    run_ms(&mut e, 3_000);
    let s = e.state();
    assert_eq!(s.velocity_ms, 0.0);
    assert_eq!(s.trip, TripState::None);
}
