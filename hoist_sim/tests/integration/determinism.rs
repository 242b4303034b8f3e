//! Integration test: identical inputs reproduce identical trajectories.

use std::time::Duration;

use hoist_common::plant::PlantParams;
use hoist_common::state::{Command, PlantState};
use hoist_sim::engine::HoistEngine;
use hoist_sim::stepper::FixedStepper;

/// Scripted host session; returns every snapshot.
fn session(params: PlantParams) -> Vec<PlantState> {
    let mut e = HoistEngine::new(params).unwrap();
    let mut trace = Vec::with_capacity(8_000);
    for t in 0..8_000 {
        match t {
            0 => e.command(Command::Up),
            2_500 => e.pulse_overload(50.0, 1.5),
            3_000 => e.set_door_open(true),
            3_400 => e.set_door_open(false),
            5_000 => e.command(Command::Down),
            6_500 => e.command(Command::Stop),
            _ => {}
        }
        e.tick(1.0).unwrap();
        trace.push(e.state());
    }
    trace
}

#[test]
fn replay_is_bit_identical() {
    let a = session(PlantParams::default());
    let b = session(PlantParams::default());
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(&b).enumerate() {
        assert_eq!(x, y, "diverged at tick {i}");
        assert_eq!(x.position_m.to_bits(), y.position_m.to_bits());
        assert_eq!(x.velocity_ms.to_bits(), y.velocity_ms.to_bits());
    }
}

#[test]
fn different_params_diverge() {
    let a = session(PlantParams::default());
    let b = session(PlantParams {
        target_speed_ms: 0.3,
        ..PlantParams::default()
    });
    assert_ne!(a, b);
    // Both cruising, before the jam.
    assert!(b[2_000].position_m > a[2_000].position_m);
}

#[test]
fn frame_rate_does_not_change_trajectory() {
    let mut reference = HoistEngine::new(PlantParams::default()).unwrap();
    reference.command(Command::Up);
    for _ in 0..2_000 {
        reference.tick(1.0).unwrap();
    }

    // 60 Hz and 144 Hz hosts, both fed 2 s of wall time in uneven frames.
    for frame_us in [16_667u64, 6_944] {
        let mut e = HoistEngine::new(PlantParams::default()).unwrap();
        e.command(Command::Up);
        let mut stepper = FixedStepper::new(Duration::from_millis(1)).unwrap();
        let mut remaining = 2_000_000u64;
        while remaining > 0 {
            let frame = frame_us.min(remaining);
            stepper.run_frame(&mut e, Duration::from_micros(frame)).unwrap();
            remaining -= frame;
        }
        assert_eq!(stepper.pending(), Duration::ZERO);
        assert_eq!(e.state(), reference.state());
    }
}
