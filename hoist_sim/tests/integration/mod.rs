mod determinism;
mod invariants;
mod scenarios;
mod trips;

use hoist_common::plant::PlantParams;
use hoist_sim::engine::HoistEngine;

/// Engine with default parameters at the bottom of travel.
pub fn default_engine() -> HoistEngine {
    HoistEngine::new(PlantParams::default()).unwrap()
}

/// Tick `engine` `n` times at 1 ms.
pub fn run_ms(engine: &mut HoistEngine, n: usize) {
    for _ in 0..n {
        engine.tick(1.0).unwrap();
    }
}
