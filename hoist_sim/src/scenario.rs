//! Headless scenario runner.
//!
//! A scenario is a TOML script of timed host actions against one engine:
//!
//! ```toml
//! duration_ms = 5000
//!
//! [[event]]
//! at_ms = 0
//! action = "command"
//! command = "up"
//!
//! [[event]]
//! at_ms = 1500
//! action = "pulse_overload"
//! duration_ms = 200
//! factor = 3.0
//! ```
//!
//! Events are applied in `at_ms` order (stable for equal times) before the
//! first tick that starts at or after `at_ms`. Tick start times are computed
//! from the step index, so a scenario replays identically on every run.

use std::path::Path;

use hoist_common::config::{ConfigError, ConfigLoader, StepConfig};
use hoist_common::interlock::{LimitOverride, OverloadWindow};
use hoist_common::plant::PlantParams;
use hoist_common::state::{Command, PlantState};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::engine::HoistEngine;
use crate::error::InvalidStepError;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Step(#[from] InvalidStepError),

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

fn default_factor() -> f64 {
    OverloadWindow::DEFAULT_FACTOR
}

/// Host action applied between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Command {
        command: Command,
    },
    Door {
        open: bool,
    },
    Overload {
        active: bool,
        #[serde(default = "default_factor")]
        factor: f64,
    },
    PulseOverload {
        duration_ms: f64,
        #[serde(default = "default_factor")]
        factor: f64,
    },
    LimitOverride {
        #[serde(default)]
        top: Option<bool>,
        #[serde(default)]
        bottom: Option<bool>,
    },
}

impl Action {
    fn apply(&self, engine: &mut HoistEngine) {
        match *self {
            Self::Command { command } => engine.command(command),
            Self::Door { open } => engine.set_door_open(open),
            Self::Overload { active, factor } => engine.set_overload_active(active, factor),
            Self::PulseOverload {
                duration_ms,
                factor,
            } => engine.pulse_overload(duration_ms, factor),
            Self::LimitOverride { top, bottom } => {
                engine.set_limit_override(LimitOverride { top, bottom })
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        match *self {
            Self::Overload { factor, .. } if !factor.is_finite() => {
                Err(format!("overload factor must be finite, got {factor}"))
            }
            Self::PulseOverload {
                duration_ms,
                factor,
            } => {
                if !duration_ms.is_finite() || duration_ms < 0.0 {
                    Err(format!("pulse duration_ms must be finite and >= 0, got {duration_ms}"))
                } else if !factor.is_finite() {
                    Err(format!("overload factor must be finite, got {factor}"))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEvent {
    /// Simulated time the action takes effect [ms].
    pub at_ms: f64,
    #[serde(flatten)]
    pub action: Action,
}

/// Scenario document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Simulated run length [ms].
    pub duration_ms: f64,
    /// Carriage start position [m].
    #[serde(default)]
    pub start_position_m: f64,
    #[serde(default, rename = "event")]
    pub events: Vec<ScenarioEvent>,
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load_validated(path: &Path) -> Result<Self, ScenarioError> {
        let scenario = Self::load(path)?;
        scenario.validate()?;
        debug!(
            "Loaded scenario from {}: {} ms, {} events",
            path.display(),
            scenario.duration_ms,
            scenario.events.len()
        );
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(ScenarioError::Invalid(format!(
                "duration_ms must be finite and > 0, got {}",
                self.duration_ms
            )));
        }
        for (i, event) in self.events.iter().enumerate() {
            if !event.at_ms.is_finite() || event.at_ms < 0.0 {
                return Err(ScenarioError::Invalid(format!(
                    "event {i}: at_ms must be finite and >= 0, got {}",
                    event.at_ms
                )));
            }
            event
                .action
                .validate()
                .map_err(|msg| ScenarioError::Invalid(format!("event {i}: {msg}")))?;
        }
        Ok(())
    }

    /// Events sorted by time, ties kept in document order.
    fn timeline(&self) -> Vec<&ScenarioEvent> {
        let mut events: Vec<_> = self.events.iter().collect();
        events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
        events
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub steps: u64,
    pub samples: u64,
    pub final_state: PlantState,
}

/// Drives one engine through a scenario at a fixed step.
#[derive(Debug)]
pub struct ScenarioRunner {
    engine: HoistEngine,
    stepping: StepConfig,
}

impl ScenarioRunner {
    pub fn new(
        params: PlantParams,
        stepping: StepConfig,
        start_position_m: f64,
    ) -> Result<Self, ScenarioError> {
        stepping.validate()?;
        let engine = HoistEngine::with_initial_position(params, start_position_m)?;
        Ok(Self { engine, stepping })
    }

    /// Run `scenario` to completion, handing every sampled snapshot to `sink`.
    ///
    /// A snapshot is taken every `sample_every_steps` ticks and after the
    /// final tick.
    pub fn run<F>(&mut self, scenario: &Scenario, mut sink: F) -> Result<RunSummary, ScenarioError>
    where
        F: FnMut(&PlantState),
    {
        scenario.validate()?;
        let step_ms = InvalidStepError::check(self.stepping.step_ms)?;
        let every = self.stepping.sample_every_steps.max(1);
        let total_steps = (scenario.duration_ms / step_ms).ceil() as u64;

        let timeline = scenario.timeline();
        let mut next_event = 0;
        let mut samples = 0;

        info!(
            "Running scenario: {} steps of {} ms, {} events",
            total_steps,
            step_ms,
            timeline.len()
        );

        for k in 0..total_steps {
            let tick_start_ms = k as f64 * step_ms;
            while let Some(event) = timeline.get(next_event) {
                if event.at_ms > tick_start_ms {
                    break;
                }
                debug!("t={} ms: {:?}", tick_start_ms, event.action);
                event.action.apply(&mut self.engine);
                next_event += 1;
            }

            self.engine.tick(step_ms)?;

            let done = k + 1;
            if done % every == 0 || done == total_steps {
                sink(&self.engine.state());
                samples += 1;
            }
        }

        if next_event < timeline.len() {
            warn!(
                "{} events scheduled after the end of the run were not applied",
                timeline.len() - next_event
            );
        }

        let final_state = self.engine.state();
        info!(
            "Scenario finished at {} ms: pos={:.4} m, trip={:?}",
            final_state.elapsed_ms, final_state.position_m, final_state.trip
        );

        Ok(RunSummary {
            steps: total_steps,
            samples,
            final_state,
        })
    }

    #[inline]
    pub fn engine(&self) -> &HoistEngine {
        &self.engine
    }
}

/// Build a runner from `params`/`stepping` and run `scenario` once.
pub fn run<F>(
    params: PlantParams,
    stepping: StepConfig,
    scenario: &Scenario,
    sink: F,
) -> Result<RunSummary, ScenarioError>
where
    F: FnMut(&PlantState),
{
    ScenarioRunner::new(params, stepping, scenario.start_position_m)?.run(scenario, sink)
}
