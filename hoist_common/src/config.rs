//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load TOML configuration files
//! for the hoist simulator and its host tools.
//!
//! # Usage
//!
//! ```rust,no_run
//! use hoist_common::config::{ConfigError, HoistConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = HoistConfig::load_validated(Path::new("hoist.toml"))?;
//!     println!("Travel: {} m", config.plant.travel_m);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_SAMPLE_EVERY_STEPS, DEFAULT_STEP_MS};
use crate::plant::PlantParams;

/// Error type for configuration loading operations.
///
/// Also returned when an engine is constructed from parameters that
/// violate the plant invariants.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields shared by every hoist tool.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "hoist-sim-bench-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            service_name: "hoist-sim".to_string(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Host loop pacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepConfig {
    /// Fixed simulation step [ms].
    pub step_ms: f64,
    /// Publish one snapshot every N steps.
    pub sample_every_steps: u64,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            step_ms: DEFAULT_STEP_MS,
            sample_every_steps: DEFAULT_SAMPLE_EVERY_STEPS,
        }
    }
}

impl StepConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step_ms.is_finite() || self.step_ms <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "step_ms must be finite and > 0, got {}",
                self.step_ms
            )));
        }
        if self.sample_every_steps == 0 {
            return Err(ConfigError::ValidationError(
                "sample_every_steps must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level hoist configuration document.
///
/// Every section is optional; omitted sections take their defaults.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "hoist-sim-01"
///
/// [plant]
/// mass_kg = 65.0
///
/// [stepping]
/// sample_every_steps = 50
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoistConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub plant: PlantParams,
    #[serde(default)]
    pub stepping: StepConfig,
}

impl HoistConfig {
    /// Parse from a TOML string and validate every section.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate every section.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        debug!(
            "Loaded hoist config '{}' from {}",
            config.shared.service_name,
            path.display()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.plant.validate()?;
        self.stepping.validate()
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
///
/// Semantic validation is left to the caller.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation: any serde-deserializable struct can be loaded.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
