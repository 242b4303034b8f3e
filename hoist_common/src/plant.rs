//! Plant parameters: the immutable physical description of one hoist.
//!
//! Parameters are fixed when an engine is constructed. Changing any of them
//! means building a new engine. Every field has an explicit default, so a
//! TOML `[plant]` table only needs to list the values it overrides.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::GRAVITY_MS2;

/// Electromechanical and geometric parameters of the hoist.
///
/// # TOML Example
///
/// ```toml
/// [plant]
/// mass_kg = 80.0
/// supply_v = 24.0
/// non_backdrivable = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantParams {
    /// Carriage plus payload mass [kg].
    pub mass_kg: f64,
    /// Cable drum radius [m].
    pub drum_radius_m: f64,
    /// Usable shaft travel [m]. Position is bounded to `[0, travel_m]`.
    pub travel_m: f64,
    /// Cruise speed the velocity loop tracks [m/s].
    pub target_speed_ms: f64,
    /// Soft (reduced speed) overcurrent threshold [A].
    pub soft_trip_a: f64,
    /// Hard (full stop) overcurrent threshold [A].
    pub hard_trip_a: f64,
    /// Drive supply voltage [V].
    pub supply_v: f64,
    /// Armature resistance Ra [Ω].
    pub armature_resistance: f64,
    /// Torque constant Kt [Nm/A].
    pub torque_constant: f64,
    /// Back-EMF constant Ke [V·s/rad].
    pub back_emf_constant: f64,
    /// Worm-type drivetrain: gravity alone cannot move the carriage.
    pub non_backdrivable: bool,
    /// Top limit switch position [m].
    pub limit_top_m: f64,
    /// Bottom limit switch position [m].
    pub limit_bottom_m: f64,
    /// Limit switch hysteresis half-band [m].
    pub limit_hyst_m: f64,
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            mass_kg: 50.0,
            drum_radius_m: 0.05,
            travel_m: 2.0,
            target_speed_ms: 0.2,
            soft_trip_a: 22.0,
            hard_trip_a: 28.0,
            supply_v: 12.0,
            armature_resistance: 0.4,
            torque_constant: 0.08,
            back_emf_constant: 0.08,
            non_backdrivable: true,
            limit_top_m: 1.995,
            limit_bottom_m: 0.005,
            limit_hyst_m: 0.002,
        }
    }
}

impl PlantParams {
    /// Gravitational load torque at the drum [Nm].
    #[inline]
    pub fn load_torque_nm(&self) -> f64 {
        self.mass_kg * GRAVITY_MS2 * self.drum_radius_m
    }

    /// Validate the parameter set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - any numeric field is not finite
    /// - `travel_m`, `mass_kg`, `drum_radius_m` or `armature_resistance` is not positive
    /// - trip thresholds violate `hard_trip_a > soft_trip_a > 0`
    /// - limit switches violate `0 <= limit_bottom_m < limit_top_m <= travel_m`
    /// - `limit_hyst_m`, `target_speed_ms`, `supply_v`, `torque_constant` or
    ///   `back_emf_constant` is negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("mass_kg", self.mass_kg),
            ("drum_radius_m", self.drum_radius_m),
            ("travel_m", self.travel_m),
            ("target_speed_ms", self.target_speed_ms),
            ("soft_trip_a", self.soft_trip_a),
            ("hard_trip_a", self.hard_trip_a),
            ("supply_v", self.supply_v),
            ("armature_resistance", self.armature_resistance),
            ("torque_constant", self.torque_constant),
            ("back_emf_constant", self.back_emf_constant),
            ("limit_top_m", self.limit_top_m),
            ("limit_bottom_m", self.limit_bottom_m),
            ("limit_hyst_m", self.limit_hyst_m),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {value}")));
            }
        }

        for (name, value) in [
            ("travel_m", self.travel_m),
            ("mass_kg", self.mass_kg),
            ("drum_radius_m", self.drum_radius_m),
            ("armature_resistance", self.armature_resistance),
        ] {
            if value <= 0.0 {
                return Err(invalid(format!("{name} must be > 0, got {value}")));
            }
        }

        for (name, value) in [
            ("limit_hyst_m", self.limit_hyst_m),
            ("target_speed_ms", self.target_speed_ms),
            ("supply_v", self.supply_v),
            ("torque_constant", self.torque_constant),
            ("back_emf_constant", self.back_emf_constant),
        ] {
            if value < 0.0 {
                return Err(invalid(format!("{name} must be >= 0, got {value}")));
            }
        }

        if self.soft_trip_a <= 0.0 {
            return Err(invalid(format!(
                "soft_trip_a must be > 0, got {}",
                self.soft_trip_a
            )));
        }
        if self.hard_trip_a <= self.soft_trip_a {
            return Err(invalid(format!(
                "hard_trip_a {} must exceed soft_trip_a {}",
                self.hard_trip_a, self.soft_trip_a
            )));
        }

        if self.limit_bottom_m < 0.0 {
            return Err(invalid(format!(
                "limit_bottom_m must be >= 0, got {}",
                self.limit_bottom_m
            )));
        }
        if self.limit_bottom_m >= self.limit_top_m {
            return Err(invalid(format!(
                "limit_bottom_m {} must be below limit_top_m {}",
                self.limit_bottom_m, self.limit_top_m
            )));
        }
        if self.limit_top_m > self.travel_m {
            return Err(invalid(format!(
                "limit_top_m {} exceeds travel_m {}",
                self.limit_top_m, self.travel_m
            )));
        }

        Ok(())
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::ValidationError(msg)
}
