//! Game balance knobs
//!
//! Loaded from JSON with camelCase keys. Anything missing keeps its default,
//! and `sanitized` pulls out-of-range values back into shape.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::aabb::Aabb;
use crate::sim::motion::default_body;
use crate::sim::obstacles::WorldBounds;

/// Errors loading a tuning file
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("Failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    // === Movement ===
    /// Player speed (units/s)
    pub move_speed: f32,
    /// Player max turn rate (rad/s at full intensity)
    pub turn_rate: f32,
    /// Target speed (units/s), kept below the player's
    pub target_move_speed: f32,
    /// Player and target body bounds (local space)
    pub agent_body: Aabb,
    pub player_spawn: Vec3,

    // === Arena ===
    pub world_bounds: WorldBounds,
    pub obstacle_count: u32,
    pub min_spacing: f32,
    pub safe_zone_radius: f32,
    pub max_placement_attempts: u32,

    // === Round rules ===
    pub catch_radius: f32,
    pub initial_time_limit: f32,
    pub time_reduction_per_catch: f32,
    pub minimum_time_limit: f32,

    // === Presentation ===
    pub camera_smoothing_factor: f32,
    pub camera_offset: Vec3,
    pub camera_look_offset: Vec3,
    pub sensor_max_range: f32,
    pub sensor_display_radius: f32,
    pub sensor_dot_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            turn_rate: std::f32::consts::PI,
            target_move_speed: 3.5,
            agent_body: default_body(),
            player_spawn: Vec3::new(0.0, 0.0, 5.0),

            world_bounds: WorldBounds::default(),
            obstacle_count: 20,
            min_spacing: 4.0,
            safe_zone_radius: 8.0,
            max_placement_attempts: crate::consts::MAX_PLACEMENT_ATTEMPTS,

            catch_radius: 2.5,
            initial_time_limit: 60.0,
            time_reduction_per_catch: 7.0,
            minimum_time_limit: 5.0,

            camera_smoothing_factor: 4.0,
            camera_offset: Vec3::new(0.0, 4.0, -8.0),
            camera_look_offset: Vec3::new(0.0, 1.5, 0.0),
            sensor_max_range: 50.0,
            sensor_display_radius: 75.0,
            sensor_dot_radius: 3.0,
        }
    }
}

impl Tuning {
    /// Parse from JSON text (missing keys keep defaults)
    pub fn from_json(text: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(text)?;
        Ok(tuning.sanitized())
    }

    /// Read and parse a tuning file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{} ({}), using default tuning", e, path.display());
                Self::default()
            }
        }
    }

    /// Clamp values so round and motion invariants hold
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let non_negative = |v: f32, fallback: f32| if v.is_finite() { v.max(0.0) } else { fallback };

        self.move_speed = non_negative(self.move_speed, defaults.move_speed);
        self.turn_rate = non_negative(self.turn_rate, defaults.turn_rate);
        self.target_move_speed = non_negative(self.target_move_speed, defaults.target_move_speed);
        self.world_bounds.x = non_negative(self.world_bounds.x, defaults.world_bounds.x);
        self.world_bounds.z = non_negative(self.world_bounds.z, defaults.world_bounds.z);
        self.min_spacing = non_negative(self.min_spacing, defaults.min_spacing);
        self.safe_zone_radius = non_negative(self.safe_zone_radius, defaults.safe_zone_radius);
        self.max_placement_attempts = self.max_placement_attempts.max(1);
        self.catch_radius = non_negative(self.catch_radius, defaults.catch_radius);
        self.time_reduction_per_catch =
            non_negative(self.time_reduction_per_catch, defaults.time_reduction_per_catch);
        self.camera_smoothing_factor =
            non_negative(self.camera_smoothing_factor, defaults.camera_smoothing_factor);

        if !(self.minimum_time_limit.is_finite() && self.minimum_time_limit > 0.0) {
            self.minimum_time_limit = defaults.minimum_time_limit;
        }
        if !self.initial_time_limit.is_finite() {
            self.initial_time_limit = defaults.initial_time_limit;
        }
        self.initial_time_limit = self.initial_time_limit.max(self.minimum_time_limit);

        if !(self.sensor_max_range.is_finite() && self.sensor_max_range > 0.0) {
            self.sensor_max_range = defaults.sensor_max_range;
        }
        if !(self.sensor_display_radius.is_finite() && self.sensor_display_radius > 0.0) {
            self.sensor_display_radius = defaults.sensor_display_radius;
        }
        if !self.sensor_dot_radius.is_finite() {
            self.sensor_dot_radius = defaults.sensor_dot_radius;
        }
        self.sensor_dot_radius = self
            .sensor_dot_radius
            .clamp(0.0, self.sensor_display_radius * 0.5);

        self.agent_body = Aabb::new(self.agent_body.min, self.agent_body.max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_rules() {
        let t = Tuning::default();
        assert_eq!(t.initial_time_limit, 60.0);
        assert_eq!(t.time_reduction_per_catch, 7.0);
        assert_eq!(t.minimum_time_limit, 5.0);
        assert_eq!(t.catch_radius, 2.5);
        assert!(t.target_move_speed < t.move_speed);
        assert_eq!(t.clone().sanitized(), t);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "catchRadius": 3.0, "obstacleCount": 5 }"#).unwrap();
        assert_eq!(t.catch_radius, 3.0);
        assert_eq!(t.obstacle_count, 5);
        assert_eq!(t.move_speed, Tuning::default().move_speed);
    }

    #[test]
    fn test_recognized_keys() {
        let text = serde_json::to_string(&Tuning::default()).unwrap();
        for key in [
            "moveSpeed",
            "turnRate",
            "obstacleCount",
            "minSpacing",
            "catchRadius",
            "initialTimeLimit",
            "timeReductionPerCatch",
            "minimumTimeLimit",
            "cameraSmoothingFactor",
            "sensorMaxRange",
        ] {
            assert!(text.contains(key), "missing {key}");
        }
    }

    #[test]
    fn test_sanitize_time_limits() {
        let t = Tuning::from_json(
            r#"{ "minimumTimeLimit": -2.0, "initialTimeLimit": 1.0, "moveSpeed": -4.0 }"#,
        )
        .unwrap();
        assert_eq!(t.minimum_time_limit, 5.0);
        assert_eq!(t.initial_time_limit, 5.0);
        assert_eq!(t.move_speed, 0.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            Tuning::from_json("{ nope"),
            Err(TuningError::Parse(_))
        ));
        assert!(matches!(
            Tuning::from_file("/definitely/not/here.json"),
            Err(TuningError::Io(_))
        ));
        assert_eq!(Tuning::load("/definitely/not/here.json"), Tuning::default());
    }
}
