//! Per-archetype tuning, loadable from YAML.

use std::path::Path;

use ai_perception::{SensorConfig, WALL_ATTENUATION};
use serde::{Deserialize, Serialize};

use crate::EnemyError;

/// Every constant the node library reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Seconds a chase lasts before the target is dropped and re-sensed.
    pub chase_duration: f32,
    /// A target farther than this is lost; its position is remembered.
    pub max_chase_range: f32,
    pub attack_range: f32,
    /// Seconds between two attacks.
    pub attack_interval: f32,
    pub attack_damage: f32,
    /// Share of the noise radius that carries through a wall.
    pub wall_attenuation: f32,
    /// Seconds spent at each patrol waypoint.
    pub patrol_dwell: f32,
    /// Seconds spent looking around at a noise before giving up.
    pub noise_dwell: f32,
    /// Seconds after which an unreachable noise counts as reached.
    pub stuck_threshold: f32,
    pub arrival_distance: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub sensor: SensorConfig,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            chase_duration: 10.0,
            max_chase_range: 25.0,
            attack_range: 2.0,
            attack_interval: 1.5,
            attack_damage: 25.0,
            wall_attenuation: WALL_ATTENUATION,
            patrol_dwell: 2.0,
            noise_dwell: 3.0,
            stuck_threshold: 8.0,
            arrival_distance: 0.5,
            walk_speed: 2.0,
            run_speed: 5.0,
            sensor: SensorConfig::default(),
        }
    }
}

impl EnemyTuning {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EnemyError> {
        let tuning: Self = serde_yaml::from_str(yaml)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EnemyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| EnemyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<(), EnemyError> {
        let positive = [
            ("chase_duration", self.chase_duration),
            ("max_chase_range", self.max_chase_range),
            ("attack_range", self.attack_range),
            ("attack_interval", self.attack_interval),
            ("arrival_distance", self.arrival_distance),
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(EnemyError::InvalidTuning { field, value });
            }
        }
        let non_negative = [
            ("attack_damage", self.attack_damage),
            ("patrol_dwell", self.patrol_dwell),
            ("noise_dwell", self.noise_dwell),
            ("stuck_threshold", self.stuck_threshold),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(EnemyError::InvalidTuning { field, value });
            }
        }
        if !(self.wall_attenuation >= 0.0 && self.wall_attenuation <= 1.0) {
            return Err(EnemyError::InvalidTuning {
                field: "wall_attenuation",
                value: self.wall_attenuation,
            });
        }
        self.sensor.validate()?;
        Ok(())
    }
}
