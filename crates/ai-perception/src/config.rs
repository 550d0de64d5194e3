#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{NoiseKind, PerceptionError};

/// Vision sensor tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SensorConfig {
    /// Radius of the proximity query, in world units.
    pub radius: f32,
    /// Full cone angle in degrees; the half-angle is tested.
    pub fov_degrees: f32,
    /// Scans per second.
    pub scan_rate: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            radius: 15.0,
            fov_degrees: 110.0,
            scan_rate: 5.0,
        }
    }
}

impl SensorConfig {
    pub fn validate(&self) -> Result<(), PerceptionError> {
        if !(self.radius > 0.0) {
            return Err(PerceptionError::InvalidRadius(self.radius));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees <= 360.0) {
            return Err(PerceptionError::InvalidFov(self.fov_degrees));
        }
        if !(self.scan_rate > 0.0) {
            return Err(PerceptionError::InvalidScanRate(self.scan_rate));
        }
        Ok(())
    }

    pub fn half_fov(&self) -> f32 {
        self.fov_degrees * 0.5
    }

    /// Seconds between two scans.
    pub fn scan_period(&self) -> f32 {
        1.0 / self.scan_rate
    }
}

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 3;

/// Priority and base intensity of one kind of noise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoiseProfile {
    /// 1 (footsteps) to 3 (gunfire).
    pub priority: u8,
    pub intensity: f32,
}

impl NoiseProfile {
    pub const fn new(priority: u8, intensity: f32) -> Self {
        Self {
            priority,
            intensity,
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), PerceptionError> {
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(PerceptionError::InvalidPriority(self.priority));
        }
        if !(self.intensity >= 0.0) {
            return Err(PerceptionError::InvalidNoise {
                field,
                value: self.intensity,
            });
        }
        Ok(())
    }
}

/// Noise arbitration tuning shared by every agent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NoiseConfig {
    /// Window after an accepted submission during which only a strictly
    /// higher priority may replace it.
    pub cooldown_seconds: f32,
    pub multiplier: f32,
    pub walk: NoiseProfile,
    pub sprint: NoiseProfile,
    pub crouch: NoiseProfile,
    pub gunshot: NoiseProfile,
    pub land: NoiseProfile,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: 2.0,
            multiplier: 1.0,
            walk: NoiseProfile::new(1, 5.0),
            sprint: NoiseProfile::new(2, 9.0),
            crouch: NoiseProfile::new(1, 2.0),
            gunshot: NoiseProfile::new(3, 20.0),
            land: NoiseProfile::new(2, 7.0),
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<(), PerceptionError> {
        if !(self.cooldown_seconds >= 0.0) {
            return Err(PerceptionError::InvalidNoise {
                field: "cooldown_seconds",
                value: self.cooldown_seconds,
            });
        }
        if !(self.multiplier >= 0.0) {
            return Err(PerceptionError::InvalidNoise {
                field: "multiplier",
                value: self.multiplier,
            });
        }
        self.walk.validate("walk")?;
        self.sprint.validate("sprint")?;
        self.crouch.validate("crouch")?;
        self.gunshot.validate("gunshot")?;
        self.land.validate("land")
    }

    pub fn profile(&self, kind: NoiseKind) -> NoiseProfile {
        match kind {
            NoiseKind::Walk => self.walk,
            NoiseKind::Sprint => self.sprint,
            NoiseKind::Crouch => self.crouch,
            NoiseKind::Gunshot => self.gunshot,
            NoiseKind::Land => self.land,
            NoiseKind::Custom {
                priority,
                intensity,
            } => NoiseProfile::new(priority, intensity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SensorConfig::default().validate(), Ok(()));
        assert_eq!(NoiseConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_sensor() {
        let bad = SensorConfig {
            fov_degrees: 0.0,
            ..SensorConfig::default()
        };
        assert_eq!(bad.validate(), Err(PerceptionError::InvalidFov(0.0)));

        let bad = SensorConfig {
            scan_rate: f32::NAN,
            ..SensorConfig::default()
        };
        assert!(matches!(bad.validate(), Err(PerceptionError::InvalidScanRate(_))));
    }

    #[test]
    fn rejects_out_of_range_priority() {
        let cfg = NoiseConfig {
            gunshot: NoiseProfile::new(4, 20.0),
            ..NoiseConfig::default()
        };
        assert_eq!(cfg.validate(), Err(PerceptionError::InvalidPriority(4)));
    }
}
