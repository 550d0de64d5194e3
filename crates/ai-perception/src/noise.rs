use ai_core::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{MAX_PRIORITY, MIN_PRIORITY};
use crate::{NoiseConfig, NoiseProfile, PerceptionError};

/// What produced a noise. Maps to a priority and intensity via [`NoiseConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NoiseKind {
    Walk,
    Sprint,
    Crouch,
    Gunshot,
    Land,
    Custom { priority: u8, intensity: f32 },
}

/// Stance the noise maker moves in; scales every noise it makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MovementMode {
    Crouch,
    #[default]
    Walk,
    Sprint,
}

impl MovementMode {
    pub fn multiplier(self) -> f32 {
        match self {
            MovementMode::Crouch => 0.5,
            MovementMode::Walk => 1.0,
            MovementMode::Sprint => 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoiseEvent {
    pub kind: NoiseKind,
    pub origin: Vec3,
}

impl NoiseEvent {
    pub fn new(kind: NoiseKind, origin: Vec3) -> Self {
        Self { kind, origin }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseVerdict {
    Accepted,
    /// A louder-priority noise is still inside its cooldown window.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Accepted {
    at: f64,
    priority: u8,
}

/// The one noise level every enemy listens to.
///
/// `level = multiplier * intensity`, recomputed only when one of the two
/// changes. A submission replaces the current intensity when no submission
/// was accepted yet, when the cooldown since the last acceptance has passed,
/// or when it outranks the last accepted priority.
#[derive(Debug, Clone)]
pub struct NoiseManager {
    config: NoiseConfig,
    clock: f64,
    multiplier: f32,
    intensity: f32,
    level: f32,
    origin: Option<Vec3>,
    last: Option<Accepted>,
    recomputes: u64,
}

impl Default for NoiseManager {
    fn default() -> Self {
        Self::from_valid(NoiseConfig::default())
    }
}

impl NoiseManager {
    pub fn new(config: NoiseConfig) -> Result<Self, PerceptionError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: NoiseConfig) -> Self {
        let multiplier = config.multiplier;
        Self {
            config,
            clock: 0.0,
            multiplier,
            intensity: 0.0,
            level: 0.0,
            origin: None,
            last: None,
            recomputes: 0,
        }
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Move the arbitration clock forward.
    pub fn advance(&mut self, dt: f32) {
        self.clock += f64::from(dt.max(0.0));
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn submit(&mut self, event: NoiseEvent) -> NoiseVerdict {
        let profile = self.config.profile(event.kind);
        self.arbitrate(profile, Some(event.origin))
    }

    /// Submit without an origin; the previous origin is kept.
    pub fn submit_raw(&mut self, priority: u8, intensity: f32) -> NoiseVerdict {
        self.arbitrate(NoiseProfile::new(priority, intensity), None)
    }

    /// Priorities outside `1..=3` are clamped into it and negative
    /// intensities count as silence.
    fn arbitrate(&mut self, profile: NoiseProfile, origin: Option<Vec3>) -> NoiseVerdict {
        let profile = NoiseProfile::new(
            profile.priority.clamp(MIN_PRIORITY, MAX_PRIORITY),
            profile.intensity.max(0.0),
        );
        let accept = match self.last {
            None => true,
            Some(last) => {
                self.clock - last.at >= f64::from(self.config.cooldown_seconds)
                    || profile.priority > last.priority
            }
        };
        if !accept {
            tracing::trace!(
                priority = profile.priority,
                intensity = profile.intensity,
                "noise rejected"
            );
            return NoiseVerdict::Rejected;
        }

        self.last = Some(Accepted {
            at: self.clock,
            priority: profile.priority,
        });
        if origin.is_some() {
            self.origin = origin;
        }
        if self.intensity != profile.intensity {
            self.intensity = profile.intensity;
            self.recompute();
        }
        tracing::trace!(
            priority = profile.priority,
            intensity = profile.intensity,
            level = self.level,
            "noise accepted"
        );
        NoiseVerdict::Accepted
    }

    pub fn set_multiplier(&mut self, multiplier: f32) {
        let multiplier = multiplier.max(0.0);
        if self.multiplier != multiplier {
            self.multiplier = multiplier;
            self.recompute();
        }
    }

    pub fn set_movement(&mut self, mode: MovementMode) {
        self.set_multiplier(mode.multiplier());
    }

    /// Drop the intensity to zero without touching the arbitration history.
    pub fn silence(&mut self) {
        if self.intensity != 0.0 {
            self.intensity = 0.0;
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        self.level = self.multiplier * self.intensity;
        self.recomputes += 1;
    }

    /// Current audibility radius.
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Where the last accepted positioned noise came from.
    pub fn origin(&self) -> Option<Vec3> {
        self.origin
    }

    pub fn last_priority(&self) -> Option<u8> {
        self.last.map(|l| l.priority)
    }

    /// How many times the level was recomputed.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }
}
