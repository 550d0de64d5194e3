//! Perception for enemy agents.
//!
//! - [`AiSensor`]: periodic proximity query, field-of-view cone and occlusion
//!   line-cast producing a `player_in_sight` flag, with pause/resume and a
//!   timed forced-sight override.
//! - [`NoiseManager`]: the single shared noise level, arbitrated by priority
//!   and a cooldown window.
//! - [`hearing`]: whether a listener hears a noise of a given radius, with
//!   attenuation through walls.
//!
//! All of it is driven from the game loop's single thread. The world is reached
//! through [`PerceptionQuery`], so no engine types leak in.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod hearing;
pub mod noise;
pub mod query;
pub mod sensor;

pub use config::{NoiseConfig, NoiseProfile, SensorConfig, MAX_PRIORITY, MIN_PRIORITY};
pub use error::PerceptionError;
pub use hearing::{audible, hear, Hearing, WALL_ATTENUATION};
pub use noise::{MovementMode, NoiseEvent, NoiseKind, NoiseManager, NoiseVerdict};
pub use query::{Detectable, DetectableKind, HeadPose, PerceptionQuery};
pub use sensor::AiSensor;
