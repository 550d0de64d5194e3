//! Blackboard keys shared by the enemy node library.
//!
//! A key's value type is fixed here, so every node that touches `target`
//! agrees it holds an [`EntityId`].

use ai_core::{BbKey, EntityId, Vec3};

/// The sensed player.
pub const TARGET: BbKey<EntityId> = BbKey::new("target");
/// Where the target was when it got away.
pub const LAST_KNOWN_POSITION: BbKey<Vec3> = BbKey::new("lastKnownPosition");
pub const NOISE_POSITION: BbKey<Vec3> = BbKey::new("noisePosition");
/// Cached audibility radius, recomputed once it fails to reach the agent.
pub const NOISE_LEVEL: BbKey<f32> = BbKey::new("noiseLevel");
/// Set while a scripted door transition holds the agent.
pub const ENTERED_DOOR: BbKey<bool> = BbKey::new("enteredDoor");
/// Navigation state saved around a temporary override.
pub const DESTINATION: BbKey<Vec3> = BbKey::new("destination");
pub const SPEED: BbKey<f32> = BbKey::new("speed");

/// Animation parameters driven by the node library.
pub mod anim {
    pub const WALK: &str = "walk";
    pub const RUN: &str = "run";
    pub const ATTACK: &str = "attack";
    pub const ATTACK_LEFT: &str = "attackLeft";
    pub const ATTACK_RIGHT: &str = "attackRight";
}
