use ai_core::{EntityId, Vec3, WorldView};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tag carried by everything the proximity query can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DetectableKind {
    Player,
    Enemy,
    Prop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Detectable {
    pub entity: EntityId,
    pub kind: DetectableKind,
    pub position: Vec3,
    /// Point the occlusion cast aims at (the player's camera root).
    pub sight_point: Vec3,
}

/// Where an agent looks from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeadPose {
    pub position: Vec3,
    pub forward: Vec3,
}

/// Geometry queries perception needs from the host world.
pub trait PerceptionQuery: WorldView {
    /// Head reference of `agent`, or `None` if the rig lacks one.
    fn head_pose(&self, agent: Self::Agent) -> Option<HeadPose>;

    /// Every detectable collider within `radius` of `center`.
    fn overlap_detectable(&self, center: Vec3, radius: f32) -> Vec<Detectable>;

    /// Occlusion cast against level geometry.
    ///
    /// Returns the first hit, or `None` when the segment is unobstructed. A cast
    /// that hits nothing is a normal outcome, not an error.
    fn linecast(&self, from: Vec3, to: Vec3) -> Option<Vec3>;
}
