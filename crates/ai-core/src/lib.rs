//! Deterministic, engine-agnostic AI kernel primitives.
//!
//! The pieces here are shared by the behaviour-tree runtime, the perception
//! layer and the enemy node library:
//! - [`NodeState`]: the three-valued result of evaluating a node,
//! - [`Blackboard`]: per-tree hierarchical memory, one segment per node,
//! - [`Vec3`]: the small amount of vector math perception and movement need,
//! - [`TickContext`] and [`SplitMix64`]: per-frame timing and reproducible randomness.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod blackboard;
pub mod math;
pub mod rng;
pub mod state;
pub mod tick;
pub mod world;

pub use agent::{AgentId, EntityId};
pub use blackboard::{BbKey, BbType, BbValue, Blackboard, ScopeId};
pub use math::Vec3;
pub use rng::{DeterministicRng, SplitMix64};
pub use state::NodeState;
pub use tick::TickContext;
pub use world::{WorldMut, WorldView};
