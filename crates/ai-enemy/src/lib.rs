//! Enemy AI on top of `ai-bt` and `ai-perception`.
//!
//! The game plugs in through the collaborator traits in [`world`]; this crate
//! owns the per-agent sensors, the shared noise manager, the node library and
//! the [`AiDispatcher`] that ticks all of it once per frame.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod archetypes;
pub mod dispatcher;
pub mod error;
pub mod keys;
pub mod nodes;
pub mod tuning;
pub mod world;

pub use archetypes::{sentry_tree, stalker_tree, BRAIN};
pub use dispatcher::AiDispatcher;
pub use error::EnemyError;
pub use tuning::EnemyTuning;
pub use world::{Animation, Audio, Combat, EnemyWorld, GameFlags, GameWorld, Navigation};
