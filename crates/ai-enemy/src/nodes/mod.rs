//! Enemy node library.
//!
//! Every leaf checks the game's pause flag first and answers `Running`
//! without touching timers, the blackboard or actuators, so a paused frame
//! leaves the tree exactly as it was.
//!
//! Leaves that publish facts for other branches do so into the scope chosen
//! by [`ScopeSelector`]; the default is the archetype root ([`BRAIN`]).

use ai_bt::{LeafScope, ScopeSelector};
use ai_core::Vec3;

use crate::{EnemyWorld, GameWorld, BRAIN};

macro_rules! leaf_builders {
    () => {
        pub fn named(mut self, label: &'static str) -> Self {
            self.label = label;
            self
        }

        /// Publish into `selector` instead of the archetype root.
        pub fn publish_to(mut self, selector: ai_bt::ScopeSelector) -> Self {
            self.scope = ai_bt::LeafScope::new(selector);
            self
        }
    };
}

macro_rules! leaf_binding {
    () => {
        fn attach(
            &mut self,
            scope: ai_core::ScopeId,
            blackboard: &mut ai_core::Blackboard,
        ) -> Result<(), ai_bt::TreeError> {
            self.scope.attach(self.label, scope, blackboard)
        }

        fn label(&self) -> &'static str {
            self.label
        }
    };
}

mod actions;
mod decisions;

pub use actions::{
    Attack, ChaseTarget, GoToLastKnownPosition, GoToTarget, HoldForDoor, InvestigateNoise, Patrol,
};
pub use decisions::{
    CheckDoorTransition, CheckIsShot, CheckLastKnownPosition, CheckNoise, CheckPlayerInSight,
    CheckTargetInAttackRange,
};

fn root_scope() -> LeafScope {
    LeafScope::new(ScopeSelector::Named(BRAIN))
}

fn paused<G: GameWorld>(world: &EnemyWorld<G>) -> bool {
    world.game().is_paused()
}

fn distance_to<G: GameWorld>(world: &EnemyWorld<G>, agent: G::Agent, point: Vec3) -> Option<f32> {
    world.game().position(agent).map(|p| p.distance(point))
}
