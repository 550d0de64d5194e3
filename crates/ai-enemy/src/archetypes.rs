//! Reference trees.
//!
//! Branch order is priority order: a door transition outranks attacking,
//! which outranks chasing, searching, listening and finally patrolling.

use ai_bt::{selector, sequence, Node};
use ai_core::Vec3;

use crate::nodes::{
    Attack, ChaseTarget, CheckDoorTransition, CheckIsShot, CheckLastKnownPosition, CheckNoise,
    CheckPlayerInSight, CheckTargetInAttackRange, GoToLastKnownPosition, GoToTarget, HoldForDoor,
    InvestigateNoise, Patrol,
};
use crate::{EnemyTuning, EnemyWorld, GameWorld};

/// Label of every archetype's root selector; leaves publish there by default.
pub const BRAIN: &str = "brain";

type Boxed<G> = Box<dyn Node<EnemyWorld<G>>>;

fn boxed<G, N>(node: N) -> Boxed<G>
where
    G: GameWorld,
    N: Node<EnemyWorld<G>>,
{
    Box::new(node)
}

/// Full hunter: patrols `waypoints`, listens, chases, searches and attacks.
pub fn stalker_tree<G: GameWorld>(tuning: &EnemyTuning, waypoints: Vec<Vec3>) -> Boxed<G> {
    selector(
        BRAIN,
        vec![
            sequence(
                "door",
                vec![boxed(CheckDoorTransition::new()), boxed(HoldForDoor::new())],
            ),
            sequence(
                "attack",
                vec![
                    boxed(CheckTargetInAttackRange::new(tuning)),
                    boxed(Attack::new(tuning)),
                ],
            ),
            sequence(
                "retaliate",
                vec![boxed(CheckIsShot::new()), boxed(GoToTarget::new(tuning))],
            ),
            sequence(
                "chase",
                vec![
                    boxed(CheckPlayerInSight::new(tuning)),
                    boxed(ChaseTarget::new(tuning)),
                ],
            ),
            sequence(
                "search",
                vec![
                    boxed(CheckLastKnownPosition::new()),
                    boxed(GoToLastKnownPosition::new(tuning)),
                ],
            ),
            sequence(
                "noise",
                vec![
                    boxed(CheckNoise::new(tuning)),
                    boxed(InvestigateNoise::new(tuning)),
                ],
            ),
            boxed(Patrol::new(tuning, waypoints)),
        ],
    )
}

/// Stationary guard: never patrols or searches, but still hears, chases and
/// attacks.
pub fn sentry_tree<G: GameWorld>(tuning: &EnemyTuning) -> Boxed<G> {
    selector(
        BRAIN,
        vec![
            sequence(
                "attack",
                vec![
                    boxed(CheckTargetInAttackRange::new(tuning)),
                    boxed(Attack::new(tuning)),
                ],
            ),
            sequence(
                "chase",
                vec![
                    boxed(CheckPlayerInSight::new(tuning)),
                    boxed(ChaseTarget::new(tuning)),
                ],
            ),
            sequence(
                "noise",
                vec![
                    boxed(CheckNoise::new(tuning)),
                    boxed(InvestigateNoise::new(tuning)),
                ],
            ),
            boxed(Patrol::new(tuning, Vec::new()).named("guard")),
        ],
    )
}
