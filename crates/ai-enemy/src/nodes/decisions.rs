use ai_bt::{LeafScope, Node};
use ai_core::{Blackboard, NodeState, TickContext};
use ai_perception::hear;

use crate::keys::{anim, ENTERED_DOOR, LAST_KNOWN_POSITION, NOISE_LEVEL, NOISE_POSITION, TARGET};
use crate::nodes::{distance_to, paused, root_scope};
use crate::{EnemyTuning, EnemyWorld, GameWorld};

/// Sensing: acquire the player on sight, drop them when out of range or hidden.
///
/// - hidden: clears `target` and `lastKnownPosition`, fails.
/// - no target, in sight: publishes `target`, succeeds.
/// - target beyond `max_chase_range`: publishes `lastKnownPosition`, clears
///   `target`, fails.
/// - target in range: succeeds.
pub struct CheckPlayerInSight {
    label: &'static str,
    scope: LeafScope,
    max_chase_range: f32,
}

impl CheckPlayerInSight {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            label: "check_player_in_sight",
            scope: root_scope(),
            max_chase_range: tuning.max_chase_range,
        }
    }

    leaf_builders!();
}

impl<G: GameWorld> Node<EnemyWorld<G>> for CheckPlayerInSight {
    fn evaluate(
        &mut self,
        _ctx: &TickContext,
        agent: G::Agent,
        world: &mut EnemyWorld<G>,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if paused(world) {
            return NodeState::Running;
        }
        let Some(sensor) = world.sensor(agent) else {
            return NodeState::Failure;
        };

        if sensor.hidden() {
            self.scope.retract(blackboard, TARGET);
            self.scope.retract(blackboard, LAST_KNOWN_POSITION);
            return NodeState::Failure;
        }

        let Some(target) = self.scope.get(blackboard, TARGET) else {
            if !sensor.player_in_sight() {
                return NodeState::Failure;
            }
            let Some(target) = sensor.sighted().or_else(|| world.game().player()) else {
                return NodeState::Failure;
            };
            self.scope.publish(blackboard, TARGET, target);
            tracing::debug!(?agent, %target, "target acquired");
            return NodeState::Success;
        };

        let Some(at) = world.game().entity_position(target) else {
            self.scope.retract(blackboard, TARGET);
            return NodeState::Failure;
        };
        match distance_to(world, agent, at) {
            Some(d) if d <= self.max_chase_range => NodeState::Success,
            _ => {
                self.scope.publish(blackboard, LAST_KNOWN_POSITION, at);
                self.scope.retract(blackboard, TARGET);
                tracing::debug!(?agent, %target, "target out of range");
                NodeState::Failure
            }
        }
    }

    leaf_binding!();
}

/// Hearing: succeeds when the shared noise reaches the agent.
///
/// Skipped while a target exists, while the player hides or in no-noise mode.
/// The radius is cached under `noiseLevel` and only recomputed after a failed
/// check.
pub struct CheckNoise {
    label: &'static str,
    scope: LeafScope,
    wall_attenuation: f32,
}

impl CheckNoise {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            label: "check_noise",
            scope: root_scope(),
            wall_attenuation: tuning.wall_attenuation,
        }
    }

    leaf_builders!();
}

impl<G: GameWorld> Node<EnemyWorld<G>> for CheckNoise {
    fn evaluate(
        &mut self,
        _ctx: &TickContext,
        agent: G::Agent,
        world: &mut EnemyWorld<G>,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if paused(world) {
            return NodeState::Running;
        }
        let hidden = world.sensor(agent).is_some_and(|s| s.hidden());
        if self.scope.has(blackboard, TARGET) || hidden || world.game().no_noise_mode() {
            return NodeState::Failure;
        }

        let (Some(source), Some(listener)) = (world.noise().origin(), world.game().position(agent))
        else {
            return NodeState::Failure;
        };
        let level = match self.scope.get(blackboard, NOISE_LEVEL) {
            Some(level) => level,
            None => {
                let level = world.noise().level();
                self.scope.publish(blackboard, NOISE_LEVEL, level);
                level
            }
        };

        let heard = hear(world.game(), listener, source, level, self.wall_attenuation);
        if heard.is_audible() {
            self.scope.publish(blackboard, NOISE_POSITION, source);
            tracing::trace!(?agent, ?heard, "noise heard");
            NodeState::Success
        } else {
            // Retracted twice: a second cached level further up goes as well.
            self.scope.retract(blackboard, NOISE_LEVEL);
            self.scope.retract(blackboard, NOISE_LEVEL);
            NodeState::Failure
        }
    }

    leaf_binding!();
}

/// Succeeds while the target is visible and within `attack_range`; otherwise
/// lowers the attack animation flag and fails.
pub struct CheckTargetInAttackRange {
    label: &'static str,
    scope: LeafScope,
    attack_range: f32,
}

impl CheckTargetInAttackRange {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            label: "check_target_in_attack_range",
            scope: root_scope(),
            attack_range: tuning.attack_range,
        }
    }

    leaf_builders!();
}

impl<G: GameWorld> Node<EnemyWorld<G>> for CheckTargetInAttackRange {
    fn evaluate(
        &mut self,
        _ctx: &TickContext,
        agent: G::Agent,
        world: &mut EnemyWorld<G>,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if paused(world) {
            return NodeState::Running;
        }
        let hidden = world.sensor(agent).is_some_and(|s| s.hidden());
        let in_range = !world.game().no_attack_mode()
            && !hidden
            && self
                .scope
                .get(blackboard, TARGET)
                .and_then(|t| world.game().entity_position(t))
                .and_then(|at| distance_to(world, agent, at))
                .is_some_and(|d| d <= self.attack_range);
        if !in_range {
            world.game_mut().set_flag(agent, anim::ATTACK, false);
        }
        NodeState::from_bool(in_range)
    }

    leaf_binding!();
}

/// Succeeds while a last known position is remembered and the player is
/// neither in sight nor hidden; those two cases forget it and fail.
pub struct CheckLastKnownPosition {
    label: &'static str,
    scope: LeafScope,
}

impl CheckLastKnownPosition {
    pub fn new() -> Self {
        Self {
            label: "check_last_known_position",
            scope: root_scope(),
        }
    }

    leaf_builders!();
}

impl Default for CheckLastKnownPosition {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GameWorld> Node<EnemyWorld<G>> for CheckLastKnownPosition {
    fn evaluate(
        &mut self,
        _ctx: &TickContext,
        agent: G::Agent,
        world: &mut EnemyWorld<G>,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if paused(world) {
            return NodeState::Running;
        }
        let (in_sight, hidden) = world
            .sensor(agent)
            .map(|s| (s.player_in_sight(), s.hidden()))
            .unwrap_or((false, false));
        if in_sight || hidden {
            self.scope.retract(blackboard, LAST_KNOWN_POSITION);
            return NodeState::Failure;
        }
        NodeState::from_bool(self.scope.has(blackboard, LAST_KNOWN_POSITION))
    }

    leaf_binding!();
}

/// Succeeds once per hit: consumes the game's shot flag and turns the
/// player into the target.
pub struct CheckIsShot {
    label: &'static str,
    scope: LeafScope,
}

impl CheckIsShot {
    pub fn new() -> Self {
        Self {
            label: "check_is_shot",
            scope: root_scope(),
        }
    }

    leaf_builders!();
}

impl Default for CheckIsShot {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GameWorld> Node<EnemyWorld<G>> for CheckIsShot {
    fn evaluate(
        &mut self,
        _ctx: &TickContext,
        agent: G::Agent,
        world: &mut EnemyWorld<G>,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if paused(world) {
            return NodeState::Running;
        }
        if !world.game().is_shot(agent) {
            return NodeState::Failure;
        }
        world.game_mut().clear_shot(agent);
        if let Some(player) = world.game().player() {
            self.scope.publish(blackboard, TARGET, player);
        }
        tracing::debug!(?agent, "shot by player");
        NodeState::Success
    }

    leaf_binding!();
}

/// Succeeds while the agent is in a scripted door transition, and once more
/// afterwards so the hold can restore navigation.
pub struct CheckDoorTransition {
    label: &'static str,
    scope: LeafScope,
}

impl CheckDoorTransition {
    pub fn new() -> Self {
        Self {
            label: "check_door_transition",
            scope: root_scope(),
        }
    }

    leaf_builders!();
}

impl Default for CheckDoorTransition {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GameWorld> Node<EnemyWorld<G>> for CheckDoorTransition {
    fn evaluate(
        &mut self,
        _ctx: &TickContext,
        agent: G::Agent,
        world: &mut EnemyWorld<G>,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if paused(world) {
            return NodeState::Running;
        }
        if world.game().in_door_transition(agent) {
            if !self.scope.has(blackboard, ENTERED_DOOR) {
                self.scope.publish(blackboard, ENTERED_DOOR, true);
            }
            return NodeState::Success;
        }
        NodeState::from_bool(self.scope.has(blackboard, ENTERED_DOOR))
    }

    leaf_binding!();
}
