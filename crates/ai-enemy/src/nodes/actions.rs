use ai_bt::{LeafScope, Node};
use ai_core::{Blackboard, DeterministicRng, NodeState, TickContext, Vec3};

use crate::keys::{
    anim, DESTINATION, ENTERED_DOOR, LAST_KNOWN_POSITION, NOISE_LEVEL, NOISE_POSITION, SPEED,
    TARGET,
};
use crate::nodes::{distance_to, paused, root_scope};
use crate::{EnemyTuning, EnemyWorld, GameWorld};

const ATTACK_SIDE_STREAM: u64 = 0xA77A_C4;

/// Run at the target for up to `chase_duration` seconds, then drop it so the
/// sensing branch re-evaluates from scratch.
pub struct ChaseTarget {
    label: &'static str,
    scope: LeafScope,
    duration: f32,
    speed: f32,
    elapsed: f32,
}

impl ChaseTarget {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            label: "chase_target",
            scope: root_scope(),
            duration: tuning.chase_duration,
            speed: tuning.run_speed,
            elapsed: 0.0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    leaf_builders!();
}

impl<G: GameWorld> Node<EnemyWorld<G>> for ChaseTarget {
    fn evaluate(
        &mut self,
        ctx: &TickContext,
        agent: G::Agent,
        world: &mut EnemyWorld<G>,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if paused(world) {
            return NodeState::Running;
        }
        let Some(at) = self
            .scope
            .get(blackboard, TARGET)
            .and_then(|t| world.game().entity_position(t))
        else {
            self.elapsed = 0.0;
            return NodeState::Failure;
        };

        let game = world.game_mut();
        game.set_stopped(agent, false);
        game.set_speed(agent, self.speed);
        game.set_destination(agent, at);
        game.set_flag(agent, anim::RUN, true);

        self.elapsed += ctx.dt();
        if self.elapsed > self.duration {
            self.scope.retract(blackboard, TARGET);
            self.elapsed = 0.0;
            game.set_flag(agent, anim::RUN, false);
            tracing::debug!(?agent, "chase timed out");
            return NodeState::Success;
        }
        NodeState::Running
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Losing the sighting ends the chase; the next one starts a fresh timer.
    fn halt(&mut self) {
        self.elapsed = 0.0;
    }

    leaf_binding!();
}

/// Close in on the target; succeeds on arrival.
pub struct GoToTarget {
    label: &'static str,
    scope: LeafScope,
    speed: f32,
    arrival: f32,
}

impl GoToTarget {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            label: "go_to_target",
            scope: root_scope(),
            speed: tuning.run_speed,
            arrival: tuning.arrival_distance,
        }
    }

    leaf_builders!();
}

impl<G: GameWorld> Node<EnemyWorld<G>> for GoToTarget {
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
        let Some(at) = self
            .scope
            .get(blackboard, TARGET)
            .and_then(|t| world.game().entity_position(t))
        else {
            return NodeState::Failure;
        };
        move_towards(world, agent, at, self.speed, self.arrival, anim::RUN)
    }

    leaf_binding!();
}

/// Walk to the remembered position; forgets it on arrival and succeeds.
pub struct GoToLastKnownPosition {
    label: &'static str,
    scope: LeafScope,
    speed: f32,
    arrival: f32,
}

impl GoToLastKnownPosition {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            label: "go_to_last_known_position",
            scope: root_scope(),
            speed: tuning.walk_speed,
            arrival: tuning.arrival_distance,
        }
    }

    leaf_builders!();
}

impl<G: GameWorld> Node<EnemyWorld<G>> for GoToLastKnownPosition {
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
        let Some(at) = self.scope.get(blackboard, LAST_KNOWN_POSITION) else {
            return NodeState::Failure;
        };
        let state = move_towards(world, agent, at, self.speed, self.arrival, anim::WALK);
        if state.is_success() {
            self.scope.retract(blackboard, LAST_KNOWN_POSITION);
        }
        state
    }

    leaf_binding!();
}

fn move_towards<G: GameWorld>(
    world: &mut EnemyWorld<G>,
    agent: G::Agent,
    at: Vec3,
    speed: f32,
    arrival: f32,
    gait: &'static str,
) -> NodeState {
    let Some(d) = distance_to(world, agent, at) else {
        return NodeState::Failure;
    };
    let game = world.game_mut();
    if d <= arrival {
        game.set_flag(agent, gait, false);
        return NodeState::Success;
    }
    game.set_stopped(agent, false);
    game.set_speed(agent, speed);
    game.set_destination(agent, at);
    game.set_flag(agent, gait, true);
    NodeState::Running
}

/// Cycle through waypoints, dwelling at each. Never succeeds: on sight it
/// publishes the target and fails so a higher branch takes over.
///
/// With no waypoints the agent stands where it is.
pub struct Patrol {
    label: &'static str,
    scope: LeafScope,
    waypoints: Vec<Vec3>,
    index: usize,
    dwell: f32,
    dwell_for: f32,
    speed: f32,
    arrival: f32,
}

impl Patrol {
    pub fn new(tuning: &EnemyTuning, waypoints: Vec<Vec3>) -> Self {
        Self {
            label: "patrol",
            scope: root_scope(),
            waypoints,
            index: 0,
            dwell: 0.0,
            dwell_for: tuning.patrol_dwell,
            speed: tuning.walk_speed,
            arrival: tuning.arrival_distance,
        }
    }

    /// Index of the waypoint currently headed to.
    pub fn current(&self) -> usize {
        self.index
    }

    leaf_builders!();
}

impl<G: GameWorld> Node<EnemyWorld<G>> for Patrol {
    fn evaluate(
        &mut self,
        ctx: &TickContext,
        agent: G::Agent,
        world: &mut EnemyWorld<G>,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if paused(world) {
            return NodeState::Running;
        }
        if let Some(sensor) = world.sensor(agent) {
            if sensor.player_in_sight() {
                if let Some(target) = sensor.sighted().or_else(|| world.game().player()) {
                    self.scope.publish(blackboard, TARGET, target);
                    tracing::debug!(?agent, %target, "spotted on patrol");
                }
                return NodeState::Failure;
            }
        }

        let Some(&waypoint) = self.waypoints.get(self.index) else {
            return NodeState::Running;
        };
        let Some(d) = distance_to(world, agent, waypoint) else {
            return NodeState::Failure;
        };

        let game = world.game_mut();
        if d > self.arrival {
            game.set_stopped(agent, false);
            game.set_speed(agent, self.speed);
            game.set_destination(agent, waypoint);
            game.set_flag(agent, anim::WALK, true);
            return NodeState::Running;
        }

        game.set_flag(agent, anim::WALK, false);
        self.dwell += ctx.dt();
        if self.dwell >= self.dwell_for {
            self.dwell = 0.0;
            self.index = (self.index + 1) % self.waypoints.len();
            game.set_destination(agent, self.waypoints[self.index]);
            game.set_flag(agent, anim::WALK, true);
        }
        NodeState::Running
    }

    fn reset(&mut self) {
        self.index = 0;
        self.dwell = 0.0;
    }

    leaf_binding!();
}

/// Strike the target every `attack_interval` seconds from a random side.
/// Succeeds only when a strike kills.
pub struct Attack {
    label: &'static str,
    scope: LeafScope,
    interval: f32,
    damage: f32,
    elapsed: f32,
}

impl Attack {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            label: "attack",
            scope: root_scope(),
            interval: tuning.attack_interval,
            damage: tuning.attack_damage,
            elapsed: 0.0,
        }
    }

    leaf_builders!();
}

impl<G: GameWorld> Node<EnemyWorld<G>> for Attack {
    fn evaluate(
        &mut self,
        ctx: &TickContext,
        agent: G::Agent,
        world: &mut EnemyWorld<G>,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if paused(world) {
            return NodeState::Running;
        }
        let Some(target) = self.scope.get(blackboard, TARGET) else {
            self.elapsed = 0.0;
            return NodeState::Failure;
        };
        let at = world.game().entity_position(target);
        let game = world.game_mut();
        if let Some(at) = at {
            game.face_towards(agent, at);
        }
        game.set_stopped(agent, true);

        self.elapsed += ctx.dt();
        if self.elapsed < self.interval {
            return NodeState::Running;
        }
        self.elapsed = 0.0;

        let mut rng = ctx.rng_for_agent(agent, ATTACK_SIDE_STREAM);
        let side = if rng.next_bool() {
            anim::ATTACK_LEFT
        } else {
            anim::ATTACK_RIGHT
        };
        game.set_flag(agent, anim::ATTACK, true);
        game.trigger(agent, side);

        if game.damage(target, self.damage) {
            tracing::info!(?agent, %target, "target killed");
            game.set_flag(agent, anim::ATTACK, false);
            self.scope.retract(blackboard, TARGET);
            return NodeState::Success;
        }
        NodeState::Running
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Out of range or out of sight: the next engagement waits a full interval.
    fn halt(&mut self) {
        self.elapsed = 0.0;
    }

    leaf_binding!();
}

/// Walk to the heard noise, look around for `noise_dwell` seconds, then forget
/// it. An agent that cannot reach the spot within `stuck_threshold` seconds
/// starts looking around where it is.
pub struct InvestigateNoise {
    label: &'static str,
    scope: LeafScope,
    dwell_for: f32,
    stuck_after: f32,
    speed: f32,
    arrival: f32,
    dwell: f32,
    travel: f32,
}

impl InvestigateNoise {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            label: "investigate_noise",
            scope: root_scope(),
            dwell_for: tuning.noise_dwell,
            stuck_after: tuning.stuck_threshold,
            speed: tuning.walk_speed,
            arrival: tuning.arrival_distance,
            dwell: 0.0,
            travel: 0.0,
        }
    }

    leaf_builders!();

    fn clear_counters(&mut self) {
        self.dwell = 0.0;
        self.travel = 0.0;
    }
}

impl<G: GameWorld> Node<EnemyWorld<G>> for InvestigateNoise {
    fn evaluate(
        &mut self,
        ctx: &TickContext,
        agent: G::Agent,
        world: &mut EnemyWorld<G>,
        blackboard: &mut Blackboard,
    ) -> NodeState {
        if paused(world) {
            return NodeState::Running;
        }
        let Some(at) = self.scope.get(blackboard, NOISE_POSITION) else {
            self.clear_counters();
            return NodeState::Failure;
        };
        let Some(d) = distance_to(world, agent, at) else {
            return NodeState::Failure;
        };
        let dt = ctx.dt();
        let game = world.game_mut();

        let arrived = d <= self.arrival;
        if !arrived && self.travel < self.stuck_after {
            self.travel += dt;
            game.set_stopped(agent, false);
            game.set_speed(agent, self.speed);
            game.set_destination(agent, at);
            game.set_flag(agent, anim::WALK, true);
            return NodeState::Running;
        }

        if !arrived && self.dwell == 0.0 {
            tracing::warn!(?agent, distance = d, "noise unreachable, searching from here");
        }
        game.set_stopped(agent, true);
        game.set_flag(agent, anim::WALK, false);
        self.dwell += dt;
        if self.dwell < self.dwell_for {
            return NodeState::Running;
        }

        self.scope.retract(blackboard, NOISE_POSITION);
        self.scope.retract(blackboard, NOISE_LEVEL);
        self.clear_counters();
        game.set_stopped(agent, false);
        NodeState::Success
    }

    fn reset(&mut self) {
        self.clear_counters();
    }

    leaf_binding!();
}

/// Freeze navigation for the length of a scripted door transition.
///
/// Saves `destination` and `speed` in its own segment on the first held tick
/// and puts them back once the transition is over.
pub struct HoldForDoor {
    label: &'static str,
    scope: LeafScope,
}

impl HoldForDoor {
    pub fn new() -> Self {
        Self {
            label: "hold_for_door",
            scope: root_scope(),
        }
    }

    leaf_builders!();
}

impl Default for HoldForDoor {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GameWorld> Node<EnemyWorld<G>> for HoldForDoor {
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
        let own = self.scope.own();
        if world.game().in_door_transition(agent) {
            if blackboard.get_local(own, SPEED).is_none() {
                let game = world.game();
                if let Some(dest) = game.destination(agent) {
                    blackboard.set(own, DESTINATION, dest);
                }
                blackboard.set(own, SPEED, game.speed(agent));
                world.game_mut().set_stopped(agent, true);
            }
            return NodeState::Running;
        }

        let game = world.game_mut();
        if let Some(speed) = blackboard.clear_local(own, SPEED) {
            game.set_speed(agent, speed);
        }
        if let Some(dest) = blackboard.clear_local(own, DESTINATION) {
            game.set_destination(agent, dest);
        }
        game.set_stopped(agent, false);
        self.scope.retract(blackboard, ENTERED_DOOR);
        NodeState::Success
    }

    leaf_binding!();
}
