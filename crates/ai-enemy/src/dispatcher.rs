use ai_bt::{Node, Tree};
use ai_core::{AgentId, NodeState, TickContext};
use ai_perception::{AiSensor, NoiseManager, SensorConfig};

use crate::{EnemyError, EnemyWorld, GameWorld};

struct Slot<G>
where
    G: GameWorld,
{
    agent: G::Agent,
    tree: Tree<EnemyWorld<G>>,
}

/// Per-frame driver for every enemy.
///
/// Each [`AiDispatcher::tick`] advances the noise clock, ticks every sensor in
/// registration order, then evaluates every tree in registration order.
/// Removing an agent is the only way to stop its tree.
pub struct AiDispatcher<G>
where
    G: GameWorld,
{
    world: EnemyWorld<G>,
    slots: Vec<Slot<G>>,
    tick: u64,
    seed: u64,
    paused: bool,
}

impl<G> AiDispatcher<G>
where
    G: GameWorld,
{
    pub fn new(game: G, noise: NoiseManager, seed: u64) -> Self {
        Self {
            world: EnemyWorld::new(game, noise),
            slots: Vec::new(),
            tick: 0,
            seed,
            paused: false,
        }
    }

    /// Give `agent` a sensor and a tree.
    ///
    /// Fails when the agent is already registered, its rig has no head
    /// reference, or the sensor config is invalid.
    pub fn register(
        &mut self,
        agent: G::Agent,
        sensor: SensorConfig,
        tree: Tree<EnemyWorld<G>>,
    ) -> Result<(), EnemyError> {
        if self.contains(agent) {
            return Err(EnemyError::DuplicateAgent(agent.stable_id()));
        }
        AiSensor::check_rig(self.world.game(), agent)?;
        let mut sensor = AiSensor::new(sensor)?;
        if self.paused {
            sensor.pause();
        }
        self.world.add_sensor(agent, sensor);
        self.slots.push(Slot { agent, tree });
        tracing::info!(agent = agent.stable_id(), "enemy registered");
        Ok(())
    }

    /// Build a tree from `root` and register it.
    pub fn register_root(
        &mut self,
        agent: G::Agent,
        sensor: SensorConfig,
        root: Box<dyn Node<EnemyWorld<G>>>,
    ) -> Result<(), EnemyError> {
        let tree = Tree::new(root)?;
        self.register(agent, sensor, tree)
    }

    /// Stop ticking `agent`. Actuator cleanup is left to the caller.
    pub fn remove(&mut self, agent: G::Agent) -> Option<Tree<EnemyWorld<G>>> {
        let index = self.slots.iter().position(|s| s.agent == agent)?;
        self.world.remove_sensor(agent);
        let slot = self.slots.remove(index);
        tracing::info!(agent = agent.stable_id(), "enemy removed");
        Some(slot.tree)
    }

    pub fn tick(&mut self, dt: f32) -> u64 {
        let ctx = TickContext::new(self.tick, dt, self.seed);
        self.sync_pause();
        // The arbitration cooldown is game time; it stands still while paused.
        if !self.paused {
            self.world.noise_mut().advance(ctx.dt());
        }
        self.world.tick_sensors(ctx.dt());
        for slot in self.slots.iter_mut() {
            slot.tree.evaluate(&ctx, slot.agent, &mut self.world);
        }
        self.tick += 1;
        self.tick
    }

    fn sync_pause(&mut self) {
        let paused = self.world.game().is_paused();
        if paused == self.paused {
            return;
        }
        self.paused = paused;
        if paused {
            self.world.pause_sensors();
        } else {
            self.world.resume_sensors();
        }
        tracing::debug!(paused, "game pause changed");
    }

    /// Clear every tree's blackboard and node counters (save/load, respawn).
    pub fn reset_all(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.tree.reset();
        }
    }

    pub fn contains(&self, agent: G::Agent) -> bool {
        self.slots.iter().any(|s| s.agent == agent)
    }

    /// Agents in registration order.
    pub fn agents(&self) -> impl Iterator<Item = G::Agent> + '_ {
        self.slots.iter().map(|s| s.agent)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn tree(&self, agent: G::Agent) -> Option<&Tree<EnemyWorld<G>>> {
        self.slots.iter().find(|s| s.agent == agent).map(|s| &s.tree)
    }

    pub fn tree_mut(&mut self, agent: G::Agent) -> Option<&mut Tree<EnemyWorld<G>>> {
        self.slots
            .iter_mut()
            .find(|s| s.agent == agent)
            .map(|s| &mut s.tree)
    }

    pub fn status(&self, agent: G::Agent) -> Option<NodeState> {
        self.tree(agent)?.last_status()
    }

    pub fn world(&self) -> &EnemyWorld<G> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut EnemyWorld<G> {
        &mut self.world
    }

    pub fn game(&self) -> &G {
        self.world.game()
    }

    pub fn game_mut(&mut self) -> &mut G {
        self.world.game_mut()
    }
}
