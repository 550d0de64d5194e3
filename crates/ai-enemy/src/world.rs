//! Seams between the enemy AI and the host game.
//!
//! The game implements the collaborator traits; [`EnemyWorld`] wraps it
//! together with the state perception owns, and is the world type every
//! enemy tree evaluates against.

use ai_core::{EntityId, Vec3, WorldMut, WorldView};
use ai_perception::{AiSensor, NoiseManager, PerceptionQuery};

/// Global gameplay and debug gates.
pub trait GameFlags {
    fn is_paused(&self) -> bool;

    fn no_noise_mode(&self) -> bool {
        false
    }

    fn no_attack_mode(&self) -> bool {
        false
    }
}

/// Navigation actuator. Nodes only ever set destinations and speeds; path
/// planning stays inside the game.
pub trait Navigation: WorldView {
    fn position(&self, agent: Self::Agent) -> Option<Vec3>;

    fn destination(&self, agent: Self::Agent) -> Option<Vec3>;

    fn set_destination(&mut self, agent: Self::Agent, point: Vec3);

    fn speed(&self, agent: Self::Agent) -> f32;

    fn set_speed(&mut self, agent: Self::Agent, speed: f32);

    fn set_stopped(&mut self, agent: Self::Agent, stopped: bool);

    fn face_towards(&mut self, _agent: Self::Agent, _point: Vec3) {}
}

/// Fire-and-forget animation parameters.
pub trait Animation: WorldView {
    fn set_flag(&mut self, agent: Self::Agent, name: &'static str, value: bool);

    fn trigger(&mut self, agent: Self::Agent, name: &'static str);
}

pub trait Combat: WorldView {
    /// Apply damage; returns `true` if `target` died from it.
    fn damage(&mut self, target: EntityId, amount: f32) -> bool;

    fn is_shot(&self, agent: Self::Agent) -> bool;

    fn clear_shot(&mut self, agent: Self::Agent);
}

pub trait Audio: WorldView {
    fn play_clip(&mut self, _agent: Self::Agent, _clip: &'static str) {}
}

/// Everything the enemy node library needs from the game.
pub trait GameWorld:
    PerceptionQuery + GameFlags + Navigation + Animation + Combat + Audio + WorldMut + 'static
{
    fn player(&self) -> Option<EntityId>;

    fn entity_position(&self, entity: EntityId) -> Option<Vec3>;

    fn is_player_hidden(&self) -> bool {
        false
    }

    /// `true` while a scripted door sequence moves `agent`.
    fn in_door_transition(&self, _agent: Self::Agent) -> bool {
        false
    }
}

/// The game plus the perception state the AI owns.
pub struct EnemyWorld<G>
where
    G: GameWorld,
{
    game: G,
    sensors: Vec<(G::Agent, AiSensor)>,
    noise: NoiseManager,
}

impl<G> EnemyWorld<G>
where
    G: GameWorld,
{
    pub fn new(game: G, noise: NoiseManager) -> Self {
        Self {
            game,
            sensors: Vec::new(),
            noise,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn noise(&self) -> &NoiseManager {
        &self.noise
    }

    pub fn noise_mut(&mut self) -> &mut NoiseManager {
        &mut self.noise
    }

    pub fn sensor(&self, agent: G::Agent) -> Option<&AiSensor> {
        self.sensors
            .iter()
            .find(|(a, _)| *a == agent)
            .map(|(_, s)| s)
    }

    pub fn sensor_mut(&mut self, agent: G::Agent) -> Option<&mut AiSensor> {
        self.sensors
            .iter_mut()
            .find(|(a, _)| *a == agent)
            .map(|(_, s)| s)
    }

    /// Sensors in registration order.
    pub fn sensors(&self) -> impl Iterator<Item = (G::Agent, &AiSensor)> + '_ {
        self.sensors.iter().map(|(a, s)| (*a, s))
    }

    /// Attach a sensor to `agent`, replacing any it already had.
    pub fn add_sensor(&mut self, agent: G::Agent, sensor: AiSensor) {
        match self.sensor_mut(agent) {
            Some(existing) => *existing = sensor,
            None => self.sensors.push((agent, sensor)),
        }
    }

    pub(crate) fn remove_sensor(&mut self, agent: G::Agent) -> Option<AiSensor> {
        let index = self.sensors.iter().position(|(a, _)| *a == agent)?;
        Some(self.sensors.remove(index).1)
    }

    /// Push the game's hidden flag into every sensor, then tick them in
    /// registration order. Paused sensors are left untouched.
    pub fn tick_sensors(&mut self, dt: f32) {
        let hidden = self.game.is_player_hidden();
        for (agent, sensor) in self.sensors.iter_mut() {
            if sensor.is_paused() {
                continue;
            }
            sensor.set_hidden(hidden);
            sensor.tick(dt, &self.game, *agent);
        }
    }

    pub fn pause_sensors(&mut self) {
        for (_, sensor) in self.sensors.iter_mut() {
            sensor.pause();
        }
    }

    pub fn resume_sensors(&mut self) {
        for (_, sensor) in self.sensors.iter_mut() {
            sensor.resume();
        }
    }

    pub fn into_game(self) -> G {
        self.game
    }
}

impl<G> WorldView for EnemyWorld<G>
where
    G: GameWorld,
{
    type Agent = G::Agent;
}

impl<G> WorldMut for EnemyWorld<G> where G: GameWorld {}
