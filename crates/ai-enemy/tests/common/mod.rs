#![allow(dead_code)]

use std::collections::BTreeMap;

use ai_core::{BbValue, Blackboard, EntityId, ScopeId, Vec3, WorldMut, WorldView};
use ai_enemy::{
    stalker_tree, AiDispatcher, Animation, Audio, Combat, EnemyTuning, GameFlags, GameWorld,
    Navigation,
};
use ai_perception::{Detectable, DetectableKind, HeadPose, NoiseManager, PerceptionQuery, SensorConfig};

pub const PLAYER: EntityId = EntityId(100);
pub const ENEMY: u64 = 1;
pub const DT: f32 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct Body {
    pub position: Vec3,
    pub forward: Vec3,
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub stopped: bool,
    pub flags: BTreeMap<&'static str, bool>,
    pub triggers: Vec<&'static str>,
    pub shot: bool,
    pub door: bool,
}

/// Scripted game: bodies never move unless a test moves them.
#[derive(Debug, Clone)]
pub struct Arena {
    pub bodies: BTreeMap<u64, Body>,
    pub player_pos: Vec3,
    pub player_hp: f32,
    pub player_hidden: bool,
    pub wall: bool,
    pub paused: bool,
    pub no_noise: bool,
    pub no_attack: bool,
}

impl Arena {
    pub fn new(player_pos: Vec3) -> Self {
        let mut bodies = BTreeMap::new();
        bodies.insert(
            ENEMY,
            Body {
                forward: Vec3::Z,
                ..Body::default()
            },
        );
        Self {
            bodies,
            player_pos,
            player_hp: 100.0,
            player_hidden: false,
            wall: false,
            paused: false,
            no_noise: false,
            no_attack: false,
        }
    }

    pub fn body(&self, agent: u64) -> &Body {
        &self.bodies[&agent]
    }

    pub fn body_mut(&mut self, agent: u64) -> &mut Body {
        self.bodies.get_mut(&agent).expect("body")
    }

    pub fn flag(&self, agent: u64, name: &str) -> bool {
        self.body(agent).flags.get(name).copied().unwrap_or(false)
    }
}

impl WorldView for Arena {
    type Agent = u64;
}

impl WorldMut for Arena {}

impl PerceptionQuery for Arena {
    fn head_pose(&self, agent: u64) -> Option<HeadPose> {
        self.bodies.get(&agent).map(|b| HeadPose {
            position: b.position + Vec3::new(0.0, 1.7, 0.0),
            forward: b.forward,
        })
    }

    fn overlap_detectable(&self, center: Vec3, radius: f32) -> Vec<Detectable> {
        if self.player_hidden || center.distance(self.player_pos) > radius {
            return Vec::new();
        }
        vec![Detectable {
            entity: PLAYER,
            kind: DetectableKind::Player,
            position: self.player_pos,
            sight_point: self.player_pos + Vec3::new(0.0, 1.6, 0.0),
        }]
    }

    fn linecast(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        self.wall.then(|| from.lerp(to, 0.5))
    }
}

impl GameFlags for Arena {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn no_noise_mode(&self) -> bool {
        self.no_noise
    }

    fn no_attack_mode(&self) -> bool {
        self.no_attack
    }
}

impl Navigation for Arena {
    fn position(&self, agent: u64) -> Option<Vec3> {
        self.bodies.get(&agent).map(|b| b.position)
    }

    fn destination(&self, agent: u64) -> Option<Vec3> {
        self.bodies.get(&agent).and_then(|b| b.destination)
    }

    fn set_destination(&mut self, agent: u64, point: Vec3) {
        if let Some(b) = self.bodies.get_mut(&agent) {
            b.destination = Some(point);
        }
    }

    fn speed(&self, agent: u64) -> f32 {
        self.bodies.get(&agent).map(|b| b.speed).unwrap_or(0.0)
    }

    fn set_speed(&mut self, agent: u64, speed: f32) {
        if let Some(b) = self.bodies.get_mut(&agent) {
            b.speed = speed;
        }
    }

    fn set_stopped(&mut self, agent: u64, stopped: bool) {
        if let Some(b) = self.bodies.get_mut(&agent) {
            b.stopped = stopped;
        }
    }
}

impl Animation for Arena {
    fn set_flag(&mut self, agent: u64, name: &'static str, value: bool) {
        if let Some(b) = self.bodies.get_mut(&agent) {
            b.flags.insert(name, value);
        }
    }

    fn trigger(&mut self, agent: u64, name: &'static str) {
        if let Some(b) = self.bodies.get_mut(&agent) {
            b.triggers.push(name);
        }
    }
}

impl Combat for Arena {
    fn damage(&mut self, target: EntityId, amount: f32) -> bool {
        if target != PLAYER {
            return false;
        }
        self.player_hp -= amount;
        self.player_hp <= 0.0
    }

    fn is_shot(&self, agent: u64) -> bool {
        self.bodies.get(&agent).is_some_and(|b| b.shot)
    }

    fn clear_shot(&mut self, agent: u64) {
        if let Some(b) = self.bodies.get_mut(&agent) {
            b.shot = false;
        }
    }
}

impl Audio for Arena {}

impl GameWorld for Arena {
    fn player(&self) -> Option<EntityId> {
        Some(PLAYER)
    }

    fn entity_position(&self, entity: EntityId) -> Option<Vec3> {
        (entity == PLAYER).then_some(self.player_pos)
    }

    fn is_player_hidden(&self) -> bool {
        self.player_hidden
    }

    fn in_door_transition(&self, agent: u64) -> bool {
        self.bodies.get(&agent).is_some_and(|b| b.door)
    }
}

/// Tuning with a scan every `DT` so sight updates each frame.
pub fn tuning() -> EnemyTuning {
    EnemyTuning {
        sensor: SensorConfig {
            scan_rate: 10.0,
            ..SensorConfig::default()
        },
        ..EnemyTuning::default()
    }
}

pub fn stalker(arena: Arena, tuning: &EnemyTuning, waypoints: Vec<Vec3>) -> AiDispatcher<Arena> {
    let mut d = AiDispatcher::new(arena, NoiseManager::default(), 7);
    d.register_root(ENEMY, tuning.sensor, stalker_tree(tuning, waypoints))
        .expect("register");
    d
}

pub fn root_bb(d: &AiDispatcher<Arena>) -> &Blackboard {
    d.tree(ENEMY).expect("tree").blackboard()
}

/// Every binding in every segment, for before/after comparisons.
pub fn entries(bb: &Blackboard) -> Vec<(ScopeId, &'static str, BbValue)> {
    bb.scopes()
        .flat_map(|s| {
            bb.keys(s)
                .filter_map(move |k| bb.raw(s, k).map(|v| (s, k, v)))
                .collect::<Vec<_>>()
        })
        .collect()
}
