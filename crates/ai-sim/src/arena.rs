//! A flat, walled test arena implementing every game seam the AI needs.

use std::collections::BTreeMap;

use ai_core::{EntityId, Vec3, WorldMut, WorldView};
use ai_enemy::{Animation, Audio, Combat, GameFlags, GameWorld, Navigation};
use ai_perception::{Detectable, DetectableKind, HeadPose, PerceptionQuery};

pub const PLAYER: EntityId = EntityId(1000);

const EYE_HEIGHT: f32 = 1.7;
const CAMERA_HEIGHT: f32 = 1.6;

/// Vertical wall, as a segment on the ground plane.
#[derive(Debug, Clone, Copy)]
pub struct Wall {
    pub a: Vec3,
    pub b: Vec3,
}

impl Wall {
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { a, b }
    }

    /// Ground-plane intersection with the segment `from -> to`, as a parameter
    /// along it.
    fn cut(&self, from: Vec3, to: Vec3) -> Option<f32> {
        let (p, r) = ((from.x, from.z), (to.x - from.x, to.z - from.z));
        let (q, s) = ((self.a.x, self.a.z), (self.b.x - self.a.x, self.b.z - self.a.z));
        let denom = r.0 * s.1 - r.1 * s.0;
        if denom.abs() <= f32::EPSILON {
            return None;
        }
        let qp = (q.0 - p.0, q.1 - p.1);
        let t = (qp.0 * s.1 - qp.1 * s.0) / denom;
        let u = (qp.0 * r.1 - qp.1 * r.0) / denom;
        ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)).then_some(t)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Body {
    pub position: Vec3,
    pub forward: Vec3,
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub stopped: bool,
    pub flags: BTreeMap<&'static str, bool>,
    pub shot: bool,
    pub attacks: u32,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    pub health: f32,
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub struct Arena {
    pub walls: Vec<Wall>,
    pub enemies: BTreeMap<u64, Body>,
    pub player: Player,
    pub paused: bool,
}

impl Arena {
    /// A 40x40 room with one interior wall along `x = 4`, `z` in `[-12, -2]`.
    pub fn walled(player: Vec3) -> Self {
        let corner = |x: f32, z: f32| Vec3::new(x, 0.0, z);
        let walls = vec![
            Wall::new(corner(-20.0, -20.0), corner(20.0, -20.0)),
            Wall::new(corner(20.0, -20.0), corner(20.0, 20.0)),
            Wall::new(corner(20.0, 20.0), corner(-20.0, 20.0)),
            Wall::new(corner(-20.0, 20.0), corner(-20.0, -20.0)),
            Wall::new(corner(4.0, -12.0), corner(4.0, -2.0)),
        ];
        Self {
            walls,
            enemies: BTreeMap::new(),
            player: Player {
                position: player,
                health: 100.0,
                hidden: false,
            },
            paused: false,
        }
    }

    pub fn spawn(&mut self, agent: u64, position: Vec3, forward: Vec3) {
        self.enemies.insert(
            agent,
            Body {
                position,
                forward: forward.normalize_or_zero(),
                ..Body::default()
            },
        );
    }

    pub fn body(&self, agent: u64) -> Option<&Body> {
        self.enemies.get(&agent)
    }

    pub fn player_dead(&self) -> bool {
        self.player.health <= 0.0
    }

    /// Move every enemy toward its destination.
    pub fn step(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        for body in self.enemies.values_mut() {
            let Some(dest) = body.destination else {
                continue;
            };
            if body.stopped {
                continue;
            }
            let heading = (dest - body.position).flat();
            if heading.length_squared() > f32::EPSILON {
                body.forward = heading.normalize_or_zero();
            }
            body.position = body.position.move_towards(dest, body.speed * dt);
        }
    }
}

impl WorldView for Arena {
    type Agent = u64;
}

impl WorldMut for Arena {}

impl PerceptionQuery for Arena {
    fn head_pose(&self, agent: u64) -> Option<HeadPose> {
        self.enemies.get(&agent).map(|b| HeadPose {
            position: b.position + Vec3::new(0.0, EYE_HEIGHT, 0.0),
            forward: b.forward,
        })
    }

    fn overlap_detectable(&self, center: Vec3, radius: f32) -> Vec<Detectable> {
        if self.player.hidden || center.distance(self.player.position) > radius {
            return Vec::new();
        }
        vec![Detectable {
            entity: PLAYER,
            kind: DetectableKind::Player,
            position: self.player.position,
            sight_point: self.player.position + Vec3::new(0.0, CAMERA_HEIGHT, 0.0),
        }]
    }

    fn linecast(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        self.walls
            .iter()
            .filter_map(|w| w.cut(from, to))
            .min_by(|a, b| a.total_cmp(b))
            .map(|t| from.lerp(to, t))
    }
}

impl GameFlags for Arena {
    fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Navigation for Arena {
    fn position(&self, agent: u64) -> Option<Vec3> {
        self.enemies.get(&agent).map(|b| b.position)
    }

    fn destination(&self, agent: u64) -> Option<Vec3> {
        self.enemies.get(&agent)?.destination
    }

    fn set_destination(&mut self, agent: u64, point: Vec3) {
        if let Some(b) = self.enemies.get_mut(&agent) {
            b.destination = Some(point);
        }
    }

    fn speed(&self, agent: u64) -> f32 {
        self.enemies.get(&agent).map_or(0.0, |b| b.speed)
    }

    fn set_speed(&mut self, agent: u64, speed: f32) {
        if let Some(b) = self.enemies.get_mut(&agent) {
            b.speed = speed;
        }
    }

    fn set_stopped(&mut self, agent: u64, stopped: bool) {
        if let Some(b) = self.enemies.get_mut(&agent) {
            b.stopped = stopped;
        }
    }

    fn face_towards(&mut self, agent: u64, point: Vec3) {
        if let Some(b) = self.enemies.get_mut(&agent) {
            let heading = (point - b.position).flat();
            if heading.length_squared() > f32::EPSILON {
                b.forward = heading.normalize_or_zero();
            }
        }
    }
}

impl Animation for Arena {
    fn set_flag(&mut self, agent: u64, name: &'static str, value: bool) {
        if let Some(b) = self.enemies.get_mut(&agent) {
            b.flags.insert(name, value);
        }
    }

    fn trigger(&mut self, agent: u64, name: &'static str) {
        tracing::debug!(agent, name, "animation trigger");
        if let Some(b) = self.enemies.get_mut(&agent) {
            b.attacks += 1;
        }
    }
}

impl Combat for Arena {
    fn damage(&mut self, target: EntityId, amount: f32) -> bool {
        if target != PLAYER {
            return false;
        }
        self.player.health -= amount;
        tracing::info!(health = self.player.health, "player hit");
        self.player_dead()
    }

    fn is_shot(&self, agent: u64) -> bool {
        self.enemies.get(&agent).is_some_and(|b| b.shot)
    }

    fn clear_shot(&mut self, agent: u64) {
        if let Some(b) = self.enemies.get_mut(&agent) {
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
        (entity == PLAYER).then_some(self.player.position)
    }

    fn is_player_hidden(&self) -> bool {
        self.player.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_wall_blocks_line_of_sight() {
        let arena = Arena::walled(Vec3::ZERO);
        let hit = arena.linecast(Vec3::new(0.0, 1.7, -6.0), Vec3::new(8.0, 1.6, -6.0));
        let hit = hit.expect("blocked");
        assert!((hit.x - 4.0).abs() < 1e-4);
        assert!(arena
            .linecast(Vec3::new(0.0, 1.7, 0.0), Vec3::new(8.0, 1.6, 0.0))
            .is_none());
    }

    #[test]
    fn enemies_walk_to_their_destination() {
        let mut arena = Arena::walled(Vec3::ZERO);
        arena.spawn(1, Vec3::ZERO, Vec3::Z);
        arena.set_destination(1, Vec3::new(2.0, 0.0, 0.0));
        arena.set_speed(1, 1.0);
        arena.step(1.0);
        assert_eq!(arena.position(1), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(arena.body(1).map(|b| b.forward), Some(Vec3::X));
    }
}
