//! Scripted player behaviour for each demo scenario.

use ai_core::Vec3;
use ai_enemy::AiDispatcher;
use ai_perception::{MovementMode, NoiseEvent, NoiseKind};
use clap::ValueEnum;

use crate::arena::Arena;

const FOOTSTEP_EVERY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// The player stays hidden; the enemy walks its route.
    Patrol,
    /// The player sneaks behind a wall, then fires a shot.
    Noise,
    /// The player walks straight at the enemy.
    Hunt,
}

impl Scenario {
    pub fn player_start(self) -> Vec3 {
        match self {
            Scenario::Patrol => Vec3::new(15.0, 0.0, 15.0),
            Scenario::Noise => Vec3::new(8.0, 0.0, -10.0),
            Scenario::Hunt => Vec3::new(0.0, 0.0, 14.0),
        }
    }

    pub fn waypoints(self) -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(-8.0, 0.0, 0.0),
            Vec3::new(-8.0, 0.0, -8.0),
            Vec3::new(0.0, 0.0, -8.0),
        ]
    }

    /// Advance the player script to `time` seconds.
    pub fn drive(self, time: f32, dt: f32, ai: &mut AiDispatcher<Arena>) {
        match self {
            Scenario::Patrol => {
                ai.game_mut().player.hidden = true;
            }
            Scenario::Noise => {
                let crouched = time < 4.0;
                let step = Vec3::new(0.0, 0.0, 0.6 * dt);
                let at = {
                    let player = &mut ai.game_mut().player;
                    player.position = player.position + step;
                    player.position
                };
                let noise = ai.world_mut().noise_mut();
                if crouched {
                    noise.set_movement(MovementMode::Crouch);
                } else {
                    noise.set_movement(MovementMode::Sprint);
                }
                if footstep(time, dt) {
                    let kind = if crouched { NoiseKind::Crouch } else { NoiseKind::Sprint };
                    noise.submit(NoiseEvent::new(kind, at));
                }
                if crossed(time, dt, 5.0) {
                    tracing::info!(time, "player fires");
                    noise.submit(NoiseEvent::new(NoiseKind::Gunshot, at));
                }
            }
            Scenario::Hunt => {
                let player = &mut ai.game_mut().player;
                let toward = (Vec3::ZERO - player.position).flat();
                if toward.length() > 3.0 {
                    player.position = player.position + toward.normalize_or_zero() * (1.2 * dt);
                }
                let at = player.position;
                if footstep(time, dt) {
                    ai.world_mut()
                        .noise_mut()
                        .submit(NoiseEvent::new(NoiseKind::Walk, at));
                }
            }
        }
    }
}

fn crossed(time: f32, dt: f32, mark: f32) -> bool {
    time < mark && time + dt >= mark
}

fn footstep(time: f32, dt: f32) -> bool {
    (time / FOOTSTEP_EVERY).floor() != ((time + dt) / FOOTSTEP_EVERY).floor()
}
