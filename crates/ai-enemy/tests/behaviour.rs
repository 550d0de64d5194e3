mod common;

use ai_core::{NodeState, ScopeId, Vec3};
use ai_enemy::keys::{anim, LAST_KNOWN_POSITION, NOISE_LEVEL, NOISE_POSITION, TARGET};
use ai_enemy::EnemyTuning;
use ai_perception::{NoiseEvent, NoiseKind, NoiseVerdict};
use common::{entries, root_bb, stalker, tuning, Arena, DT, ENEMY, PLAYER};

fn ahead(z: f32) -> Vec3 {
    Vec3::new(0.0, 0.0, z)
}

#[test]
fn sighting_publishes_target_and_chase_runs_until_timeout() {
    let t = EnemyTuning {
        chase_duration: 0.35,
        ..tuning()
    };
    let mut d = stalker(Arena::new(ahead(5.0)), &t, Vec::new());

    d.tick(DT);
    assert_eq!(d.status(ENEMY), Some(NodeState::Running));
    assert_eq!(root_bb(&d).get_local(ScopeId::ROOT, TARGET), Some(PLAYER));
    assert_eq!(d.game().body(ENEMY).destination, Some(ahead(5.0)));
    assert_eq!(d.game().body(ENEMY).speed, t.run_speed);
    assert!(d.game().flag(ENEMY, anim::RUN));

    d.tick(DT);
    d.tick(DT);
    assert_eq!(d.status(ENEMY), Some(NodeState::Running));
    d.tick(DT);
    assert_eq!(d.status(ENEMY), Some(NodeState::Success));
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), None);
    assert!(!d.game().flag(ENEMY, anim::RUN));

    // Still in sight: the next frame re-acquires.
    d.tick(DT);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), Some(PLAYER));
}

#[test]
fn target_beyond_chase_range_leaves_a_last_known_position() {
    let t = EnemyTuning {
        max_chase_range: 8.0,
        ..tuning()
    };
    let mut d = stalker(Arena::new(ahead(5.0)), &t, Vec::new());
    d.tick(DT);
    assert!(root_bb(&d).contains(ScopeId::ROOT, TARGET));

    d.game_mut().player_pos = ahead(12.0);
    d.game_mut().wall = true;
    d.tick(DT);

    let bb = root_bb(&d);
    assert_eq!(bb.get(ScopeId::ROOT, TARGET), None);
    assert_eq!(bb.get_local(ScopeId::ROOT, LAST_KNOWN_POSITION), Some(ahead(12.0)));
    assert_eq!(d.status(ENEMY), Some(NodeState::Running));
    assert_eq!(d.game().body(ENEMY).destination, Some(ahead(12.0)));
    assert_eq!(d.game().body(ENEMY).speed, t.walk_speed);

    // Arriving forgets the position and hands control back to patrol.
    d.game_mut().body_mut(ENEMY).position = ahead(12.0);
    d.tick(DT);
    assert_eq!(d.status(ENEMY), Some(NodeState::Success));
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, LAST_KNOWN_POSITION), None);
}

#[test]
fn hiding_drops_target_and_last_known_position() {
    let mut d = stalker(Arena::new(ahead(5.0)), &tuning(), Vec::new());
    d.tick(DT);
    d.tree_mut(ENEMY)
        .expect("tree")
        .blackboard_mut()
        .set(ScopeId::ROOT, LAST_KNOWN_POSITION, ahead(3.0));

    d.game_mut().player_hidden = true;
    d.tick(DT);

    let bb = root_bb(&d);
    assert_eq!(bb.get(ScopeId::ROOT, TARGET), None);
    assert_eq!(bb.get(ScopeId::ROOT, LAST_KNOWN_POSITION), None);
    assert!(d.world().sensor(ENEMY).is_some_and(|s| s.hidden()));
}

#[test]
fn noise_is_heard_only_within_its_radius() {
    let behind = ahead(-6.0);
    let mut d = stalker(Arena::new(behind), &tuning(), Vec::new());

    d.world_mut()
        .noise_mut()
        .submit(NoiseEvent::new(NoiseKind::Walk, behind));
    d.tick(DT);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, NOISE_POSITION), None);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, NOISE_LEVEL), None);

    d.world_mut()
        .noise_mut()
        .submit(NoiseEvent::new(NoiseKind::Sprint, behind));
    d.tick(DT);
    let bb = root_bb(&d);
    assert_eq!(bb.get_local(ScopeId::ROOT, NOISE_POSITION), Some(behind));
    assert_eq!(bb.get_local(ScopeId::ROOT, NOISE_LEVEL), Some(9.0));
    assert_eq!(d.game().body(ENEMY).destination, Some(behind));
}

#[test]
fn walls_muffle_but_do_not_silence_loud_noise() {
    let behind = ahead(-6.0);
    let mut arena = Arena::new(behind);
    arena.wall = true;
    let mut d = stalker(arena, &tuning(), Vec::new());

    // 6 > 9 * 0.6
    d.world_mut()
        .noise_mut()
        .submit(NoiseEvent::new(NoiseKind::Sprint, behind));
    d.tick(DT);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, NOISE_POSITION), None);

    // 6 <= 20 * 0.6
    d.world_mut()
        .noise_mut()
        .submit(NoiseEvent::new(NoiseKind::Gunshot, behind));
    d.tick(DT);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, NOISE_POSITION), Some(behind));
}

#[test]
fn no_noise_mode_and_an_existing_target_skip_hearing() {
    let behind = ahead(-6.0);
    let mut arena = Arena::new(behind);
    arena.no_noise = true;
    let mut d = stalker(arena, &tuning(), Vec::new());
    d.world_mut()
        .noise_mut()
        .submit(NoiseEvent::new(NoiseKind::Gunshot, behind));
    d.tick(DT);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, NOISE_POSITION), None);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, NOISE_LEVEL), None);
}

#[test]
fn unreachable_noise_is_searched_from_where_the_agent_got_stuck() {
    let t = EnemyTuning {
        stuck_threshold: 0.25,
        noise_dwell: 0.15,
        ..tuning()
    };
    let behind = ahead(-6.0);
    let mut d = stalker(Arena::new(behind), &t, Vec::new());
    d.world_mut()
        .noise_mut()
        .submit(NoiseEvent::new(NoiseKind::Gunshot, behind));

    for _ in 0..3 {
        d.tick(DT);
        assert_eq!(d.status(ENEMY), Some(NodeState::Running));
        assert!(d.game().flag(ENEMY, anim::WALK));
    }
    d.tick(DT);
    assert!(d.game().body(ENEMY).stopped);
    assert!(!d.game().flag(ENEMY, anim::WALK));

    d.tick(DT);
    assert_eq!(d.status(ENEMY), Some(NodeState::Success));
    let bb = root_bb(&d);
    assert_eq!(bb.get(ScopeId::ROOT, NOISE_POSITION), None);
    assert_eq!(bb.get(ScopeId::ROOT, NOISE_LEVEL), None);
}

#[test]
fn attack_strikes_on_interval_and_succeeds_on_kill() {
    let t = EnemyTuning {
        attack_interval: 0.25,
        attack_damage: 40.0,
        ..tuning()
    };
    let mut d = stalker(Arena::new(ahead(1.5)), &t, Vec::new());

    for _ in 0..9 {
        d.tick(DT);
        assert_eq!(d.status(ENEMY), Some(NodeState::Running));
    }
    assert_eq!(d.game().player_hp, 20.0);
    d.tick(DT);

    assert_eq!(d.status(ENEMY), Some(NodeState::Success));
    assert!(d.game().player_hp <= 0.0);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), None);
    let triggers = &d.game().body(ENEMY).triggers;
    assert_eq!(triggers.len(), 3);
    assert!(triggers
        .iter()
        .all(|t| *t == anim::ATTACK_LEFT || *t == anim::ATTACK_RIGHT));
}

#[test]
fn no_attack_mode_keeps_chasing_instead() {
    let mut arena = Arena::new(ahead(1.5));
    arena.no_attack = true;
    let mut d = stalker(arena, &tuning(), Vec::new());
    for _ in 0..20 {
        d.tick(DT);
    }
    assert_eq!(d.game().player_hp, 100.0);
    assert!(!d.game().flag(ENEMY, anim::ATTACK));
}

#[test]
fn paused_ticks_change_nothing_and_timers_resume_where_they_were() {
    let t = EnemyTuning {
        chase_duration: 0.35,
        ..tuning()
    };
    let mut d = stalker(Arena::new(ahead(5.0)), &t, Vec::new());
    d.tick(DT);
    d.tick(DT);
    d.world_mut()
        .sensor_mut(ENEMY)
        .expect("sensor")
        .force_sight_for(5.0);
    let before = entries(root_bb(&d));
    let body_before = d.game().body(ENEMY).clone();
    let clock_before = d.world().noise().clock();
    let forced_before = d.world().sensor(ENEMY).and_then(|s| s.forced_sight_remaining());

    d.game_mut().paused = true;
    d.game_mut().player_pos = Vec3::new(1.0, 0.0, 5.0);
    for _ in 0..25 {
        d.tick(DT);
        assert_eq!(d.status(ENEMY), Some(NodeState::Running));
    }
    assert_eq!(entries(root_bb(&d)), before);
    assert_eq!(d.game().body(ENEMY).destination, body_before.destination);
    assert_eq!(d.game().body(ENEMY).flags, body_before.flags);
    assert!(d.world().sensor(ENEMY).is_some_and(|s| s.is_paused()));
    assert_eq!(d.world().noise().clock(), clock_before);
    assert_eq!(
        d.world().sensor(ENEMY).and_then(|s| s.forced_sight_remaining()),
        forced_before
    );

    d.game_mut().paused = false;
    d.tick(DT);
    assert_eq!(d.status(ENEMY), Some(NodeState::Running));
    assert_eq!(d.game().body(ENEMY).destination, Some(Vec3::new(1.0, 0.0, 5.0)));
    d.tick(DT);
    assert_eq!(d.status(ENEMY), Some(NodeState::Success));
}

#[test]
fn noise_cooldown_stands_still_while_paused() {
    let mut d = stalker(Arena::new(ahead(-40.0)), &tuning(), Vec::new());
    assert_eq!(d.world_mut().noise_mut().submit_raw(3, 20.0), NoiseVerdict::Accepted);

    d.game_mut().paused = true;
    for _ in 0..30 {
        d.tick(DT);
    }
    assert_eq!(d.world().noise().clock(), 0.0);

    d.game_mut().paused = false;
    let noise = d.world_mut().noise_mut();
    assert_eq!(noise.submit_raw(1, 2.0), NoiseVerdict::Rejected);
    assert_eq!(noise.level(), 20.0);
}

#[test]
fn hiding_while_paused_is_only_noticed_after_resume() {
    let mut d = stalker(Arena::new(ahead(5.0)), &tuning(), Vec::new());
    d.tick(DT);

    d.game_mut().paused = true;
    d.game_mut().player_hidden = true;
    for _ in 0..3 {
        d.tick(DT);
    }
    assert!(d.world().sensor(ENEMY).is_some_and(|s| !s.hidden()));
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), Some(PLAYER));

    d.game_mut().paused = false;
    d.tick(DT);
    assert!(d.world().sensor(ENEMY).is_some_and(|s| s.hidden()));
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), None);
}

#[test]
fn reacquired_target_gets_a_full_chase() {
    let t = EnemyTuning {
        chase_duration: 1.0,
        ..tuning()
    };
    let mut d = stalker(Arena::new(ahead(5.0)), &t, Vec::new());
    for _ in 0..9 {
        d.tick(DT);
        assert_eq!(d.status(ENEMY), Some(NodeState::Running));
    }

    d.game_mut().player_hidden = true;
    d.tick(DT);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), None);

    d.game_mut().player_hidden = false;
    for _ in 0..9 {
        d.tick(DT);
        assert_eq!(d.status(ENEMY), Some(NodeState::Running));
        assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), Some(PLAYER));
    }
}

#[test]
fn leaving_attack_range_restarts_the_attack_interval() {
    let t = EnemyTuning {
        attack_interval: 0.25,
        attack_damage: 40.0,
        ..tuning()
    };
    let mut d = stalker(Arena::new(ahead(1.5)), &t, Vec::new());
    d.tick(DT);
    d.tick(DT);
    d.tick(DT);

    d.game_mut().player_pos = ahead(5.0);
    d.tick(DT);
    d.game_mut().player_pos = ahead(1.5);
    d.tick(DT);
    d.tick(DT);
    assert_eq!(d.game().player_hp, 100.0);

    d.tick(DT);
    assert_eq!(d.game().player_hp, 60.0);
}

#[test]
fn hidden_player_in_attack_range_is_not_attacked() {
    let t = EnemyTuning {
        attack_interval: 0.25,
        ..tuning()
    };
    let mut d = stalker(Arena::new(ahead(1.5)), &t, Vec::new());
    d.tick(DT);
    d.tick(DT);

    d.game_mut().player_hidden = true;
    for _ in 0..10 {
        d.tick(DT);
    }
    assert_eq!(d.game().player_hp, 100.0);
    assert!(!d.game().flag(ENEMY, anim::ATTACK));
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), None);
}

#[test]
fn patrol_dwells_then_moves_on() {
    let t = EnemyTuning {
        patrol_dwell: 0.15,
        ..tuning()
    };
    let far = Vec3::new(4.0, 0.0, 0.0);
    let mut d = stalker(Arena::new(ahead(-40.0)), &t, vec![Vec3::ZERO, far]);

    d.tick(DT);
    assert_eq!(d.game().body(ENEMY).destination, None);
    d.tick(DT);
    assert_eq!(d.game().body(ENEMY).destination, Some(far));
    assert!(d.game().flag(ENEMY, anim::WALK));

    d.tick(DT);
    assert_eq!(d.game().body(ENEMY).destination, Some(far));

    d.game_mut().body_mut(ENEMY).position = far;
    d.tick(DT);
    d.tick(DT);
    assert_eq!(d.game().body(ENEMY).destination, Some(Vec3::ZERO));
}

#[test]
fn sighting_interrupts_patrol() {
    let mut d = stalker(
        Arena::new(ahead(-40.0)),
        &tuning(),
        vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)],
    );
    d.tick(DT);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), None);

    d.game_mut().player_pos = ahead(6.0);
    d.tick(DT);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), Some(PLAYER));
    assert_eq!(d.game().body(ENEMY).destination, Some(ahead(6.0)));
}

#[test]
fn being_shot_turns_the_enemy_on_the_player() {
    let mut d = stalker(Arena::new(ahead(-10.0)), &tuning(), Vec::new());
    d.game_mut().body_mut(ENEMY).shot = true;
    d.tick(DT);

    assert!(!d.game().body(ENEMY).shot);
    assert_eq!(root_bb(&d).get(ScopeId::ROOT, TARGET), Some(PLAYER));
    assert_eq!(d.game().body(ENEMY).destination, Some(ahead(-10.0)));
}

#[test]
fn door_transition_saves_and_restores_navigation() {
    let mut arena = Arena::new(ahead(-40.0));
    {
        let body = arena.body_mut(ENEMY);
        body.destination = Some(Vec3::new(3.0, 0.0, 3.0));
        body.speed = 2.0;
        body.door = true;
    }
    let mut d = stalker(arena, &tuning(), Vec::new());

    d.tick(DT);
    assert_eq!(d.status(ENEMY), Some(NodeState::Running));
    assert!(d.game().body(ENEMY).stopped);

    // The door script drives the agent meanwhile.
    {
        let body = d.game_mut().body_mut(ENEMY);
        body.destination = Some(Vec3::new(9.0, 0.0, 9.0));
        body.speed = 1.0;
    }
    d.tick(DT);
    assert_eq!(d.status(ENEMY), Some(NodeState::Running));

    d.game_mut().body_mut(ENEMY).door = false;
    d.tick(DT);
    assert_eq!(d.status(ENEMY), Some(NodeState::Success));
    let body = d.game().body(ENEMY);
    assert_eq!(body.destination, Some(Vec3::new(3.0, 0.0, 3.0)));
    assert_eq!(body.speed, 2.0);
    assert!(!body.stopped);
    assert!(entries(root_bb(&d)).is_empty());
}
