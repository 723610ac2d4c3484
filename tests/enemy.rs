use bevy_ecs::system::RunSystemOnce;
use rogueweb::{
    constants::{
        enemy::{ATTACK_COOLDOWN_TICKS, SPEED},
        player::MAX_HEALTH,
        world::{FALL_GRAVITY, GROUND_Y, PLATFORM_Y},
    },
    events::{DamageSource, SimEvent},
    systems::{enemy_system, AttackPhase, Enemy, EnemyAttack, EnemyState, Facing, Key, Position},
};
use speculoos::prelude::*;

mod common;

#[test]
fn test_enemy_chases_player_in_range() {
    let mut sim = common::empty_sim();
    let enemy = sim.spawn_enemy(300.0, GROUND_Y);

    sim.step();

    let snapshot = common::snapshot(&mut sim);
    let chaser = snapshot.enemy(enemy).unwrap();
    assert_that(&chaser.state).is_equal_to(EnemyState::Chasing);
    assert_that(&chaser.x).is_equal_to(300.0 - SPEED);
    assert_that(&chaser.facing).is_equal_to(Facing::Left);
}

#[test]
fn test_enemy_ignores_distant_player() {
    let mut sim = common::empty_sim();
    let far = sim.spawn_enemy(1000.0, GROUND_Y);
    let above = sim.spawn_enemy(300.0, PLATFORM_Y);

    common::run_ticks(&mut sim, 10);

    let snapshot = common::snapshot(&mut sim);
    for (entity, x) in [(far, 1000.0), (above, 300.0)] {
        let idle = snapshot.enemy(entity).unwrap();
        assert_that(&idle.state).is_equal_to(EnemyState::Idle);
        assert_that(&idle.x).is_equal_to(x);
    }
    assert_that(&snapshot.enemy(above).unwrap().y).is_equal_to(PLATFORM_Y);
}

#[test]
fn test_enemy_attack_winds_up_then_damages_once() {
    let mut sim = common::empty_sim();
    let enemy = sim.spawn_enemy(50.0, GROUND_Y);

    sim.step();
    let state = common::snapshot(&mut sim).enemy(enemy).unwrap().state;
    assert_that(&matches!(state, EnemyState::Attacking(EnemyAttack { phase: AttackPhase::Windup, .. }))).is_true();

    common::run_ticks(&mut sim, 15);
    assert_that(&common::vitals(&mut sim).health).is_equal_to(MAX_HEALTH);

    sim.step();
    assert_that(&common::vitals(&mut sim).health).is_equal_to(MAX_HEALTH - 1);
    assert_that(&sim.drain_events()).contains(SimEvent::PlayerDamaged {
        source: DamageSource::Enemy(enemy),
        remaining: MAX_HEALTH - 1,
    });

    // Strike phase plays out, then the enemy rests.
    common::run_ticks(&mut sim, 16);
    let enemy_state = sim.world.get::<Enemy>(enemy).unwrap().clone();
    assert_that(&enemy_state.state).is_equal_to(EnemyState::Idle);
    assert_that(&enemy_state.attack_cooldown).is_equal_to(ATTACK_COOLDOWN_TICKS);
    assert_that(&common::vitals(&mut sim).health).is_equal_to(MAX_HEALTH - 1);
}

#[test]
fn test_enemy_over_gap_falls_to_ground() {
    let mut sim = common::gapped_sim();
    let enemy = sim.spawn_enemy(5000.0, PLATFORM_Y);

    sim.step();
    let state = common::snapshot(&mut sim).enemy(enemy).unwrap().state;
    assert_that(&matches!(state, EnemyState::Falling { .. })).is_true();

    common::run_ticks(&mut sim, 60);
    let landed = common::snapshot(&mut sim);
    let landed = landed.enemy(enemy).unwrap();
    assert_that(&landed.y).is_equal_to(GROUND_Y);
    assert_that(&landed.state).is_equal_to(EnemyState::Idle);
}

#[test]
fn test_struck_while_falling_resumes_fall_speed() {
    let mut sim = common::gapped_sim();
    common::place_player(&mut sim, 4950.0, GROUND_Y);
    let enemy = sim.spawn_enemy(5000.0, PLATFORM_Y);
    sim.world.get_mut::<Enemy>(enemy).unwrap().state = EnemyState::Falling { vy: 8.0 };

    common::tap(&mut sim, Key::Attack);
    let struck = common::snapshot(&mut sim);
    let struck = struck.enemy(enemy).unwrap();
    assert_that(&struck.state).is_equal_to(EnemyState::Stunned { remaining: 11, vy: 8.0 });
    assert_that(&struck.y).is_equal_to(PLATFORM_Y);

    common::run_ticks(&mut sim, 11);
    let state = common::snapshot(&mut sim).enemy(enemy).unwrap().state;
    assert_that(&state).is_equal_to(EnemyState::Falling { vy: 8.0 });

    sim.step();
    let falling = common::snapshot(&mut sim);
    let falling = falling.enemy(enemy).unwrap();
    assert_that(&falling.state).is_equal_to(EnemyState::Falling { vy: 8.0 + FALL_GRAVITY });
    assert_that(&falling.y).is_equal_to(PLATFORM_Y + (8.0 + FALL_GRAVITY));
}

#[test]
fn test_enemy_system_in_isolation() {
    let mut world = common::create_test_world();
    common::spawn_test_player(&mut world, 0.0);
    let enemy = common::spawn_test_enemy(&mut world, -200.0, GROUND_Y);

    world.run_system_once(enemy_system).unwrap();
    world.run_system_once(enemy_system).unwrap();

    assert_that(&world.get::<Position>(enemy).unwrap().0.x).is_equal_to(-200.0 + 2.0 * SPEED);
    assert_that(&*world.get::<Facing>(enemy).unwrap()).is_equal_to(Facing::Right);
}

#[test]
fn test_dead_enemy_removed_by_system() {
    let mut world = common::create_test_world();
    common::spawn_test_player(&mut world, 0.0);
    let enemy = common::spawn_test_enemy(&mut world, 100.0, GROUND_Y);
    world.get_mut::<Enemy>(enemy).unwrap().state = EnemyState::Dead;

    world.run_system_once(enemy_system).unwrap();

    assert_that(&world.get_entity(enemy).is_err()).is_true();
}
