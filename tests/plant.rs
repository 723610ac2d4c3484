use bevy_ecs::entity::Entity;
use rogueweb::{
    constants::{
        player::MAX_HEALTH,
        plant::{FIRE_INTERVAL_TICKS, MAX_HEALTH as PLANT_HEALTH},
        projectile::{LIFETIME_TICKS, SPEED},
        world::{GROUND_Y, PLATFORM_Y},
    },
    events::SimEvent,
    systems::{AgentKind, Facing, Key, PlantState},
};
use speculoos::prelude::*;

mod common;

fn fired(events: &[SimEvent]) -> Vec<Entity> {
    events
        .iter()
        .filter_map(|event| match event {
            SimEvent::ProjectileFired { projectile, .. } => Some(*projectile),
            _ => None,
        })
        .collect()
}

#[test]
fn test_plant_fires_on_interval() {
    let mut sim = common::empty_sim();
    let plant = sim.spawn_plant(1150.0, GROUND_Y);

    common::run_ticks(&mut sim, u32::from(FIRE_INTERVAL_TICKS) - 1);
    assert_that(&common::snapshot(&mut sim).projectiles).is_empty();

    sim.step();
    let events = sim.drain_events();
    let shots = fired(&events);
    assert_that(&shots).has_length(1);
    assert_that(&events).contains(SimEvent::ProjectileFired {
        plant,
        projectile: shots[0],
    });

    let snapshot = common::snapshot(&mut sim);
    let shot = &snapshot.projectiles[0];
    assert_that(&shot.vx).is_equal_to(-SPEED);
    assert_that(&shot.x).is_equal_to(1150.0 - SPEED);
    assert_that(&shot.life).is_equal_to(LIFETIME_TICKS - 1);
    assert_that(&snapshot.plant(plant).unwrap().facing).is_equal_to(Facing::Left);

    common::run_ticks(&mut sim, u32::from(FIRE_INTERVAL_TICKS));
    assert_that(&fired(&sim.drain_events())).has_length(1);
    assert_that(&common::snapshot(&mut sim).projectiles).has_length(2);
}

#[test]
fn test_projectile_expires_after_lifetime() {
    let mut sim = common::empty_sim();
    sim.spawn_plant(1150.0, GROUND_Y);

    common::run_ticks(&mut sim, u32::from(FIRE_INTERVAL_TICKS));
    let first = fired(&sim.drain_events())[0];

    common::run_ticks(&mut sim, u32::from(LIFETIME_TICKS) - 2);
    let remaining = common::snapshot(&mut sim);
    let shot = remaining.projectiles.iter().find(|shot| shot.entity == first).unwrap();
    assert_that(&shot.life).is_equal_to(1);

    sim.step();
    let snapshot = common::snapshot(&mut sim);
    assert_that(&snapshot.projectiles.iter().any(|shot| shot.entity == first)).is_false();
    assert_that(&snapshot.player.health).is_equal_to(MAX_HEALTH);
}

#[test]
fn test_plant_outside_detect_band_holds_fire() {
    let mut sim = common::empty_sim();
    sim.spawn_plant(1300.0, GROUND_Y);
    sim.spawn_plant(200.0, PLATFORM_Y);

    common::run_ticks(&mut sim, 3 * u32::from(FIRE_INTERVAL_TICKS));

    assert_that(&common::snapshot(&mut sim).projectiles).is_empty();
}

#[test]
fn test_plant_turns_towards_player() {
    let mut sim = common::empty_sim();
    let plant = sim.spawn_plant(-500.0, GROUND_Y);

    common::run_ticks(&mut sim, u32::from(FIRE_INTERVAL_TICKS));

    let snapshot = common::snapshot(&mut sim);
    assert_that(&snapshot.plant(plant).unwrap().facing).is_equal_to(Facing::Right);
    assert_that(&snapshot.projectiles[0].vx).is_equal_to(SPEED);
}

#[test]
fn test_attacking_player_parries_projectile() {
    let mut sim = common::empty_sim();
    let shot = sim.spawn_projectile(150.0, GROUND_Y, Facing::Left);

    common::tap(&mut sim, Key::Attack);

    let snapshot = common::snapshot(&mut sim);
    assert_that(&snapshot.projectiles).is_empty();
    assert_that(&snapshot.player.health).is_equal_to(MAX_HEALTH);
    assert_that(&sim.drain_events()).contains(SimEvent::ProjectileParried { projectile: shot });
}

#[test]
fn test_parry_needs_facing_projectile() {
    let mut sim = common::empty_sim();
    common::face_player(&mut sim, Facing::Left);
    sim.spawn_projectile(150.0, GROUND_Y, Facing::Left);

    common::tap(&mut sim, Key::Attack);

    assert_that(&common::snapshot(&mut sim).projectiles).has_length(1);
}

#[test]
fn test_plant_struck_twice_dies_without_knockback() {
    let mut sim = common::empty_sim();
    let plant = sim.spawn_plant(100.0, GROUND_Y);

    common::tap(&mut sim, Key::Attack);
    let snapshot = common::snapshot(&mut sim);
    let struck = snapshot.plant(plant).unwrap();
    assert_that(&struck.health).is_equal_to(PLANT_HEALTH - 1);
    assert_that(&struck.x).is_equal_to(100.0);
    assert_that(&matches!(struck.state, PlantState::Stunned { .. })).is_true();

    common::run_ticks(&mut sim, 12);
    common::tap(&mut sim, Key::Attack);

    let snapshot = common::snapshot(&mut sim);
    let dying = snapshot.plant(plant).unwrap();
    assert_that(&dying.health).is_equal_to(0);
    assert_that(&matches!(dying.state, PlantState::Dying { .. })).is_true();
    assert_that(&sim.drain_events()).contains(SimEvent::TargetKilled {
        target: plant,
        kind: AgentKind::Plant,
    });

    common::run_ticks(&mut sim, 30);
    assert_that(&common::snapshot(&mut sim).plant(plant)).is_none();
}
