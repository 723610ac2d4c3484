#![allow(dead_code)]

use bevy_ecs::{entity::Entity, event::Events, world::World};
use rogueweb::{
    config::SimConfig,
    events::SimEvent,
    simulation::Simulation,
    snapshot::SimSnapshot,
    systems::{
        EnemyBundle, Facing, InputLatch, Key, Player, PlayerBundle, Position, SimRng, SpawnerSettings, TickCount, Vitals,
        Watermarks,
    },
    terrain::{BackgroundLayout, Terrain},
};

pub const SEED: u64 = 0x5EED;

/// A seeded simulation with only the player and no dynamic spawning.
pub fn empty_sim() -> Simulation {
    Simulation::empty(&SimConfig::default().with_seed(SEED).without_spawning()).unwrap()
}

/// 1:1 layout, so world x and background columns line up: the platform is missing over 4360..=8260.
pub fn gapped_layout() -> BackgroundLayout {
    BackgroundLayout::new(10_000.0, 1080.0, 1080.0).unwrap()
}

pub fn gapped_sim() -> Simulation {
    let config = SimConfig::default()
        .with_seed(SEED)
        .without_spawning()
        .with_layout(gapped_layout());
    Simulation::empty(&config).unwrap()
}

pub fn run_ticks(sim: &mut Simulation, ticks: u32) {
    for _ in 0..ticks {
        sim.step();
    }
}

/// Presses and releases `key` around a single tick.
pub fn tap(sim: &mut Simulation, key: Key) {
    sim.key_down(key);
    sim.step();
    sim.key_up(key);
}

pub fn snapshot(sim: &mut Simulation) -> SimSnapshot {
    sim.snapshot().unwrap()
}

pub fn player_entity(sim: &mut Simulation) -> Entity {
    let mut query = sim.world.query::<(Entity, &Player)>();
    query.single(&sim.world).unwrap().0
}

pub fn player(sim: &mut Simulation) -> Player {
    let entity = player_entity(sim);
    sim.world.get::<Player>(entity).unwrap().clone()
}

pub fn vitals(sim: &mut Simulation) -> Vitals {
    let entity = player_entity(sim);
    *sim.world.get::<Vitals>(entity).unwrap()
}

pub fn set_vitals(sim: &mut Simulation, vitals: Vitals) {
    let entity = player_entity(sim);
    *sim.world.get_mut::<Vitals>(entity).unwrap() = vitals;
}

pub fn place_player(sim: &mut Simulation, x: f32, y: f32) {
    let entity = player_entity(sim);
    sim.world.get_mut::<Position>(entity).unwrap().0 = glam::Vec2::new(x, y);
}

pub fn face_player(sim: &mut Simulation, facing: Facing) {
    let entity = player_entity(sim);
    *sim.world.get_mut::<Facing>(entity).unwrap() = facing;
}

/// A bare world with the resources the systems read, for `run_system_once` tests.
pub fn create_test_world() -> World {
    let mut world = World::new();
    bevy_ecs::event::EventRegistry::register_event::<SimEvent>(&mut world);
    world.insert_resource(InputLatch::default());
    world.insert_resource(Terrain::default());
    world.insert_resource(Watermarks::default());
    world.insert_resource(SpawnerSettings { enabled: true });
    world.insert_resource(TickCount::default());
    world.insert_resource(SimRng::new(Some(SEED)));
    world
}

pub fn spawn_test_player(world: &mut World, x: f32) -> Entity {
    let mut bundle = PlayerBundle::default();
    bundle.position = Position::new(x, 0.0);
    world.spawn(bundle).id()
}

pub fn spawn_test_enemy(world: &mut World, x: f32, y: f32) -> Entity {
    world.spawn(EnemyBundle::new(glam::Vec2::new(x, y), Facing::Left)).id()
}

/// Puts the player mid-jump with an air strike live.
pub fn launch_air_strike(world: &mut World, player: Entity) {
    let mut player = world.get_mut::<Player>(player).unwrap();
    player.jump();
    player.air_attack();
}

pub fn drain_events(world: &mut World) -> Vec<SimEvent> {
    world.resource_mut::<Events<SimEvent>>().drain().collect()
}
