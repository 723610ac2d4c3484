//! Procedural population of the world as the player explores it.
//!
//! Two watermarks bound the populated stretch of the world. Whenever the player comes within
//! the lookahead margin of either one, a new band of agents is planned beyond it and the
//! watermark moves outward by a fixed stride. Watermarks only ever move outward.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::With,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
    world::World,
};
use glam::Vec2;
use rand::Rng;
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    constants::{
        spawner::*,
        world::{GROUND_Y, PLATFORM_Y},
    },
    events::SimEvent,
    systems::{
        components::{AgentKind, EnemyBundle, Facing, PlantBundle, Position, SimRng},
        plant::Plant,
        player::Player,
    },
    terrain::Terrain,
};

/// Furthest world x already populated on each side of the origin.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Watermarks {
    pub right: f32,
    pub left: f32,
}

impl Default for Watermarks {
    fn default() -> Self {
        Self {
            right: INITIAL_RIGHT_WATERMARK,
            left: INITIAL_LEFT_WATERMARK,
        }
    }
}

/// Switches dynamic spawning on or off.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnerSettings {
    pub enabled: bool,
}

/// Run condition for [`spawner_system`].
pub fn spawning_enabled(settings: Res<SpawnerSettings>) -> bool {
    settings.enabled
}

/// A planned agent, ready to be spawned.
pub enum SpawnRequest {
    Enemy(EnemyBundle),
    Plant(PlantBundle),
}

impl SpawnRequest {
    pub fn kind(&self) -> AgentKind {
        match self {
            SpawnRequest::Enemy(_) => AgentKind::Enemy,
            SpawnRequest::Plant(_) => AgentKind::Plant,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            SpawnRequest::Enemy(bundle) => bundle.position.0,
            SpawnRequest::Plant(bundle) => bundle.position.0,
        }
    }

    pub fn spawn_into(self, world: &mut World) -> Entity {
        match self {
            SpawnRequest::Enemy(bundle) => world.spawn(bundle).id(),
            SpawnRequest::Plant(bundle) => world.spawn(bundle).id(),
        }
    }

    pub fn spawn_with(self, commands: &mut Commands) -> Entity {
        match self {
            SpawnRequest::Enemy(bundle) => commands.spawn(bundle).id(),
            SpawnRequest::Plant(bundle) => commands.spawn(bundle).id(),
        }
    }
}

fn height(on_platform: bool) -> f32 {
    if on_platform {
        PLATFORM_Y
    } else {
        GROUND_Y
    }
}

fn enemy_at(x: f32, on_platform: bool, rng: &mut impl Rng) -> SpawnRequest {
    let position = Vec2::new(x, height(on_platform));
    SpawnRequest::Enemy(EnemyBundle::new(position, Facing::random(rng)))
}

fn plant_at(x: f32, on_platform: bool, rng: &mut impl Rng) -> SpawnRequest {
    let position = Vec2::new(x, height(on_platform));
    let plant = Plant::random(rng);
    SpawnRequest::Plant(PlantBundle::new(position, Facing::random(rng), plant))
}

/// Plans the agents for the band just beyond `watermark` on the given side.
pub fn plan_band(side: Facing, watermark: f32, rng: &mut impl Rng, terrain: &Terrain) -> SmallVec<[SpawnRequest; 5]> {
    let outward = side.sign();
    let mut band = SmallVec::new();

    let count = rng.random_range(BAND_MIN_ENEMIES..=BAND_MAX_ENEMIES);
    for _ in 0..count {
        let x = watermark + outward * (BAND_ENEMY_OFFSET + rng.random::<f32>() * BAND_ENEMY_SPREAD);
        let on_platform = rng.random_bool(BAND_PLATFORM_CHANCE);
        band.push(enemy_at(x, on_platform, rng));
    }

    if rng.random_bool(BAND_PLANT_CHANCE) {
        let offset = match side {
            Facing::Right => BAND_RIGHT_PLANT_OFFSET,
            Facing::Left => BAND_LEFT_PLANT_OFFSET,
        };
        let x = watermark + outward * (offset + rng.random::<f32>() * BAND_PLANT_SPREAD);
        let on_platform = rng.random_bool(BAND_PLATFORM_CHANCE) && terrain.platform_available_at(x);
        band.push(plant_at(x, on_platform, rng));
    }

    band
}

/// A random x across the initial band, pushed out of the clearing around the origin.
fn initial_x(rng: &mut impl Rng, clearance: f32, push: f32) -> f32 {
    let x = (rng.random::<f32>() - INITIAL_BIAS) * INITIAL_SPREAD;
    if x.abs() < clearance {
        x + push * Facing::random(rng).sign()
    } else {
        x
    }
}

/// Plans the population present when a run starts.
///
/// Enemies are placed on the platform without checking that it exists there; those that land
/// in a gap simply drop to the ground on their first update.
pub fn plan_initial(rng: &mut impl Rng, terrain: &Terrain) -> Vec<SpawnRequest> {
    let mut requests = Vec::with_capacity((INITIAL_ENEMIES + INITIAL_PLANTS) as usize);

    for _ in 0..INITIAL_ENEMIES {
        let x = initial_x(rng, INITIAL_ENEMY_CLEARANCE, INITIAL_ENEMY_PUSH);
        let on_platform = rng.random_bool(INITIAL_PLATFORM_CHANCE);
        requests.push(enemy_at(x, on_platform, rng));
    }

    for _ in 0..INITIAL_PLANTS {
        let x = initial_x(rng, INITIAL_PLANT_CLEARANCE, INITIAL_PLANT_PUSH);
        let on_platform = rng.random_bool(INITIAL_PLATFORM_CHANCE) && terrain.platform_available_at(x);
        requests.push(plant_at(x, on_platform, rng));
    }

    requests
}

/// Extends the populated world whenever the player nears a watermark.
pub fn spawner_system(
    mut commands: Commands,
    terrain: Res<Terrain>,
    mut watermarks: ResMut<Watermarks>,
    mut rng: ResMut<SimRng>,
    players: Query<&Position, With<Player>>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok(position) = players.single() else {
        return;
    };
    let x = position.0.x;

    if x + LOOKAHEAD > watermarks.right {
        let band = plan_band(Facing::Right, watermarks.right, &mut rng.0, &terrain);
        spawn_band(&mut commands, band, &mut events);
        watermarks.right += STRIDE;
        debug!(watermark = watermarks.right, "Right watermark advanced");
    }

    if x - LOOKAHEAD < watermarks.left {
        let band = plan_band(Facing::Left, watermarks.left, &mut rng.0, &terrain);
        spawn_band(&mut commands, band, &mut events);
        watermarks.left -= STRIDE;
        debug!(watermark = watermarks.left, "Left watermark advanced");
    }
}

fn spawn_band(commands: &mut Commands, band: SmallVec<[SpawnRequest; 5]>, events: &mut EventWriter<SimEvent>) {
    for request in band {
        let kind = request.kind();
        let position = request.position();
        let target = request.spawn_with(commands);
        events.write(SimEvent::Spawned { target, kind, position });
    }
}
