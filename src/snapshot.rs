//! Read-only views of the simulation for renderers.
//!
//! A snapshot owns all of its data, so a renderer can keep it across ticks without touching
//! the world.

use bevy_ecs::{entity::Entity, world::World};

use crate::{
    error::{SimError, SimResult},
    systems::{
        CameraFollow, Enemy, EnemyState, Facing, Health, Plant, PlantState, Player, PlayerAction, Position, Projectile,
        TickCount, Vitals, Watermarks,
    },
    terrain::Terrain,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub x: f32,
    /// Horizontal scroll of the world under the centred player, always `-x`.
    pub scroll_offset: f32,
    pub y: f32,
    pub facing: Facing,
    pub action: PlayerAction,
    /// Combo step 1..=3 while ground-attacking.
    pub combo_stage: Option<u8>,
    pub run_frame: u8,
    pub dash_frame: Option<u8>,
    pub jump_count: u8,
    pub on_platform: bool,
    pub health: u8,
    pub stamina: u8,
    pub invulnerable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemySnapshot {
    pub entity: Entity,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub state: EnemyState,
    pub frame: u8,
    pub health: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlantSnapshot {
    pub entity: Entity,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub state: PlantState,
    pub sway: f32,
    pub health: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSnapshot {
    pub entity: Entity,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub life: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    pub y: f32,
    pub ground_offset: f32,
    pub shake: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimSnapshot {
    pub tick: u64,
    pub player: PlayerSnapshot,
    pub enemies: Vec<EnemySnapshot>,
    pub plants: Vec<PlantSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub camera: CameraSnapshot,
    pub watermarks: Watermarks,
}

impl SimSnapshot {
    /// Copies the current state out of `world`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidState`] when the world has no single player or lacks a simulation resource.
    pub fn capture(world: &mut World) -> SimResult<Self> {
        let (player, shake) = {
            let mut query = world.query::<(&Player, &Vitals, &Position, &Facing)>();
            let (player, vitals, position, facing) = query
                .single(world)
                .map_err(|e| SimError::InvalidState(format!("player lookup failed: {e}")))?;

            let snapshot = PlayerSnapshot {
                x: position.0.x,
                scroll_offset: -position.0.x,
                y: position.0.y,
                facing: *facing,
                action: player.state.action(),
                combo_stage: player.combo_stage().map(|stage| stage.number()),
                run_frame: player.run.frame,
                dash_frame: player.dash_frame(),
                jump_count: player.jump_count,
                on_platform: player.on_platform(),
                health: vitals.health,
                stamina: vitals.stamina,
                invulnerable: vitals.is_invulnerable(),
            };
            (snapshot, player.shake_intensity())
        };

        let enemies = world
            .query::<(Entity, &Enemy, &Position, &Facing, &Health)>()
            .iter(world)
            .map(|(entity, enemy, position, facing, health)| EnemySnapshot {
                entity,
                x: position.0.x,
                y: position.0.y,
                facing: *facing,
                state: enemy.state,
                frame: enemy.run.frame,
                health: health.current,
            })
            .collect();

        let plants = world
            .query::<(Entity, &Plant, &Position, &Facing, &Health)>()
            .iter(world)
            .map(|(entity, plant, position, facing, health)| PlantSnapshot {
                entity,
                x: position.0.x,
                y: position.0.y,
                facing: *facing,
                state: plant.state,
                sway: plant.sway,
                health: health.current,
            })
            .collect();

        let projectiles = world
            .query::<(Entity, &Projectile, &Position)>()
            .iter(world)
            .map(|(entity, projectile, position)| ProjectileSnapshot {
                entity,
                x: position.0.x,
                y: position.0.y,
                vx: projectile.vx,
                life: projectile.life,
            })
            .collect();

        let tick = world
            .get_resource::<TickCount>()
            .map(|tick| tick.0)
            .ok_or_else(|| missing("TickCount"))?;
        let camera_y = world
            .get_resource::<CameraFollow>()
            .map(|camera| camera.y)
            .ok_or_else(|| missing("CameraFollow"))?;
        let ground_offset = world
            .get_resource::<Terrain>()
            .map(|terrain| terrain.ground_offset())
            .ok_or_else(|| missing("Terrain"))?;
        let watermarks = *world.get_resource::<Watermarks>().ok_or_else(|| missing("Watermarks"))?;

        Ok(SimSnapshot {
            tick,
            player,
            enemies,
            plants,
            projectiles,
            camera: CameraSnapshot {
                y: camera_y,
                ground_offset,
                shake,
            },
            watermarks,
        })
    }

    pub fn enemy(&self, entity: Entity) -> Option<&EnemySnapshot> {
        self.enemies.iter().find(|enemy| enemy.entity == entity)
    }

    pub fn plant(&self, entity: Entity) -> Option<&PlantSnapshot> {
        self.plants.iter().find(|plant| plant.entity == entity)
    }
}

fn missing(resource: &str) -> SimError {
    SimError::InvalidState(format!("missing resource: {resource}"))
}
