use std::f32::consts::TAU;

use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::EventWriter,
    query::Without,
    system::{Commands, Query},
};
use rand::Rng;
use tracing::trace;

use crate::{
    constants::plant::{DETECT_RANGE_X, DETECT_RANGE_Y, FIRE_INTERVAL_TICKS, SWAY_STEP},
    events::SimEvent,
    systems::{
        components::{Facing, HitMarker, Position, ProjectileBundle},
        player::Player,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlantState {
    /// Swaying, tracking the player and firing while it is in range.
    #[default]
    Watching,
    Stunned {
        remaining: u16,
    },
    Dying {
        remaining: u16,
    },
    Dead,
}

impl PlantState {
    pub fn is_vulnerable(&self) -> bool {
        !matches!(self, PlantState::Dying { .. } | PlantState::Dead)
    }
}

/// A stationary turret that fires projectiles along its facing.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Plant {
    pub state: PlantState,
    pub fire_timer: u16,
    /// Cosmetic oscillation phase in radians.
    pub sway: f32,
}

impl Plant {
    pub fn new(fire_timer: u16, sway: f32) -> Self {
        Self {
            state: PlantState::Watching,
            fire_timer,
            sway,
        }
    }

    /// A plant with a random fire phase, so neighbours do not fire in lockstep.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(rng.random_range(0..FIRE_INTERVAL_TICKS), rng.random::<f32>() * TAU)
    }
}

/// Advances every plant by one tick and fires projectiles at the player.
pub fn plant_system(
    mut commands: Commands,
    players: Query<(&Player, &Position)>,
    mut plants: Query<(Entity, &mut Plant, &Position, &mut Facing, &mut HitMarker), Without<Player>>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((player, player_position)) = players.single() else {
        return;
    };
    let target = player_position.0;
    let live_strike = player.live_strike();

    for (entity, mut plant, position, mut facing, mut marker) in plants.iter_mut() {
        match plant.state {
            PlantState::Dead => {
                commands.entity(entity).despawn();
                continue;
            }
            PlantState::Dying { remaining } => {
                let remaining = remaining.saturating_sub(1);
                plant.state = if remaining == 0 {
                    PlantState::Dead
                } else {
                    PlantState::Dying { remaining }
                };
                continue;
            }
            PlantState::Stunned { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    marker.release(live_strike);
                    plant.state = PlantState::Watching;
                } else {
                    plant.state = PlantState::Stunned { remaining };
                }
                continue;
            }
            PlantState::Watching => {}
        }

        plant.sway = (plant.sway + SWAY_STEP).rem_euclid(TAU);

        let dx = target.x - position.0.x;
        let dy = (target.y - position.0.y).abs();
        if dx.abs() >= DETECT_RANGE_X || dy >= DETECT_RANGE_Y {
            continue;
        }

        *facing = Facing::toward(dx);
        plant.fire_timer += 1;
        if plant.fire_timer >= FIRE_INTERVAL_TICKS {
            plant.fire_timer = 0;
            let projectile = commands.spawn(ProjectileBundle::fired(position.0, *facing)).id();
            trace!(?entity, ?projectile, direction = %*facing, "Plant fired");
            events.write(SimEvent::ProjectileFired {
                plant: entity,
                projectile,
            });
        }
    }
}
