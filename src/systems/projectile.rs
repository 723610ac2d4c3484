use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::EventWriter,
    query::Without,
    system::{Commands, Query},
};
use tracing::trace;

use crate::{
    constants::{
        player::ATTACK_HITBOX_RANGE,
        projectile::{HIT_RANGE_X, HIT_RANGE_Y, PARRY_RANGE_Y},
    },
    events::{DamageSource, SimEvent},
    systems::{
        combat::damage_player,
        components::{Facing, Position},
        player::{Player, Vitals},
    },
};

/// A plant shot travelling in a straight line.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub vx: f32,
    /// Ticks left before the projectile expires.
    pub life: u16,
}

impl Projectile {
    pub fn new(vx: f32, life: u16) -> Self {
        Self { vx, life }
    }
}

/// Moves projectiles, expires them, and resolves parries and hits against the player.
pub fn projectile_system(
    mut commands: Commands,
    mut players: Query<(&Player, &Position, &Facing, &mut Vitals)>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Position), Without<Player>>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((player, player_position, facing, mut vitals)) = players.single_mut() else {
        return;
    };
    let target = player_position.0;
    let striking = player.live_strike().is_some();

    for (entity, mut projectile, mut position) in projectiles.iter_mut() {
        position.0.x += projectile.vx;
        projectile.life = projectile.life.saturating_sub(1);

        if projectile.life == 0 {
            commands.entity(entity).despawn();
            continue;
        }

        let dx = position.0.x - target.x;
        let dy = position.0.y - target.y;

        if striking && dx.abs() < ATTACK_HITBOX_RANGE && dy.abs() < PARRY_RANGE_Y && facing.faces(dx) {
            trace!(?entity, "Projectile parried");
            commands.entity(entity).despawn();
            events.write(SimEvent::ProjectileParried { projectile: entity });
            continue;
        }

        if !striking
            && dx.abs() < HIT_RANGE_X
            && dy.abs() < HIT_RANGE_Y
            && damage_player(&mut vitals, DamageSource::Projectile(entity), &mut events)
        {
            commands.entity(entity).despawn();
        }
    }
}
