use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::Without,
    system::Query,
};
use tracing::{debug, info};

use crate::{
    constants::{
        combat::{DEATH_TICKS, KNOCKBACK_DISTANCE, STUN_TICKS},
        player::ATTACK_HITBOX_RANGE,
    },
    events::{DamageSource, SimEvent},
    systems::{
        components::{AgentKind, Facing, Health, HitMarker, Position},
        enemy::{Enemy, EnemyState},
        plant::{Plant, PlantState},
        player::{Player, Vitals},
    },
};

/// Horizontal offset from the player to a target inside the strike's reach, on the faced side.
pub fn strike_reaches(player_x: f32, facing: Facing, target_x: f32) -> Option<f32> {
    let dx = target_x - player_x;
    (dx.abs() < ATTACK_HITBOX_RANGE && facing.faces(dx)).then_some(dx)
}

/// Applies one damage point to the player unless invulnerable, reporting the outcome.
///
/// Returns whether the hit landed.
pub fn damage_player(vitals: &mut Vitals, source: DamageSource, events: &mut EventWriter<SimEvent>) -> bool {
    let Some(remaining) = vitals.take_hit() else {
        return false;
    };

    debug!(?source, remaining, "Player damaged");
    events.write(SimEvent::PlayerDamaged { source, remaining });

    if vitals.mark_defeated() {
        info!("Player health depleted");
        events.write(SimEvent::PlayerDefeated);
    }
    true
}

/// Resolves the player's live strike against every enemy and plant.
///
/// A target takes at most one point of damage per strike activation; the hit marker remembers
/// the activation so the remaining ticks of the same swing pass over it.
pub fn strike_resolution_system(
    players: Query<(&Player, &Position, &Facing)>,
    mut enemies: Query<(Entity, &mut Enemy, &mut Position, &mut Health, &mut HitMarker), Without<Player>>,
    mut plants: Query<(Entity, &mut Plant, &Position, &mut Health, &mut HitMarker), (Without<Player>, Without<Enemy>)>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((player, player_position, facing)) = players.single() else {
        return;
    };
    let Some(strike) = player.live_strike() else {
        return;
    };
    let origin = player_position.0.x;

    for (entity, mut enemy, mut position, mut health, mut marker) in enemies.iter_mut() {
        if !enemy.state.is_vulnerable() || marker.was_hit_by(strike) {
            continue;
        }
        let Some(dx) = strike_reaches(origin, *facing, position.0.x) else {
            continue;
        };

        marker.0 = Some(strike);
        position.0.x += Facing::toward(dx).sign() * KNOCKBACK_DISTANCE;

        let remaining = health.wound();
        events.write(SimEvent::StrikeLanded {
            target: entity,
            kind: AgentKind::Enemy,
            strike: strike.kind,
            remaining,
        });

        // Any attack in progress is cancelled by the stun.
        if remaining == 0 {
            enemy.state = EnemyState::Dying { remaining: DEATH_TICKS };
            debug!(?entity, x = position.0.x, "Enemy killed");
            events.write(SimEvent::TargetKilled {
                target: entity,
                kind: AgentKind::Enemy,
            });
        } else {
            let vy = enemy.state.fall_velocity();
            enemy.state = EnemyState::Stunned { remaining: STUN_TICKS, vy };
            debug!(?entity, remaining, "Enemy struck");
        }
    }

    for (entity, mut plant, position, mut health, mut marker) in plants.iter_mut() {
        if !plant.state.is_vulnerable() || marker.was_hit_by(strike) {
            continue;
        }
        if strike_reaches(origin, *facing, position.0.x).is_none() {
            continue;
        }

        marker.0 = Some(strike);

        let remaining = health.wound();
        events.write(SimEvent::StrikeLanded {
            target: entity,
            kind: AgentKind::Plant,
            strike: strike.kind,
            remaining,
        });

        if remaining == 0 {
            plant.state = PlantState::Dying { remaining: DEATH_TICKS };
            debug!(?entity, x = position.0.x, "Plant killed");
            events.write(SimEvent::TargetKilled {
                target: entity,
                kind: AgentKind::Plant,
            });
        } else {
            plant.state = PlantState::Stunned { remaining: STUN_TICKS };
            debug!(?entity, remaining, "Plant struck");
        }
    }
}
