use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::EventWriter,
    query::Without,
    system::{Commands, Query, Res},
};
use glam::Vec2;
use tracing::trace;

use crate::{
    constants::{
        enemy::{
            ATTACK_COOLDOWN_TICKS, ATTACK_HITBOX_X, ATTACK_HITBOX_Y, ATTACK_PHASE_TICKS, ATTACK_RANGE_X, ATTACK_RANGE_Y,
            CHASE_DEADBAND, DETECT_RANGE_X, DETECT_RANGE_Y, RUN_ANIM_TICKS, RUN_FRAMES, SPEED,
        },
        world::{FALL_GRAVITY, GROUND_Y, PLATFORM_Y},
    },
    events::{DamageSource, SimEvent},
    systems::{
        combat::damage_player,
        components::{Facing, HitMarker, Position, RunCycle},
        player::{Player, Vitals},
    },
    terrain::Terrain,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhase {
    Windup,
    Strike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyAttack {
    pub phase: AttackPhase,
    pub timer: u16,
    /// Whether this attack already damaged the player.
    pub landed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EnemyState {
    #[default]
    Idle,
    Chasing,
    Attacking(EnemyAttack),
    Stunned {
        remaining: u16,
        /// Fall speed interrupted by the strike, resumed once the stun ends.
        vy: f32,
    },
    Falling {
        vy: f32,
    },
    Dying {
        remaining: u16,
    },
    /// Removed from the world on its next update.
    Dead,
}

impl EnemyState {
    pub fn is_vulnerable(&self) -> bool {
        !matches!(self, EnemyState::Dying { .. } | EnemyState::Dead)
    }

    /// Downward speed carried by a fall, including one suspended by a stun.
    pub fn fall_velocity(&self) -> f32 {
        match *self {
            EnemyState::Falling { vy } | EnemyState::Stunned { vy, .. } => vy,
            _ => 0.0,
        }
    }
}

#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct Enemy {
    pub state: EnemyState,
    pub attack_cooldown: u16,
    pub run: RunCycle,
}

/// Whether an enemy at `position` stands on something: the main ground, or the platform where it exists.
pub fn is_supported(position: Vec2, terrain: &Terrain) -> bool {
    position.y >= GROUND_Y || (position.y == PLATFORM_Y && terrain.platform_available_at(position.x))
}

/// Advances every enemy by one tick: countdowns, falling, attacks and chasing.
pub fn enemy_system(
    mut commands: Commands,
    terrain: Res<Terrain>,
    mut players: Query<(&Player, &Position, &mut Vitals)>,
    mut enemies: Query<(Entity, &mut Enemy, &mut Position, &mut Facing, &mut HitMarker), Without<Player>>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((player, player_position, mut vitals)) = players.single_mut() else {
        return;
    };
    let target = player_position.0;
    let live_strike = player.live_strike();

    for (entity, mut enemy, mut position, mut facing, mut marker) in enemies.iter_mut() {
        match enemy.state {
            EnemyState::Dead => {
                commands.entity(entity).despawn();
                continue;
            }
            EnemyState::Dying { remaining } => {
                let remaining = remaining.saturating_sub(1);
                enemy.state = if remaining == 0 {
                    trace!(?entity, "Enemy dead");
                    EnemyState::Dead
                } else {
                    EnemyState::Dying { remaining }
                };
                continue;
            }
            EnemyState::Stunned { remaining, vy } => {
                let remaining = remaining.saturating_sub(1);
                enemy.state = if remaining > 0 {
                    EnemyState::Stunned { remaining, vy }
                } else {
                    marker.release(live_strike);
                    if vy > 0.0 {
                        EnemyState::Falling { vy }
                    } else {
                        EnemyState::Idle
                    }
                };
                continue;
            }
            _ => {}
        }

        enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(1);

        if !matches!(enemy.state, EnemyState::Falling { .. }) && !is_supported(position.0, &terrain) {
            trace!(?entity, x = position.0.x, "Enemy lost its footing");
            enemy.state = EnemyState::Falling { vy: 0.0 };
        }

        if let EnemyState::Falling { mut vy } = enemy.state {
            vy += FALL_GRAVITY;
            position.0.y += vy;
            enemy.state = if position.0.y >= GROUND_Y {
                position.0.y = GROUND_Y;
                EnemyState::Idle
            } else {
                EnemyState::Falling { vy }
            };
            continue;
        }

        let dx = target.x - position.0.x;
        let dy = (target.y - position.0.y).abs();

        if let EnemyState::Attacking(mut attack) = enemy.state {
            attack.timer += 1;
            if attack.timer < ATTACK_PHASE_TICKS {
                enemy.state = EnemyState::Attacking(attack);
                continue;
            }

            match attack.phase {
                AttackPhase::Windup => {
                    attack.phase = AttackPhase::Strike;
                    attack.timer = 0;
                    if !attack.landed
                        && dy < ATTACK_HITBOX_Y
                        && dx.abs() < ATTACK_HITBOX_X
                        && damage_player(&mut vitals, DamageSource::Enemy(entity), &mut events)
                    {
                        attack.landed = true;
                    }
                    enemy.state = EnemyState::Attacking(attack);
                }
                AttackPhase::Strike => {
                    enemy.state = EnemyState::Idle;
                    enemy.attack_cooldown = ATTACK_COOLDOWN_TICKS;
                }
            }
            continue;
        }

        if dx.abs() < DETECT_RANGE_X && dy < DETECT_RANGE_Y {
            *facing = Facing::toward(dx);

            if dx.abs() < ATTACK_RANGE_X && dy < ATTACK_RANGE_Y && enemy.attack_cooldown == 0 {
                trace!(?entity, "Enemy winding up");
                enemy.state = EnemyState::Attacking(EnemyAttack {
                    phase: AttackPhase::Windup,
                    timer: 0,
                    landed: false,
                });
                continue;
            }

            enemy.state = EnemyState::Chasing;
            if dx > CHASE_DEADBAND {
                position.0.x += SPEED;
            } else if dx < -CHASE_DEADBAND {
                position.0.x -= SPEED;
            }
            enemy.run.advance(RUN_FRAMES, RUN_ANIM_TICKS);
        } else {
            enemy.state = EnemyState::Idle;
            enemy.run.reset();
        }
    }
}
