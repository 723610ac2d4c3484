use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::systems::components::{AgentKind, Facing, StrikeKind};

/// What damaged the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageSource {
    Enemy(Entity),
    Projectile(Entity),
}

/// Notable moments of a tick, for hosts that play sounds or effects.
///
/// Events accumulate until the host drains them, so several ticks run in one frame are all reported.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    StrikeLanded {
        target: Entity,
        kind: AgentKind,
        strike: StrikeKind,
        remaining: u8,
    },
    TargetKilled {
        target: Entity,
        kind: AgentKind,
    },
    ProjectileFired {
        plant: Entity,
        projectile: Entity,
    },
    ProjectileParried {
        projectile: Entity,
    },
    PlayerDamaged {
        source: DamageSource,
        remaining: u8,
    },
    /// Sent once, the first time the player's health reaches zero.
    PlayerDefeated,
    DashStarted {
        direction: Facing,
    },
    Spawned {
        target: Entity,
        kind: AgentKind,
        position: Vec2,
    },
}
