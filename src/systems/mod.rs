//! The Entity-Component-System (ECS) module.
//!
//! Every pooled agent is an entity; every state machine is a closed enum on a component.
//! Systems here run once per tick in the order set up by [`crate::simulation::Simulation`].

pub mod camera;
pub mod combat;
pub mod components;
pub mod enemy;
pub mod input;
pub mod plant;
pub mod player;
pub mod projectile;
pub mod spawner;

pub use self::camera::{camera_follow_system, CameraFollow};
pub use self::combat::{damage_player, strike_reaches, strike_resolution_system};
pub use self::components::{
    AgentKind, ComboStage, EnemyBundle, Facing, Health, HitMarker, PlantBundle, PlayerBundle, Position, ProjectileBundle,
    RunCycle, SimRng, StrikeId, StrikeKind, TickCount,
};
pub use self::enemy::{enemy_system, AttackPhase, Enemy, EnemyAttack, EnemyState};
pub use self::input::{clear_input_edges_system, InputLatch, Key, Keys};
pub use self::plant::{plant_system, Plant, PlantState};
pub use self::player::{
    player_input_system, player_motion_system, Dash, DashResume, Ground, GroundAttack, Player, PlayerAction, PlayerState,
    Vitals,
};
pub use self::projectile::{projectile_system, Projectile};
pub use self::spawner::{plan_band, plan_initial, spawner_system, spawning_enabled, SpawnRequest, SpawnerSettings, Watermarks};
