//! This module contains all the tuning constants used by the simulation.
//!
//! World space uses a downward-growing y axis: the main ground sits at `y = 0` and the
//! elevated platform at [`world::PLATFORM_Y`]. All distances are in world units and all
//! durations in ticks unless noted otherwise.

use std::time::Duration;

/// Number of simulation ticks per second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Duration of a single simulation tick (1000/60 ms).
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / TICKS_PER_SECOND as f64) as u64);

/// Upper bound on the wall-clock delta a single host callback may feed into the stepper.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

pub mod world {
    /// Height of the main ground.
    pub const GROUND_Y: f32 = 0.0;
    /// Height of the elevated platform.
    pub const PLATFORM_Y: f32 = -545.0;
    /// Vertical offset of the ground line on screen, before layout scaling.
    pub const GROUND_OFFSET_BASE: f32 = 590.0;
    /// Background-pixel column where the platform gap begins.
    pub const PLATFORM_GAP_START: f32 = 4360.0;
    /// Background-pixel column where the platform gap ends (inclusive).
    pub const PLATFORM_GAP_END: f32 = 8260.0;
    /// Gravity applied while rising.
    pub const GRAVITY: f32 = 0.8;
    /// Gravity applied while falling.
    pub const FALL_GRAVITY: f32 = 1.6;
    /// Fraction of the remaining distance the camera closes every tick.
    pub const CAMERA_FOLLOW_RATE: f32 = 0.12;
}

pub mod player {
    pub const RUN_SPEED: f32 = 10.0;
    pub const JUMP_POWER: f32 = -29.0;
    pub const MAX_HEALTH: u8 = 7;
    pub const MAX_STAMINA: u8 = 15;
    /// Ticks needed to regenerate one stamina point.
    pub const STAMINA_REGEN_TICKS: u16 = 30;
    /// Invulnerability window after taking damage.
    pub const HIT_COOLDOWN_TICKS: u16 = 40;
    /// Ticks between combo stages.
    pub const ATTACK_DELAY: u16 = 18;
    /// Horizontal reach of a strike, on the faced side only.
    pub const ATTACK_HITBOX_RANGE: f32 = 180.0;
    /// Camera shake applied near the end of each combo stage.
    pub const SHAKE_INTENSITY: f32 = 5.0;
    pub const RUN_FRAMES: u8 = 8;
    pub const RUN_ANIM_TICKS: u8 = 5;
}

pub mod dash {
    pub const SPEED: f32 = 35.0;
    pub const DURATION_TICKS: u16 = 10;
    /// Counted from the tick the dash starts.
    pub const COOLDOWN_TICKS: u16 = 20;
    pub const STAMINA_COST: u8 = 2;
    /// Vertical velocity restored after an airborne dash that began while rising.
    pub const DEFAULT_FALL_VELOCITY: f32 = 2.0;
}

pub mod enemy {
    pub const MAX_HEALTH: u8 = 4;
    pub const SPEED: f32 = 3.0;
    /// Horizontal distance inside which a chasing enemy stops closing in.
    pub const CHASE_DEADBAND: f32 = 10.0;
    pub const DETECT_RANGE_X: f32 = 600.0;
    pub const DETECT_RANGE_Y: f32 = 200.0;
    pub const ATTACK_RANGE_X: f32 = 80.0;
    pub const ATTACK_RANGE_Y: f32 = 100.0;
    /// Length of both the windup and the strike phase.
    pub const ATTACK_PHASE_TICKS: u16 = 16;
    pub const ATTACK_HITBOX_X: f32 = 120.0;
    pub const ATTACK_HITBOX_Y: f32 = 100.0;
    pub const ATTACK_COOLDOWN_TICKS: u16 = 50;
    pub const RUN_FRAMES: u8 = 4;
    pub const RUN_ANIM_TICKS: u8 = 8;
}

pub mod plant {
    pub const MAX_HEALTH: u8 = 2;
    pub const DETECT_RANGE_X: f32 = 1200.0;
    pub const DETECT_RANGE_Y: f32 = 200.0;
    pub const FIRE_INTERVAL_TICKS: u16 = 40;
    /// Radians added to the sway phase every tick.
    pub const SWAY_STEP: f32 = 0.05;
}

pub mod projectile {
    pub const SPEED: f32 = 6.0;
    pub const LIFETIME_TICKS: u16 = 180;
    /// Vertical band in which a live strike destroys a projectile.
    pub const PARRY_RANGE_Y: f32 = 80.0;
    pub const HIT_RANGE_X: f32 = 40.0;
    pub const HIT_RANGE_Y: f32 = 60.0;
}

/// Shared by enemies and plants.
pub mod combat {
    pub const KNOCKBACK_DISTANCE: f32 = 20.0;
    pub const STUN_TICKS: u16 = 12;
    pub const DEATH_TICKS: u16 = 30;
}

pub mod spawner {
    /// How far past the player a band must already be populated.
    pub const LOOKAHEAD: f32 = 2000.0;
    pub const INITIAL_RIGHT_WATERMARK: f32 = 5000.0;
    pub const INITIAL_LEFT_WATERMARK: f32 = -3000.0;
    pub const STRIDE: f32 = 1500.0;

    pub const BAND_MIN_ENEMIES: u32 = 2;
    pub const BAND_MAX_ENEMIES: u32 = 4;
    pub const BAND_ENEMY_OFFSET: f32 = 300.0;
    pub const BAND_ENEMY_SPREAD: f32 = 800.0;
    pub const BAND_PLANT_CHANCE: f64 = 0.5;
    pub const BAND_RIGHT_PLANT_OFFSET: f32 = 400.0;
    pub const BAND_LEFT_PLANT_OFFSET: f32 = 200.0;
    pub const BAND_PLANT_SPREAD: f32 = 600.0;
    pub const BAND_PLATFORM_CHANCE: f64 = 0.35;

    pub const INITIAL_ENEMIES: u32 = 8;
    pub const INITIAL_PLANTS: u32 = 4;
    pub const INITIAL_SPREAD: f32 = 8000.0;
    /// Skews the initial band towards the right of the origin.
    pub const INITIAL_BIAS: f32 = 0.3;
    pub const INITIAL_ENEMY_CLEARANCE: f32 = 500.0;
    pub const INITIAL_ENEMY_PUSH: f32 = 800.0;
    pub const INITIAL_PLANT_CLEARANCE: f32 = 600.0;
    pub const INITIAL_PLANT_PUSH: f32 = 900.0;
    pub const INITIAL_PLATFORM_CHANCE: f64 = 0.4;
}
