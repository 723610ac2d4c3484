use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use strum_macros::{AsRefStr, Display};

use crate::constants::{self, projectile::LIFETIME_TICKS};
use crate::systems::{
    enemy::Enemy,
    plant::Plant,
    player::{Player, Vitals},
    projectile::Projectile,
};

/// World-space position. `x` grows to the right, `y` grows downward with the main ground at 0.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// The facing that looks from an origin towards a point `dx` away.
    pub fn toward(dx: f32) -> Self {
        if dx > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Whether a point `dx` away lies on the faced side. A point straight ahead (`dx == 0`) counts as left.
    pub fn faces(self, dx: f32) -> bool {
        Facing::toward(dx) == self
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.random_bool(0.5) {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

/// Hit points of an enemy or plant.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: u8,
    pub max: u8,
}

impl Health {
    pub fn full(max: u8) -> Self {
        Self { current: max, max }
    }

    /// Removes one point, never going below zero, and returns what is left.
    pub fn wound(&mut self) -> u8 {
        self.current = self.current.saturating_sub(1);
        self.current
    }
}

/// One step of the grounded attack chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboStage {
    One,
    Two,
    Three,
}

impl ComboStage {
    pub fn next(self) -> Self {
        match self {
            ComboStage::One => ComboStage::Two,
            ComboStage::Two => ComboStage::Three,
            ComboStage::Three => ComboStage::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            ComboStage::One => 1,
            ComboStage::Two => 2,
            ComboStage::Three => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrikeKind {
    Ground(ComboStage),
    Air,
}

/// Identifies a single strike activation: one combo stage being entered, or one air attack.
///
/// The serial is unique per player, so two activations of the same stage never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrikeId {
    pub kind: StrikeKind,
    pub serial: u32,
}

/// Remembers which strike last damaged a target.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitMarker(pub Option<StrikeId>);

impl HitMarker {
    pub fn was_hit_by(&self, strike: StrikeId) -> bool {
        self.0 == Some(strike)
    }

    /// Forgets the marker unless it belongs to the strike that is still live.
    pub fn release(&mut self, live: Option<StrikeId>) {
        if self.0.is_some() && self.0 != live {
            self.0 = None;
        }
    }
}

/// Looping animation counter advanced while an agent runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunCycle {
    pub frame: u8,
    timer: u8,
}

impl RunCycle {
    pub fn advance(&mut self, frames: u8, ticks_per_frame: u8) {
        self.timer += 1;
        if self.timer >= ticks_per_frame {
            self.frame = (self.frame + 1) % frames;
            self.timer = 0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Kinds of agents that can be struck and spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum AgentKind {
    Enemy,
    Plant,
}

/// The simulation's only source of randomness.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_os_rng()),
        }
    }
}

/// Number of ticks completed so far.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickCount(pub u64);

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: Player,
    pub vitals: Vitals,
    pub position: Position,
    pub facing: Facing,
}

impl Default for PlayerBundle {
    fn default() -> Self {
        Self {
            player: Player::default(),
            vitals: Vitals::default(),
            position: Position::new(0.0, constants::world::GROUND_Y),
            facing: Facing::Right,
        }
    }
}

#[derive(Bundle)]
pub struct EnemyBundle {
    pub enemy: Enemy,
    pub position: Position,
    pub facing: Facing,
    pub health: Health,
    pub marker: HitMarker,
}

impl EnemyBundle {
    pub fn new(position: Vec2, facing: Facing) -> Self {
        Self {
            enemy: Enemy::default(),
            position: Position(position),
            facing,
            health: Health::full(constants::enemy::MAX_HEALTH),
            marker: HitMarker::default(),
        }
    }
}

#[derive(Bundle)]
pub struct PlantBundle {
    pub plant: Plant,
    pub position: Position,
    pub facing: Facing,
    pub health: Health,
    pub marker: HitMarker,
}

impl PlantBundle {
    pub fn new(position: Vec2, facing: Facing, plant: Plant) -> Self {
        Self {
            plant,
            position: Position(position),
            facing,
            health: Health::full(constants::plant::MAX_HEALTH),
            marker: HitMarker::default(),
        }
    }
}

#[derive(Bundle)]
pub struct ProjectileBundle {
    pub projectile: Projectile,
    pub position: Position,
}

impl ProjectileBundle {
    /// A projectile leaving `origin` towards `facing`.
    pub fn fired(origin: Vec2, facing: Facing) -> Self {
        Self {
            projectile: Projectile::new(facing.sign() * constants::projectile::SPEED, LIFETIME_TICKS),
            position: Position(origin),
        }
    }
}
