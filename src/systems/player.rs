use bevy_ecs::{
    component::Component,
    event::EventWriter,
    system::{Query, Res},
};
use strum_macros::AsRefStr;
use tracing::{debug, trace};

use crate::{
    constants::{
        dash,
        player::{
            ATTACK_DELAY, HIT_COOLDOWN_TICKS, JUMP_POWER, MAX_HEALTH, MAX_STAMINA, RUN_ANIM_TICKS, RUN_FRAMES, RUN_SPEED,
            SHAKE_INTENSITY, STAMINA_REGEN_TICKS,
        },
        world::{FALL_GRAVITY, GRAVITY, GROUND_Y, PLATFORM_Y},
    },
    events::SimEvent,
    systems::{
        components::{ComboStage, Facing, Position, RunCycle, StrikeId, StrikeKind},
        input::{InputLatch, Key},
    },
    terrain::Terrain,
};

/// The surface the player stands on, or will land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ground {
    #[default]
    Main,
    Platform,
}

impl Ground {
    pub fn height(self) -> f32 {
        match self {
            Ground::Main => GROUND_Y,
            Ground::Platform => PLATFORM_Y,
        }
    }
}

/// An ongoing grounded combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundAttack {
    pub stage: ComboStage,
    /// Ticks spent in the current stage.
    pub timer: u16,
    pub strike: StrikeId,
}

/// State restored once a dash runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashResume {
    Grounded,
    Airborne { air_strike: Option<StrikeId> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub remaining: u16,
    pub direction: Facing,
    /// Run frame shown for the whole dash.
    pub frame: u8,
    pub pre_dash_vy: f32,
    pub resume: DashResume,
}

/// Mutually exclusive action states. Exactly one drives physics and animation each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Running,
    Attacking(GroundAttack),
    Jumping {
        air_strike: Option<StrikeId>,
    },
    Dashing(Dash),
}

impl PlayerState {
    pub fn is_airborne(&self) -> bool {
        match self {
            PlayerState::Jumping { .. } => true,
            PlayerState::Dashing(dash) => matches!(dash.resume, DashResume::Airborne { .. }),
            _ => false,
        }
    }

    /// The strike that can currently land. Dashing suspends all attacks.
    pub fn live_strike(&self) -> Option<StrikeId> {
        match self {
            PlayerState::Attacking(attack) => Some(attack.strike),
            PlayerState::Jumping { air_strike } => *air_strike,
            _ => None,
        }
    }

    pub fn action(&self) -> PlayerAction {
        match self {
            PlayerState::Idle => PlayerAction::Idle,
            PlayerState::Running => PlayerAction::Running,
            PlayerState::Attacking(_) => PlayerAction::Attacking,
            PlayerState::Jumping { air_strike: Some(_) } => PlayerAction::AirAttacking,
            PlayerState::Jumping { air_strike: None } => PlayerAction::Jumping,
            PlayerState::Dashing(_) => PlayerAction::Dashing,
        }
    }
}

/// Flat action tag for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PlayerAction {
    Idle,
    Running,
    Attacking,
    Jumping,
    AirAttacking,
    Dashing,
}

#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct Player {
    pub state: PlayerState,
    pub vy: f32,
    /// 0 on the main ground, 1 after a launch, 2 once the second jump edge or a platform launch is used.
    pub jump_count: u8,
    pub ground: Ground,
    pub dash_cooldown: u16,
    pub run: RunCycle,
    strike_serial: u32,
}

impl Player {
    pub fn on_platform(&self) -> bool {
        self.ground == Ground::Platform && !self.state.is_airborne()
    }

    pub fn live_strike(&self) -> Option<StrikeId> {
        self.state.live_strike()
    }

    pub fn combo_stage(&self) -> Option<ComboStage> {
        match self.state {
            PlayerState::Attacking(attack) => Some(attack.stage),
            _ => None,
        }
    }

    /// Screen shake requested by the last few ticks of each combo stage.
    pub fn shake_intensity(&self) -> f32 {
        match self.state {
            PlayerState::Attacking(attack) if attack.timer > ATTACK_DELAY - 5 && attack.timer < ATTACK_DELAY => {
                SHAKE_INTENSITY
            }
            _ => 0.0,
        }
    }

    /// Frame the renderer should hold while dashing.
    pub fn dash_frame(&self) -> Option<u8> {
        match self.state {
            PlayerState::Dashing(dash) => Some(dash.frame),
            _ => None,
        }
    }

    fn next_strike(&mut self, kind: StrikeKind) -> StrikeId {
        self.strike_serial = self.strike_serial.wrapping_add(1);
        StrikeId {
            kind,
            serial: self.strike_serial,
        }
    }

    fn launch(&mut self, jump_count: u8, ground: Ground) {
        self.state = PlayerState::Jumping { air_strike: None };
        self.vy = JUMP_POWER;
        self.jump_count = jump_count;
        self.ground = ground;
    }

    /// Leaves the platform with no impulse and heads for the main ground.
    fn fall(&mut self) {
        self.state = PlayerState::Jumping { air_strike: None };
        self.vy = 0.0;
        self.ground = Ground::Main;
        self.jump_count = 0;
    }

    /// Handles a jump-key edge.
    pub fn jump(&mut self) {
        match self.state {
            PlayerState::Attacking(_) | PlayerState::Dashing(_) => {}
            // The second edge spends the double-jump budget without a new impulse.
            PlayerState::Jumping { .. } => {
                if self.jump_count == 1 {
                    self.jump_count = 2;
                }
            }
            PlayerState::Idle | PlayerState::Running => {
                if self.ground == Ground::Platform {
                    self.launch(2, Ground::Platform);
                } else {
                    self.launch(1, Ground::Main);
                }
                trace!(jump_count = self.jump_count, "Player launched");
            }
        }
    }

    /// Handles a drop-key edge.
    pub fn drop_through(&mut self) {
        if self.on_platform() && !matches!(self.state, PlayerState::Dashing(_)) {
            trace!("Player dropped through the platform");
            self.fall();
        }
    }

    /// Handles an attack-key edge while airborne.
    pub fn air_attack(&mut self) {
        if let PlayerState::Jumping { air_strike: None } = self.state {
            let strike = self.next_strike(StrikeKind::Air);
            self.state = PlayerState::Jumping { air_strike: Some(strike) };
        }
    }

    /// Handles a dash-key edge, returning whether a dash started.
    pub fn try_dash(&mut self, vitals: &mut Vitals, facing: Facing) -> bool {
        if self.dash_cooldown > 0 {
            return false;
        }

        let resume = match self.state {
            PlayerState::Idle | PlayerState::Running => DashResume::Grounded,
            PlayerState::Jumping { air_strike } => DashResume::Airborne { air_strike },
            PlayerState::Attacking(_) | PlayerState::Dashing(_) => return false,
        };

        if !vitals.try_spend(dash::STAMINA_COST) {
            return false;
        }

        self.state = PlayerState::Dashing(Dash {
            remaining: dash::DURATION_TICKS,
            direction: facing,
            frame: self.run.frame,
            pre_dash_vy: self.vy,
            resume,
        });
        self.dash_cooldown = dash::COOLDOWN_TICKS;
        true
    }

    fn advance_dash(&mut self, mut dash: Dash, position: &mut Position) {
        dash.remaining = dash.remaining.saturating_sub(1);
        position.0.x += dash::SPEED * dash.direction.sign();

        if dash.remaining > 0 {
            self.state = PlayerState::Dashing(dash);
            return;
        }

        self.state = match dash.resume {
            DashResume::Grounded => PlayerState::Idle,
            DashResume::Airborne { air_strike } => {
                self.vy = if dash.pre_dash_vy > 0.0 {
                    dash.pre_dash_vy
                } else {
                    dash::DEFAULT_FALL_VELOCITY
                };
                PlayerState::Jumping { air_strike }
            }
        };
        trace!(x = position.0.x, "Dash finished");
    }

    fn advance_airborne(&mut self, latch: &InputLatch, terrain: &Terrain, position: &mut Position, facing: &mut Facing) {
        self.vy += if self.vy < 0.0 { GRAVITY } else { FALL_GRAVITY };
        position.0.y += self.vy;

        // With the jump budget spent, a descent snaps onto the platform wherever it exists.
        if self.jump_count >= 2
            && self.vy > 0.0
            && self.ground == Ground::Main
            && terrain.platform_available_at(position.0.x)
            && position.0.y >= PLATFORM_Y
        {
            position.0.y = PLATFORM_Y;
            self.vy = 0.0;
            self.ground = Ground::Platform;
            self.state = PlayerState::Idle;
            trace!(x = position.0.x, "Player landed on the platform");
            return;
        }

        let ground_height = self.ground.height();
        if position.0.y >= ground_height {
            position.0.y = ground_height;
            self.vy = 0.0;
            self.state = PlayerState::Idle;
            if self.ground == Ground::Main {
                self.jump_count = 0;
            }
            trace!(x = position.0.x, ground = ?self.ground, "Player landed");
        }

        if let Some(direction) = latch.horizontal() {
            position.0.x += direction.sign() * RUN_SPEED;
            *facing = direction;
        }
    }

    fn advance_grounded(&mut self, latch: &InputLatch, vitals: &mut Vitals, position: &mut Position, facing: &mut Facing) {
        if latch.engaged(Key::Attack) {
            let current = self.state;
            let attack = match current {
                PlayerState::Attacking(attack) => Some(attack),
                _ if vitals.try_spend(1) => Some(GroundAttack {
                    stage: ComboStage::One,
                    timer: 0,
                    strike: self.next_strike(StrikeKind::Ground(ComboStage::One)),
                }),
                // Without stamina the held key pins the player in place.
                _ => None,
            };

            self.state = match attack {
                Some(mut attack) => {
                    attack.timer += 1;
                    if attack.timer >= ATTACK_DELAY {
                        attack.timer = 0;
                        // Out of stamina the stage holds until release or regeneration.
                        if vitals.try_spend(1) {
                            attack.stage = attack.stage.next();
                            attack.strike = self.next_strike(StrikeKind::Ground(attack.stage));
                            debug!(stage = attack.stage.number(), stamina = vitals.stamina, "Combo advanced");
                        }
                    }
                    PlayerState::Attacking(attack)
                }
                None => PlayerState::Idle,
            };
            return;
        }

        match latch.horizontal() {
            Some(direction) => {
                position.0.x += direction.sign() * RUN_SPEED;
                *facing = direction;
                self.state = PlayerState::Running;
                self.run.advance(RUN_FRAMES, RUN_ANIM_TICKS);
            }
            None => {
                self.state = PlayerState::Idle;
                self.run.reset();
            }
        }
    }
}

/// Health, stamina and the invulnerability window.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub health: u8,
    pub stamina: u8,
    pub hit_cooldown: u16,
    regen_timer: u16,
    spent_this_tick: bool,
    defeated: bool,
}

impl Default for Vitals {
    fn default() -> Self {
        Self::new(MAX_HEALTH, MAX_STAMINA)
    }
}

impl Vitals {
    /// Values above the maximum are clamped.
    pub fn new(health: u8, stamina: u8) -> Self {
        Self {
            health: health.min(MAX_HEALTH),
            stamina: stamina.min(MAX_STAMINA),
            hit_cooldown: 0,
            regen_timer: 0,
            spent_this_tick: false,
            defeated: false,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.hit_cooldown > 0
    }

    /// Spends `cost` stamina if enough is available. Spending restarts the regeneration counter.
    pub fn try_spend(&mut self, cost: u8) -> bool {
        if self.stamina < cost {
            return false;
        }
        self.stamina -= cost;
        self.regen_timer = 0;
        self.spent_this_tick = true;
        true
    }

    /// Applies one damage point unless invulnerable. Returns the remaining health when the hit lands.
    pub fn take_hit(&mut self) -> Option<u8> {
        if self.is_invulnerable() {
            return None;
        }
        self.health = self.health.saturating_sub(1);
        self.hit_cooldown = HIT_COOLDOWN_TICKS;
        Some(self.health)
    }

    /// True exactly once: the first time health is found at zero.
    pub fn mark_defeated(&mut self) -> bool {
        if self.health == 0 && !self.defeated {
            self.defeated = true;
            return true;
        }
        false
    }

    fn begin_tick(&mut self) {
        self.spent_this_tick = false;
        self.hit_cooldown = self.hit_cooldown.saturating_sub(1);
    }

    fn regenerate(&mut self) {
        if self.spent_this_tick {
            return;
        }
        if self.stamina < MAX_STAMINA {
            self.regen_timer += 1;
            if self.regen_timer >= STAMINA_REGEN_TICKS {
                self.stamina += 1;
                self.regen_timer = 0;
            }
        } else {
            self.regen_timer = 0;
        }
    }
}

/// Applies this tick's key edges: jump, drop, air attack and dash, in that order.
pub fn player_input_system(
    latch: Res<InputLatch>,
    mut players: Query<(&mut Player, &mut Vitals, &Facing)>,
    mut events: EventWriter<SimEvent>,
) {
    let Ok((mut player, mut vitals, facing)) = players.single_mut() else {
        return;
    };

    vitals.begin_tick();

    if latch.pressed(Key::Jump) {
        player.jump();
    }
    if latch.pressed(Key::Drop) {
        player.drop_through();
    }
    if latch.pressed(Key::Attack) {
        player.air_attack();
    }
    if latch.pressed(Key::Dash) && player.try_dash(&mut vitals, *facing) {
        debug!(direction = %facing, stamina = vitals.stamina, "Dash started");
        events.write(SimEvent::DashStarted { direction: *facing });
    }
}

/// Advances the player's physics, combo and stamina by one tick.
pub fn player_motion_system(
    latch: Res<InputLatch>,
    terrain: Res<Terrain>,
    mut players: Query<(&mut Player, &mut Vitals, &mut Position, &mut Facing)>,
) {
    let Ok((mut player, mut vitals, mut position, mut facing)) = players.single_mut() else {
        return;
    };

    player.dash_cooldown = player.dash_cooldown.saturating_sub(1);

    // Dashing suspends gravity, attacks and regeneration.
    if let PlayerState::Dashing(dash) = player.state {
        player.advance_dash(dash, &mut position);
        return;
    }

    if player.on_platform() && !terrain.platform_available_at(position.0.x) {
        trace!(x = position.0.x, "Platform ended under the player");
        player.fall();
    }

    if player.state.is_airborne() {
        player.advance_airborne(&latch, &terrain, &mut position, &mut facing);
    } else {
        player.advance_grounded(&latch, &mut vitals, &mut position, &mut facing);
    }

    vitals.regenerate();
}
