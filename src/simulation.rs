//! The simulation context owned by the host.

use std::str::FromStr;
use std::time::Duration;

use bevy_ecs::{
    entity::Entity,
    event::{EventRegistry, Events},
    schedule::{IntoScheduleConfigs, Schedule, SystemSet},
    system::ResMut,
    world::World,
};
use glam::Vec2;
use tracing::{debug, info, info_span};

use crate::{
    clock::FixedStepper,
    config::SimConfig,
    error::SimResult,
    events::SimEvent,
    snapshot::SimSnapshot,
    systems::{
        camera_follow_system, clear_input_edges_system, enemy_system, plan_initial, plant_system, player_input_system,
        player_motion_system, projectile_system, spawner_system, spawning_enabled, strike_resolution_system, CameraFollow,
        EnemyBundle, Facing, InputLatch, Key, Plant, PlantBundle, PlayerBundle, ProjectileBundle, SimRng, SpawnerSettings,
        TickCount, Watermarks,
    },
    terrain::{BackgroundLayout, PlatformGap},
};

/// Name of the span every tick runs inside; its `n` field carries the tick number.
pub const TICK_SPAN: &str = "tick";

/// Phases of a tick, run strictly in declaration order.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum TickSet {
    /// Key edges latched since the previous tick
    Input,
    /// Player physics, combo and stamina
    Player,
    /// Hit resolution, then the enemy, plant and projectile pools
    Agents,
    /// Spawning and camera follow
    World,
    /// Edge clearing and tick bookkeeping
    Cleanup,
}

/// Deterministic fixed-step simulation of one run.
///
/// Owns the ECS world holding the player and every pooled agent, the schedule that advances
/// them, and the accumulator that turns wall-clock time into ticks. Nothing is shared between
/// instances; a host may run several side by side.
///
/// Events are never cleared by the tick. They accumulate until the host calls
/// [`Simulation::drain_events`], so a host that ignores them must still drain periodically.
pub struct Simulation {
    pub world: World,
    pub schedule: Schedule,
    stepper: FixedStepper,
}

impl Simulation {
    /// Builds a simulation with the player at the origin and the initial population spawned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SimError::Layout`] when the configured layout or gap is degenerate.
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        Self::build(config, true)
    }

    /// Builds a simulation holding only the player, for scripted scenarios.
    pub fn empty(config: &SimConfig) -> SimResult<Self> {
        Self::build(config, false)
    }

    fn build(config: &SimConfig, populate: bool) -> SimResult<Self> {
        info!(seed = ?config.seed, spawning = config.spawning, "Starting simulation initialization");

        if let Some(layout) = config.layout {
            BackgroundLayout::new(layout.width, layout.height, layout.reference_height)?;
        }
        PlatformGap::new(config.gap.start, config.gap.end)?;

        let terrain = config.terrain();
        let mut rng = SimRng::new(config.seed);

        debug!("Initializing ECS world and system schedule");
        let mut world = World::default();
        let mut schedule = Schedule::default();

        EventRegistry::register_event::<SimEvent>(&mut world);

        debug!("Inserting resources into ECS world");
        world.insert_resource(InputLatch::default());
        world.insert_resource(terrain);
        world.insert_resource(CameraFollow::new(&terrain));
        world.insert_resource(Watermarks::default());
        world.insert_resource(SpawnerSettings {
            enabled: config.spawning,
        });
        world.insert_resource(TickCount::default());

        debug!("Configuring system execution schedule");
        Self::configure_schedule(&mut schedule);

        debug!("Spawning player entity");
        world.spawn(PlayerBundle::default());

        if populate {
            let requests = plan_initial(&mut rng.0, &terrain);
            info!(count = requests.len(), "Spawning initial population");
            for request in requests {
                request.spawn_into(&mut world);
            }
        }
        world.insert_resource(rng);

        info!("Simulation initialization completed successfully");
        Ok(Simulation {
            world,
            schedule,
            stepper: FixedStepper::default(),
        })
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule
            .add_systems((
                player_input_system.in_set(TickSet::Input),
                player_motion_system.in_set(TickSet::Player),
                (strike_resolution_system, enemy_system, plant_system, projectile_system)
                    .chain()
                    .in_set(TickSet::Agents),
                (spawner_system.run_if(spawning_enabled), camera_follow_system)
                    .chain()
                    .in_set(TickSet::World),
                (clear_input_edges_system, count_tick_system)
                    .chain()
                    .in_set(TickSet::Cleanup),
            ))
            .configure_sets(
                (
                    TickSet::Input,
                    TickSet::Player,
                    TickSet::Agents,
                    TickSet::World,
                    TickSet::Cleanup,
                )
                    .chain(),
            );
    }

    pub fn key_down(&mut self, key: Key) {
        self.world.resource_mut::<InputLatch>().key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.world.resource_mut::<InputLatch>().key_up(key);
    }

    /// Feeds a browser-style key name (`"ArrowUp"`, `"a"`, `" "`...). Returns false for keys the
    /// simulation does not use.
    pub fn key_event(&mut self, name: &str, down: bool) -> bool {
        let Ok(key) = Key::from_str(name) else {
            return false;
        };
        if down {
            self.key_down(key);
        } else {
            self.key_up(key);
        }
        true
    }

    /// Runs exactly one tick.
    pub fn step(&mut self) {
        let span = info_span!(TICK_SPAN, n = self.tick() + 1);
        let _entered = span.enter();
        self.schedule.run(&mut self.world);
    }

    /// Feeds a wall-clock delta through the fixed-step accumulator and runs the ticks it yields.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        let ticks = self.stepper.accumulate(delta);
        for _ in 0..ticks {
            self.step();
        }
        ticks
    }

    /// Number of ticks run so far.
    pub fn tick(&self) -> u64 {
        self.world.get_resource::<TickCount>().map_or(0, |tick| tick.0)
    }

    pub fn snapshot(&mut self) -> SimResult<SimSnapshot> {
        SimSnapshot::capture(&mut self.world)
    }

    /// Takes every event emitted since the last drain. Events are kept until drained.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.resource_mut::<Events<SimEvent>>().drain().collect()
    }

    pub fn spawn_enemy(&mut self, x: f32, y: f32) -> Entity {
        self.world.spawn(EnemyBundle::new(Vec2::new(x, y), Facing::Right)).id()
    }

    pub fn spawn_plant(&mut self, x: f32, y: f32) -> Entity {
        self.world
            .spawn(PlantBundle::new(Vec2::new(x, y), Facing::Right, Plant::new(0, 0.0)))
            .id()
    }

    pub fn spawn_projectile(&mut self, x: f32, y: f32, direction: Facing) -> Entity {
        self.world.spawn(ProjectileBundle::fired(Vec2::new(x, y), direction)).id()
    }
}

fn count_tick_system(mut tick: ResMut<TickCount>) {
    tick.0 += 1;
}
