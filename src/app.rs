use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::{
    config::{RunnerConfig, SimConfig},
    error::SimResult,
    events::SimEvent,
    simulation::Simulation,
    systems::Key,
};

/// Length of the scripted input loop, in ticks.
const SCRIPT_PERIOD: u64 = 240;

/// Key transitions played on a loop: run right, double jump onto the platform, attack through a
/// combo, dash, drop back down, then run left for a while.
const SCRIPT: &[(u64, Key, bool)] = &[
    (0, Key::Left, false),
    (0, Key::Right, true),
    (20, Key::Jump, true),
    (21, Key::Jump, false),
    (34, Key::Jump, true),
    (35, Key::Jump, false),
    (70, Key::Attack, true),
    (110, Key::Attack, false),
    (120, Key::Dash, true),
    (121, Key::Dash, false),
    (150, Key::Right, false),
    (150, Key::Left, true),
    (160, Key::Drop, true),
    (161, Key::Drop, false),
    (190, Key::Jump, true),
    (191, Key::Jump, false),
    (200, Key::Attack, true),
    (201, Key::Attack, false),
];

/// Feeds [`SCRIPT`] into a simulation, one tick at a time.
#[derive(Debug, Default)]
struct Autopilot {
    next_tick: u64,
}

impl Autopilot {
    /// Applies every transition scheduled up to the tick about to run.
    fn feed(&mut self, sim: &mut Simulation) {
        let upcoming = sim.tick();
        while self.next_tick <= upcoming {
            let phase = self.next_tick % SCRIPT_PERIOD;
            for &(_, key, down) in SCRIPT.iter().filter(|(at, _, _)| *at == phase) {
                if down {
                    sim.key_down(key);
                } else {
                    sim.key_up(key);
                }
            }
            self.next_tick += 1;
        }
    }
}

/// Totals gathered from the event stream over a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub strikes: u32,
    pub kills: u32,
    pub parries: u32,
    pub projectiles_fired: u32,
    pub damage_taken: u32,
    pub spawned: u32,
    pub defeated: bool,
}

impl RunSummary {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::StrikeLanded { .. } => self.strikes += 1,
            SimEvent::TargetKilled { .. } => self.kills += 1,
            SimEvent::ProjectileParried { .. } => self.parries += 1,
            SimEvent::ProjectileFired { .. } => self.projectiles_fired += 1,
            SimEvent::PlayerDamaged { .. } => self.damage_taken += 1,
            SimEvent::Spawned { .. } => self.spawned += 1,
            SimEvent::PlayerDefeated => self.defeated = true,
            SimEvent::DashStarted { .. } => {}
        }
    }
}

/// Headless host that paces a [`Simulation`] against the wall clock.
pub struct App {
    pub sim: Simulation,
    runner: RunnerConfig,
    autopilot: Autopilot,
    summary: RunSummary,
    last_tick: Instant,
}

impl App {
    /// # Errors
    ///
    /// Propagates layout errors from [`Simulation::new`].
    pub fn new(config: &SimConfig, runner: RunnerConfig) -> SimResult<Self> {
        info!(seconds = runner.seconds, fps = runner.fps, "Initializing headless runner");
        let sim = Simulation::new(config)?;

        Ok(App {
            sim,
            runner,
            autopilot: Autopilot::default(),
            summary: RunSummary::default(),
            last_tick: Instant::now(),
        })
    }

    fn frame_time(&self) -> Duration {
        Duration::from_secs(1) / self.runner.fps.max(1)
    }

    /// Executes a single host frame: feeds scripted input, advances the simulation by the elapsed
    /// wall-clock time and sleeps away whatever is left of the frame.
    pub fn run_frame(&mut self) -> SimResult<()> {
        let start = Instant::now();
        let delta = start.duration_since(self.last_tick);
        self.last_tick = start;

        self.autopilot.feed(&mut self.sim);
        let before = self.sim.tick();
        let ran = self.sim.advance(delta);

        for event in self.sim.drain_events() {
            self.summary.record(&event);
            if let SimEvent::PlayerDefeated = event {
                warn!(tick = self.sim.tick(), "Player defeated");
            }
        }

        if ran > 0 && self.sim.tick() / 60 != before / 60 {
            let snapshot = self.sim.snapshot()?;
            debug!(
                tick = snapshot.tick,
                x = snapshot.player.x,
                y = snapshot.player.y,
                action = snapshot.player.action.as_ref(),
                health = snapshot.player.health,
                stamina = snapshot.player.stamina,
                enemies = snapshot.enemies.len(),
                plants = snapshot.plants.len(),
                projectiles = snapshot.projectiles.len(),
                "Simulation status"
            );
        }

        let frame_time = self.frame_time();
        if let Some(remaining) = frame_time.checked_sub(start.elapsed()) {
            spin_sleep::sleep(remaining);
        }
        Ok(())
    }

    /// Runs frames until the configured duration has passed.
    pub fn run(&mut self) -> SimResult<RunSummary> {
        let deadline = Instant::now() + Duration::from_secs(self.runner.seconds);
        self.last_tick = Instant::now();

        while Instant::now() < deadline {
            self.run_frame()?;
        }

        self.summary.ticks = self.sim.tick();
        Ok(self.summary)
    }
}
