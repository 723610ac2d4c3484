#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

use anyhow::{Context, Result};
use tracing::info;

use rogueweb::{
    app::App,
    config::{RunnerConfig, SimConfig},
    constants::LOOP_TIME,
    logging::setup_logging,
};

/// Runs a scripted, headless session against the wall clock and logs what happened.
pub fn main() -> Result<()> {
    setup_logging();

    let config = SimConfig::from_env().context("Could not load simulation configuration")?;
    let runner = RunnerConfig::from_env().context("Could not load runner configuration")?;

    let mut app = App::new(&config, runner).context("Could not create app")?;

    info!(loop_time = ?LOOP_TIME, "Starting simulation loop");
    let summary = app.run()?;

    info!(
        ticks = summary.ticks,
        strikes = summary.strikes,
        kills = summary.kills,
        parries = summary.parries,
        projectiles_fired = summary.projectiles_fired,
        damage_taken = summary.damage_taken,
        spawned = summary.spawned,
        defeated = summary.defeated,
        "Run finished"
    );
    Ok(())
}
