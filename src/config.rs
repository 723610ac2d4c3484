//! Environment-driven configuration.
//!
//! Every key is read from `ROGUEWEB_`-prefixed environment variables, e.g. `ROGUEWEB_SEED=7`.

use figment::{providers::Env, Figment};
use serde::Deserialize;

use crate::constants::world::{PLATFORM_GAP_END, PLATFORM_GAP_START};
use crate::error::{SimError, SimResult};
use crate::terrain::{BackgroundLayout, PlatformGap, Terrain};

pub const ENV_PREFIX: &str = "ROGUEWEB_";

/// Settings that shape a simulation run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSimConfig")]
pub struct SimConfig {
    /// Seed for every random draw; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// When false, no agents are added after the initial population.
    pub spawning: bool,
    /// Background layout driving platform gaps; `None` means the platform never ends.
    pub layout: Option<BackgroundLayout>,
    pub gap: PlatformGap,
}

/// Flat representation read straight from the environment, validated into [`SimConfig`].
#[derive(Debug, Deserialize)]
struct RawSimConfig {
    seed: Option<u64>,
    #[serde(default = "default_spawning")]
    spawning: bool,

    // Background layout, all or nothing
    background_width: Option<f32>,
    background_height: Option<f32>,
    reference_height: Option<f32>,

    #[serde(default = "default_gap_start")]
    gap_start: f32,
    #[serde(default = "default_gap_end")]
    gap_end: f32,
}

impl TryFrom<RawSimConfig> for SimConfig {
    type Error = SimError;

    fn try_from(raw: RawSimConfig) -> Result<Self, Self::Error> {
        let layout = match (raw.background_width, raw.background_height, raw.reference_height) {
            (None, None, None) => None,
            (Some(width), Some(height), Some(reference)) => Some(BackgroundLayout::new(width, height, reference)?),
            _ => {
                return Err(SimError::InvalidConfig(
                    "background layout is incomplete: set BACKGROUND_WIDTH, BACKGROUND_HEIGHT and REFERENCE_HEIGHT together"
                        .to_string(),
                ))
            }
        };

        Ok(SimConfig {
            seed: raw.seed,
            spawning: raw.spawning,
            layout,
            gap: PlatformGap::new(raw.gap_start, raw.gap_end)?,
        })
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            spawning: default_spawning(),
            layout: None,
            gap: PlatformGap::default(),
        }
    }
}

impl SimConfig {
    /// Loads the configuration from `ROGUEWEB_*` environment variables.
    pub fn from_env() -> SimResult<Self> {
        Ok(Figment::new().merge(Env::prefixed(ENV_PREFIX)).extract()?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_layout(mut self, layout: BackgroundLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn without_spawning(mut self) -> Self {
        self.spawning = false;
        self
    }

    pub fn terrain(&self) -> Terrain {
        Terrain::new(self.layout, self.gap)
    }
}

/// Settings for the headless runner binary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunnerConfig {
    /// Wall-clock length of the run.
    #[serde(default = "default_seconds")]
    pub seconds: u64,
    /// Host callback rate; the simulation itself always ticks at 60 Hz.
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            seconds: default_seconds(),
            fps: default_fps(),
        }
    }
}

impl RunnerConfig {
    pub fn from_env() -> SimResult<Self> {
        let config: RunnerConfig = Figment::new().merge(Env::prefixed(ENV_PREFIX)).extract()?;
        if config.fps == 0 {
            return Err(SimError::InvalidConfig("FPS must be at least 1".to_string()));
        }
        Ok(config)
    }
}

fn default_spawning() -> bool {
    true
}

fn default_gap_start() -> f32 {
    PLATFORM_GAP_START
}

fn default_gap_end() -> f32 {
    PLATFORM_GAP_END
}

fn default_seconds() -> u64 {
    10
}

fn default_fps() -> u32 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_environment() {
        Jail::expect_with(|_jail| {
            let config = SimConfig::from_env().map_err(|e| e.to_string())?;
            assert_eq!(config, SimConfig::default());
            assert!(config.spawning);
            assert_eq!(config.gap, PlatformGap::default());
            Ok(())
        });
    }

    #[test]
    fn test_reads_prefixed_variables() {
        Jail::expect_with(|jail| {
            jail.set_env("ROGUEWEB_SEED", "42");
            jail.set_env("ROGUEWEB_SPAWNING", "false");
            jail.set_env("ROGUEWEB_BACKGROUND_WIDTH", "10000");
            jail.set_env("ROGUEWEB_BACKGROUND_HEIGHT", "1080");
            jail.set_env("ROGUEWEB_REFERENCE_HEIGHT", "1080");

            let config = SimConfig::from_env().map_err(|e| e.to_string())?;
            assert_eq!(config.seed, Some(42));
            assert!(!config.spawning);
            assert_eq!(
                config.layout,
                Some(BackgroundLayout {
                    width: 10_000.0,
                    height: 1080.0,
                    reference_height: 1080.0
                })
            );
            Ok(())
        });
    }

    #[test]
    fn test_partial_layout_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("ROGUEWEB_BACKGROUND_WIDTH", "10000");
            assert!(SimConfig::from_env().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_inverted_gap_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("ROGUEWEB_GAP_START", "500");
            jail.set_env("ROGUEWEB_GAP_END", "100");
            assert!(SimConfig::from_env().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_runner_defaults_and_zero_fps() {
        Jail::expect_with(|jail| {
            let config = RunnerConfig::from_env().map_err(|e| e.to_string())?;
            assert_eq!(config, RunnerConfig::default());

            jail.set_env("ROGUEWEB_FPS", "0");
            assert!(RunnerConfig::from_env().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_builder_helpers() {
        let config = SimConfig::default().with_seed(9).without_spawning();
        assert_eq!(config.seed, Some(9));
        assert!(!config.spawning);
        assert!(config.terrain().platform_available_at(6000.0));
    }
}
