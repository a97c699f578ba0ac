/// Driver configuration
use crate::error::{CliError, Result};
use pocket_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "pocket-player.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub simulation: SimulationSettings,
}

/// How the headless media behaves
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Length of every item without an override
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u64,

    /// Wall-clock step for the simulated playhead in interactive mode; 0 freezes it
    #[serde(default = "default_clock_tick_ms")]
    pub clock_tick_ms: u64,

    #[serde(default)]
    pub durations: Vec<DurationOverride>,
}

/// Per-url item length
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DurationOverride {
    pub url: String,
    pub secs: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            default_duration_secs: default_duration_secs(),
            clock_tick_ms: default_clock_tick_ms(),
            durations: Vec::new(),
        }
    }
}

impl SimulationSettings {
    pub fn default_duration(&self) -> Duration {
        Duration::from_secs(self.default_duration_secs)
    }

    pub fn clock_tick(&self) -> Option<Duration> {
        (self.clock_tick_ms > 0).then(|| Duration::from_millis(self.clock_tick_ms))
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `pocket-player.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (POCKET_PLAYBACK__AUTOPLAY=true)
        settings = settings.add_source(
            config::Environment::with_prefix("POCKET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let playback = &self.playback;

        if !positive(playback.volume_step) || playback.volume_step > 1.0 {
            return Err(CliError::Config(format!(
                "playback.volume_step must be in (0, 1], got {}",
                playback.volume_step
            )));
        }

        if !positive(playback.seek_step_secs) {
            return Err(CliError::Config(format!(
                "playback.seek_step_secs must be positive, got {}",
                playback.seek_step_secs
            )));
        }

        if !positive(playback.rate_step) {
            return Err(CliError::Config(format!(
                "playback.rate_step must be positive, got {}",
                playback.rate_step
            )));
        }

        if self.simulation.default_duration_secs == 0 {
            return Err(CliError::Config(
                "simulation.default_duration_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// Default values
fn default_duration_secs() -> u64 {
    30
}

fn default_clock_tick_ms() -> u64 {
    250
}
