use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use labyrinth_core::Difficulty;
use labyrinth_world::DEFAULT_SEED;
use serde::Deserialize;

/// Parameters of one headless session, optionally read from a TOML file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    pub(crate) difficulty: Difficulty,
    pub(crate) seed: u64,
    pub(crate) duration_ms: u64,
    pub(crate) player_step_ms: u64,
    pub(crate) decay_step_ms: u64,
    pub(crate) wander_chance: f64,
    pub(crate) restart_on_game_over: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            seed: DEFAULT_SEED,
            duration_ms: 60_000,
            player_step_ms: 200,
            decay_step_ms: 50,
            wander_chance: 0.1,
            restart_on_game_over: true,
        }
    }
}

impl SessionConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session file at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid session file at {}", path.display()))
    }

    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse session toml contents")?;
        Ok(config)
    }

    /// Rejects cadences that would stall the simulated clock.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.player_step_ms == 0 {
            bail!("player_step_ms must be positive");
        }
        if self.decay_step_ms == 0 {
            bail!("decay_step_ms must be positive");
        }
        if !(0.0..=1.0).contains(&self.wander_chance) {
            bail!(
                "wander_chance must lie within [0, 1], got {}",
                self.wander_chance
            );
        }
        Ok(())
    }

    pub(crate) const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub(crate) const fn player_step(&self) -> Duration {
        Duration::from_millis(self.player_step_ms)
    }

    pub(crate) const fn decay_step(&self) -> Duration {
        Duration::from_millis(self.decay_step_ms)
    }
}
