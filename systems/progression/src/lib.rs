#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level scaling rules that turn a difficulty preset into concrete level
//! parameters.
//!
//! Every function is pure apart from [`scaled_size`], which draws its random
//! variance from the caller's generator. Levels below one are treated as
//! level one.

use std::time::Duration;

use labyrinth_core::{round_up_to_odd, Difficulty, DifficultyProfile};
use rand::Rng;

/// Cells added to each edge per level.
pub const LEVEL_SIZE_INCREMENT: u32 = 2;
/// Largest edge length any level can roll.
pub const MAX_WORLD_SIZE: u32 = 101;
/// Reduction of the open fraction per level.
pub const LEVEL_OPEN_FRACTION_DECREMENT: f32 = 0.005;
/// Floor for the open fraction.
pub const MIN_OPEN_FRACTION: f32 = 0.20;
/// Growth of the agent fraction per level.
pub const LEVEL_AGENT_FRACTION_INCREMENT: f32 = 0.003;
/// Ceiling for the agent fraction.
pub const MAX_AGENT_FRACTION: f32 = 0.20;
/// Reduction of the agent tick interval per level.
pub const LEVEL_INTERVAL_DECREMENT: Duration = Duration::from_millis(20);
/// Floor for the agent tick interval.
pub const MIN_AGENT_INTERVAL: Duration = Duration::from_millis(150);

fn levels_above_first(level: u32) -> u32 {
    level.saturating_sub(1)
}

/// Rolls an odd edge length for `level`.
///
/// The result lies in `[base_size, MAX_WORLD_SIZE]` (or is exactly the
/// rounded base size when a custom profile starts above the cap).
#[must_use]
pub fn scaled_size<R>(profile: &DifficultyProfile, level: u32, rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    let base = round_up_to_odd(profile.base_size());
    let grown = base.saturating_add(levels_above_first(level).saturating_mul(LEVEL_SIZE_INCREMENT));
    let variance = rng.gen_range(0..=profile.size_variance()).saturating_mul(2);
    let size = grown.saturating_add(variance).min(MAX_WORLD_SIZE).max(base);
    round_up_to_odd(size)
}

/// Fraction of cells forced open after carving on `level`.
#[must_use]
pub fn scaled_open_fraction(profile: &DifficultyProfile, level: u32) -> f32 {
    let steps = levels_above_first(level) as f32;
    let scaled = profile.base_open_fraction() - steps * LEVEL_OPEN_FRACTION_DECREMENT;
    scaled.clamp(MIN_OPEN_FRACTION, profile.base_open_fraction().max(MIN_OPEN_FRACTION))
}

/// Agents spawned per grid cell on `level`.
#[must_use]
pub fn scaled_agent_fraction(profile: &DifficultyProfile, level: u32) -> f32 {
    let steps = levels_above_first(level) as f32;
    let scaled = profile.base_agent_fraction() + steps * LEVEL_AGENT_FRACTION_INCREMENT;
    scaled.clamp(0.0, MAX_AGENT_FRACTION)
}

/// Time between agent ticks on `level`.
#[must_use]
pub fn scaled_agent_interval(profile: &DifficultyProfile, level: u32) -> Duration {
    let reduction = LEVEL_INTERVAL_DECREMENT.saturating_mul(levels_above_first(level));
    profile
        .base_agent_interval()
        .saturating_sub(reduction)
        .max(MIN_AGENT_INTERVAL)
}

/// Concrete parameters for one generated level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelPlan {
    level: u32,
    difficulty: Difficulty,
    width: u32,
    height: u32,
    open_fraction: f32,
    agent_fraction: f32,
    agent_interval: Duration,
}

impl LevelPlan {
    /// Rolls the parameters of `level` for `difficulty`.
    ///
    /// Width and height are rolled independently.
    pub fn roll<R>(difficulty: Difficulty, level: u32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let profile = difficulty.profile();
        let level = level.max(1);
        let width = scaled_size(&profile, level, rng);
        let height = scaled_size(&profile, level, rng);
        Self {
            level,
            difficulty,
            width,
            height,
            open_fraction: scaled_open_fraction(&profile, level),
            agent_fraction: scaled_agent_fraction(&profile, level),
            agent_interval: scaled_agent_interval(&profile, level),
        }
    }

    /// Level number the plan was rolled for.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Difficulty the plan was rolled for.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Grid width in cells. Always odd.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells. Always odd.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Fraction of cells the open-up pass forces passable.
    #[must_use]
    pub const fn open_fraction(&self) -> f32 {
        self.open_fraction
    }

    /// Agents per grid cell.
    #[must_use]
    pub const fn agent_fraction(&self) -> f32 {
        self.agent_fraction
    }

    /// Time between agent ticks.
    #[must_use]
    pub const fn agent_interval(&self) -> Duration {
        self.agent_interval
    }

    /// Agents requested for the level, computed from the raw grid area.
    ///
    /// Placement may cap this further against the passable area.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        let area = f64::from(self.width) * f64::from(self.height);
        (area * f64::from(self.agent_fraction)).floor() as usize
    }
}
