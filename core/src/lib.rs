#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Labyrinth simulation.
//!
//! This crate defines the vocabulary that connects drivers, the
//! authoritative world, and the pure systems. Drivers submit [`Command`]
//! values describing desired mutations, the world executes those commands
//! via its `apply` entry point, and then reports [`Event`] values describing
//! what actually happened. Systems operate on the [`MazeGrid`] and plain
//! coordinates and never hold references back into the world.

mod grid;

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use grid::{round_up_to_odd, GridParseError, MazeGrid, MIN_GRID_SIZE};

/// Maximum number of health points the player can hold.
pub const MAX_HEALTH: u32 = 5;

/// Time the player stays invincible after collecting an invincibility pickup.
pub const INVINCIBILITY_DURATION: Duration = Duration::from_millis(2_500);

/// Time agents stay frozen after the player collects a freeze pickup.
pub const FREEZE_DURATION: Duration = Duration::from_millis(4_000);

/// Pickups seeded into every level, one of each kind.
pub const PICKUP_KINDS: [PickupKind; 3] = [
    PickupKind::Health,
    PickupKind::Invincibility,
    PickupKind::FreezeAgents,
];

/// Movement input accepted by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
    /// No movement. Always a valid input and never changes state.
    None,
}

impl Direction {
    /// The four directions that actually move an entity.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column and row offsets applied by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::None => (0, 0),
        }
    }
}

/// Role a cell plays in the junction/wall lattice used for carving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellRole {
    /// Both coordinates are even. Junctions are the nodes the carver visits
    /// and the only spawn candidates for the player and the exit.
    Junction,
    /// At least one coordinate is odd. Wall cells sit between junctions and
    /// are opened only to connect two junctions or by the open-up pass.
    Wall,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Classifies the cell within the carving lattice.
    #[must_use]
    pub const fn role(&self) -> CellRole {
        if self.column % 2 == 0 && self.row % 2 == 0 {
            CellRole::Junction
        } else {
            CellRole::Wall
        }
    }

    /// Reports whether the cell is a junction.
    #[must_use]
    pub const fn is_junction(&self) -> bool {
        matches!(self.role(), CellRole::Junction)
    }

    /// Cell reached by moving `distance` cells in `direction`.
    ///
    /// Returns `None` when the move would leave the non-negative quadrant.
    /// Upper bounds are not checked here; the grid treats anything outside
    /// its dimensions as a wall.
    #[must_use]
    pub fn offset(self, direction: Direction, distance: u32) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = shift(self.column, dx, distance)?;
        let row = shift(self.row, dy, distance)?;
        Some(Self::new(column, row))
    }

    /// Cell adjacent to this one in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        self.offset(direction, 1)
    }
}

fn shift(value: u32, sign: i32, distance: u32) -> Option<u32> {
    match sign {
        0 => Some(value),
        s if s > 0 => value.checked_add(distance),
        _ => value.checked_sub(distance),
    }
}

/// Named difficulty presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Small, open mazes with no agents on the first level.
    Easy,
    /// Mid-sized mazes with a sparse agent population.
    Medium,
    /// Large, dense mazes with quick agents.
    Hard,
}

impl Difficulty {
    /// Every preset in ascending order of difficulty.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Base parameters of the preset before level scaling.
    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile::new(25, 2, 0.6, 0.0, Duration::from_millis(1_500)),
            Self::Medium => DifficultyProfile::new(35, 3, 0.5, 0.02, Duration::from_millis(1_000)),
            Self::Hard => DifficultyProfile::new(45, 4, 0.4, 0.03, Duration::from_millis(750)),
        }
    }

    /// Lowercase name of the preset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ParseDifficultyError(value.to_owned()))
    }
}

/// Error returned when a string names no known difficulty.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}`; expected easy, medium or hard")]
pub struct ParseDifficultyError(String);

/// Unscaled parameters attached to a difficulty preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    base_size: u32,
    size_variance: u32,
    base_open_fraction: f32,
    base_agent_fraction: f32,
    base_agent_interval: Duration,
}

impl DifficultyProfile {
    /// Creates a profile from explicit base parameters.
    #[must_use]
    pub const fn new(
        base_size: u32,
        size_variance: u32,
        base_open_fraction: f32,
        base_agent_fraction: f32,
        base_agent_interval: Duration,
    ) -> Self {
        Self {
            base_size,
            size_variance,
            base_open_fraction,
            base_agent_fraction,
            base_agent_interval,
        }
    }

    /// Edge length of a level-one maze before random variance.
    #[must_use]
    pub const fn base_size(&self) -> u32 {
        self.base_size
    }

    /// Number of two-cell increments that may be randomly added to the size.
    #[must_use]
    pub const fn size_variance(&self) -> u32 {
        self.size_variance
    }

    /// Fraction of all cells forced open after carving on level one.
    #[must_use]
    pub const fn base_open_fraction(&self) -> f32 {
        self.base_open_fraction
    }

    /// Agents spawned per grid cell on level one.
    #[must_use]
    pub const fn base_agent_fraction(&self) -> f32 {
        self.base_agent_fraction
    }

    /// Agent tick interval on level one.
    #[must_use]
    pub const fn base_agent_interval(&self) -> Duration {
        self.base_agent_interval
    }
}

/// Kinds of collectible pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores one health point, capped at [`MAX_HEALTH`].
    Health,
    /// Grants immunity to agent contact for [`INVINCIBILITY_DURATION`].
    Invincibility,
    /// Stops every agent for [`FREEZE_DURATION`].
    FreezeAgents,
}

/// Pickup lying on a cell of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pickup {
    cell: CellCoord,
    kind: PickupKind,
}

impl Pickup {
    /// Creates a pickup of `kind` at `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: PickupKind) -> Self {
        Self { cell, kind }
    }

    /// Cell the pickup occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Kind of the pickup.
    #[must_use]
    pub const fn kind(&self) -> PickupKind {
        self.kind
    }
}

/// Timed effects that can be active on the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimedEffect {
    /// The player ignores agent contact.
    Invincibility,
    /// Agents skip their ticks.
    FreezeAgents,
}

/// Coarse lifecycle state of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Player and agents move.
    Active,
    /// Everything except pause toggling and restarts is ignored.
    Paused,
    /// Health reached zero; only a restart leaves this state.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Attempts to move the player one cell.
    MovePlayer {
        /// Direction of travel.
        direction: Direction,
    },
    /// Advances every agent by one pursuit step.
    MoveAgents,
    /// Counts down active timed effects by the provided wall-clock delta.
    DecayEffects {
        /// Wall-clock time elapsed since the previous decay.
        dt: Duration,
    },
    /// Sets the paused flag.
    SetPaused {
        /// Whether the simulation should be paused.
        paused: bool,
    },
    /// Rebuilds the current level from scratch.
    Restart {
        /// Difficulty to use for the rebuilt level.
        difficulty: Difficulty,
        /// Whether the player's health returns to [`MAX_HEALTH`].
        reset_health: bool,
    },
    /// Starts over from level one with full health.
    NewGame {
        /// Difficulty of the new game.
        difficulty: Difficulty,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// The player moved between two cells.
    PlayerMoved {
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// A player move was rejected because the destination is a wall.
    PlayerBlocked {
        /// Direction of the rejected move.
        direction: Direction,
    },
    /// The player collected a pickup.
    PickupCollected {
        /// Pickup that was removed from the maze.
        pickup: Pickup,
    },
    /// An agent advanced one cell toward the player.
    AgentMoved {
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
    },
    /// The player lost a health point.
    PlayerDamaged {
        /// Health remaining after the hit.
        health: u32,
    },
    /// Health reached zero.
    GameOver,
    /// A freshly generated level became active.
    LevelStarted {
        /// Level number, starting at one.
        level: u32,
        /// Difficulty used to scale the level.
        difficulty: Difficulty,
        /// Width of the new grid in cells.
        width: u32,
        /// Height of the new grid in cells.
        height: u32,
    },
    /// A timed effect ran out.
    EffectExpired {
        /// Effect that ended.
        effect: TimedEffect,
    },
    /// The paused flag changed.
    PauseChanged {
        /// New value of the flag.
        paused: bool,
    },
}

/// Coarse compass hint from the player toward the exit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ExitBearing {
    vertical: Option<Direction>,
    horizontal: Option<Direction>,
}

impl ExitBearing {
    /// Computes the bearing from `from` toward `to`.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Self {
        let vertical = match to.row().cmp(&from.row()) {
            std::cmp::Ordering::Less => Some(Direction::Up),
            std::cmp::Ordering::Greater => Some(Direction::Down),
            std::cmp::Ordering::Equal => None,
        };
        let horizontal = match to.column().cmp(&from.column()) {
            std::cmp::Ordering::Less => Some(Direction::Left),
            std::cmp::Ordering::Greater => Some(Direction::Right),
            std::cmp::Ordering::Equal => None,
        };
        Self {
            vertical,
            horizontal,
        }
    }

    /// Vertical component, either [`Direction::Up`] or [`Direction::Down`].
    #[must_use]
    pub const fn vertical(&self) -> Option<Direction> {
        self.vertical
    }

    /// Horizontal component, either [`Direction::Left`] or [`Direction::Right`].
    #[must_use]
    pub const fn horizontal(&self) -> Option<Direction> {
        self.horizontal
    }

    /// Reports whether both points coincide.
    #[must_use]
    pub const fn is_here(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }
}

impl fmt::Display for ExitBearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vertical {
            Some(Direction::Up) => f.write_str("North")?,
            Some(Direction::Down) => f.write_str("South")?,
            _ => {}
        }
        match self.horizontal {
            Some(Direction::Left) => f.write_str("West"),
            Some(Direction::Right) => f.write_str("East"),
            _ => Ok(()),
        }
    }
}
