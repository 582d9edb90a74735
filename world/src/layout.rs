//! Hand-authored levels.

use std::collections::HashSet;

use labyrinth_core::{CellCoord, MazeGrid, Pickup, MAX_HEALTH};
use thiserror::Error;

/// Problems found while validating a [`Layout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// An entity sits outside the grid.
    #[error("cell ({}, {}) lies outside the grid", .0.column(), .0.row())]
    OutOfBounds(CellCoord),
    /// An entity sits on a wall.
    #[error("cell ({}, {}) is a wall", .0.column(), .0.row())]
    Blocked(CellCoord),
    /// Exit and player share a cell.
    #[error("exit coincides with the player")]
    ExitOnPlayer,
    /// Two entities share a cell.
    #[error("more than one entity occupies ({}, {})", .0.column(), .0.row())]
    Overlap(CellCoord),
    /// Level numbers start at one.
    #[error("level must be at least 1")]
    InvalidLevel,
    /// Health must be within `1..=MAX_HEALTH`.
    #[error("health {0} is outside 1..={max}", max = MAX_HEALTH)]
    HealthOutOfRange(u32),
}

/// Explicit grid and entity positions used instead of procedural generation.
///
/// Levels reached from a layout by stepping onto the exit are generated
/// procedurally again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub(crate) grid: MazeGrid,
    pub(crate) player: CellCoord,
    pub(crate) exit: CellCoord,
    pub(crate) agents: Vec<CellCoord>,
    pub(crate) pickups: Vec<Pickup>,
    pub(crate) level: u32,
    pub(crate) health: u32,
}

impl Layout {
    /// Creates a layout on level one with full health and no agents or pickups.
    #[must_use]
    pub fn new(grid: MazeGrid, player: CellCoord, exit: CellCoord) -> Self {
        Self {
            grid,
            player,
            exit,
            agents: Vec::new(),
            pickups: Vec::new(),
            level: 1,
            health: MAX_HEALTH,
        }
    }

    /// Replaces the agent spawns.
    #[must_use]
    pub fn with_agents<I>(mut self, agents: I) -> Self
    where
        I: IntoIterator<Item = CellCoord>,
    {
        self.agents = agents.into_iter().collect();
        self
    }

    /// Replaces the pickups.
    #[must_use]
    pub fn with_pickups<I>(mut self, pickups: I) -> Self
    where
        I: IntoIterator<Item = Pickup>,
    {
        self.pickups = pickups.into_iter().collect();
        self
    }

    /// Sets the level number.
    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Sets the starting health.
    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), LayoutError> {
        if self.level == 0 {
            return Err(LayoutError::InvalidLevel);
        }
        if self.health == 0 || self.health > MAX_HEALTH {
            return Err(LayoutError::HealthOutOfRange(self.health));
        }
        if self.player == self.exit {
            return Err(LayoutError::ExitOnPlayer);
        }

        let cells = [self.player, self.exit]
            .into_iter()
            .chain(self.agents.iter().copied())
            .chain(self.pickups.iter().map(Pickup::cell));

        let mut seen = HashSet::new();
        for cell in cells {
            if !self.grid.contains(cell) {
                return Err(LayoutError::OutOfBounds(cell));
            }
            if self.grid.is_wall(cell) {
                return Err(LayoutError::Blocked(cell));
            }
            if !seen.insert(cell) {
                return Err(LayoutError::Overlap(cell));
            }
        }
        Ok(())
    }
}
