#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entity placement for freshly generated levels.
//!
//! The player and the exit land on distinct passable junctions. Agents and
//! then the fixed pickup set land on any passable cell not already claimed.
//! Every draw is rejection sampled against a growing exclusion set. After
//! [`MAX_PLACEMENT_ATTEMPTS`] misses the draw falls back to a uniform pick
//! among the candidates still free, so placement only fails when none are
//! left.

use std::collections::HashSet;

use labyrinth_core::{CellCoord, MazeGrid, Pickup, PICKUP_KINDS};
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

/// Rejection draws spent on one entity before falling back to the free remainder.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 4_096;

/// Reasons placement can fail. Any of them leaves the level unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// Fewer than two passable junctions exist, so player and exit cannot differ.
    #[error("grid offers {available} passable junctions; player and exit need two")]
    NotEnoughJunctions {
        /// Passable junctions found in the grid.
        available: usize,
    },
    /// The passable area cannot hold the fixed pickup set.
    #[error("grid offers {available} passable cells; {required} are required")]
    NotEnoughOpenCells {
        /// Passable cells found in the grid.
        available: usize,
        /// Cells required for player, exit and pickups.
        required: usize,
    },
    /// Every candidate cell for an entity is already claimed.
    #[error("no free cell left for {entity}")]
    NoFreeCell {
        /// Entity that could not be placed.
        entity: &'static str,
    },
}

/// Cells chosen for every entity of a level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Player spawn, always a junction.
    pub player: CellCoord,
    /// Exit, always a junction distinct from the player.
    pub exit: CellCoord,
    /// Agent spawns.
    pub agents: Vec<CellCoord>,
    /// Pickups, one per entry of [`PICKUP_KINDS`].
    pub pickups: Vec<Pickup>,
}

/// Number of agents the grid can host once player, exit and pickups are placed.
#[must_use]
pub fn agent_capacity(grid: &MazeGrid) -> usize {
    grid.open_cell_count().saturating_sub(2 + PICKUP_KINDS.len())
}

/// Places player, exit, agents and pickups on `grid`.
///
/// `requested_agents` is capped by [`agent_capacity`]; any request up to
/// that cap succeeds once the junction and open-cell checks pass.
pub fn place<R>(
    grid: &MazeGrid,
    requested_agents: usize,
    rng: &mut R,
) -> Result<Placement, PlacementError>
where
    R: Rng + ?Sized,
{
    let junctions: Vec<CellCoord> = grid
        .junctions()
        .filter(|cell| grid.is_open(*cell))
        .collect();
    if junctions.len() < 2 {
        return Err(PlacementError::NotEnoughJunctions {
            available: junctions.len(),
        });
    }

    let open_cells: Vec<CellCoord> = grid.open_cells().collect();
    let required = 2 + PICKUP_KINDS.len();
    if open_cells.len() < required {
        return Err(PlacementError::NotEnoughOpenCells {
            available: open_cells.len(),
            required,
        });
    }

    let mut claimed = HashSet::new();
    let player = draw_unclaimed(&junctions, &claimed, "player", rng)?;
    let _ = claimed.insert(player);
    let exit = draw_unclaimed(&junctions, &claimed, "exit", rng)?;
    let _ = claimed.insert(exit);

    let agent_count = requested_agents.min(agent_capacity(grid));
    let mut agents = Vec::with_capacity(agent_count);
    for _ in 0..agent_count {
        let cell = draw_unclaimed(&open_cells, &claimed, "agent", rng)?;
        let _ = claimed.insert(cell);
        agents.push(cell);
    }

    let mut pickups = Vec::with_capacity(PICKUP_KINDS.len());
    for kind in PICKUP_KINDS {
        let cell = draw_unclaimed(&open_cells, &claimed, "pickup", rng)?;
        let _ = claimed.insert(cell);
        pickups.push(Pickup::new(cell, kind));
    }

    Ok(Placement {
        player,
        exit,
        agents,
        pickups,
    })
}

fn draw_unclaimed<R>(
    candidates: &[CellCoord],
    claimed: &HashSet<CellCoord>,
    entity: &'static str,
    rng: &mut R,
) -> Result<CellCoord, PlacementError>
where
    R: Rng + ?Sized,
{
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        match candidates.choose(rng) {
            Some(cell) if !claimed.contains(cell) => return Ok(*cell),
            Some(_) => continue,
            None => break,
        }
    }

    let free: Vec<CellCoord> = candidates
        .iter()
        .copied()
        .filter(|cell| !claimed.contains(cell))
        .collect();
    free.choose(rng).copied().ok_or(PlacementError::NoFreeCell { entity })
}
