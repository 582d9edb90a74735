#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Maze carving for Labyrinth levels.
//!
//! Generation runs in two passes. [`carve`] performs a randomized
//! depth-first walk ("recursive backtracker") over the junction lattice,
//! yielding a spanning tree in which every passable cell is reachable from
//! the start. [`open_up`] then forces a random share of all cells open,
//! adding loops and shortcuts. Opening a cell can never disconnect
//! anything, so the reachability guarantee survives the second pass.

use labyrinth_core::{CellCoord, Direction, MazeGrid, MIN_GRID_SIZE};
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

/// Reasons a maze cannot be generated with the requested parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Width or height is even or smaller than [`MIN_GRID_SIZE`].
    #[error("maze dimensions {width}x{height} must be odd and at least 3")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The start cell is outside the grid or not a junction.
    #[error("start cell ({}, {}) is not a junction inside the grid", .0.column(), .0.row())]
    InvalidStart(CellCoord),
}

/// Carves a maze and applies the open-up pass in one call.
pub fn generate<R>(
    width: u32,
    height: u32,
    start: CellCoord,
    open_fraction: f32,
    rng: &mut R,
) -> Result<MazeGrid, GenerationError>
where
    R: Rng + ?Sized,
{
    let mut grid = carve(width, height, start, rng)?;
    open_up(&mut grid, open_fraction, rng);
    Ok(grid)
}

/// Carves a perfect maze over the junction lattice starting at `start`.
///
/// Width and height must be odd and at least [`MIN_GRID_SIZE`]; callers
/// round up with [`labyrinth_core::round_up_to_odd`] first.
pub fn carve<R>(
    width: u32,
    height: u32,
    start: CellCoord,
    rng: &mut R,
) -> Result<MazeGrid, GenerationError>
where
    R: Rng + ?Sized,
{
    if width < MIN_GRID_SIZE || height < MIN_GRID_SIZE || width % 2 == 0 || height % 2 == 0 {
        return Err(GenerationError::InvalidDimensions { width, height });
    }

    let mut grid = MazeGrid::filled(width, height);
    let Some(start_index) = grid.index(start).filter(|_| start.is_junction()) else {
        return Err(GenerationError::InvalidStart(start));
    };

    let mut visited = vec![false; grid.cell_count()];
    let mut stack = vec![start];
    let mut frontier = Vec::with_capacity(Direction::CARDINALS.len());
    visited[start_index] = true;
    grid.open(start);

    while let Some(&current) = stack.last() {
        frontier.clear();
        frontier.extend(unvisited_junctions(&grid, current, &visited));

        let Some(&(between, next)) = frontier.choose(rng) else {
            let _ = stack.pop();
            continue;
        };

        grid.open(between);
        grid.open(next);
        if let Some(index) = grid.index(next) {
            visited[index] = true;
        }
        stack.push(next);
    }

    Ok(grid)
}

/// Junctions two steps away from `junction` that the carver has not
/// visited yet, paired with the wall cell separating them.
fn unvisited_junctions<'a>(
    grid: &'a MazeGrid,
    junction: CellCoord,
    visited: &'a [bool],
) -> impl Iterator<Item = (CellCoord, CellCoord)> + 'a {
    Direction::CARDINALS.into_iter().filter_map(move |direction| {
        let next = junction.offset(direction, 2)?;
        let index = grid.index(next)?;
        if visited.get(index).copied().unwrap_or(true) {
            return None;
        }
        let between = junction.step(direction)?;
        Some((between, next))
    })
}

/// Forces `floor(cell_count * open_fraction)` distinct random cells open.
///
/// The fraction is clamped to `[0, 1]`. Cells that are already passable
/// stay passable.
pub fn open_up<R>(grid: &mut MazeGrid, open_fraction: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let total = grid.cell_count();
    let fraction = if open_fraction.is_nan() {
        0.0
    } else {
        f64::from(open_fraction.clamp(0.0, 1.0))
    };
    let count = ((total as f64) * fraction).floor() as usize;
    let count = count.min(total);

    for index in rand::seq::index::sample(rng, total, count) {
        if let Some(cell) = grid.cell_at(index) {
            grid.open(cell);
        }
    }
}
