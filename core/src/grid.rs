//! Dense wall grid shared by generation, placement and the world.

use std::collections::VecDeque;

use thiserror::Error;

use crate::{CellCoord, Direction};

/// Smallest edge length a maze grid can have.
pub const MIN_GRID_SIZE: u32 = 3;

/// Rounds `value` up to the next odd edge length no smaller than [`MIN_GRID_SIZE`].
#[must_use]
pub const fn round_up_to_odd(value: u32) -> u32 {
    let value = if value < MIN_GRID_SIZE {
        MIN_GRID_SIZE
    } else {
        value
    };
    if value % 2 == 0 {
        value.saturating_add(1)
    } else {
        value
    }
}

/// Errors raised while parsing a textual grid.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridParseError {
    /// No rows, or rows without any cells.
    #[error("grid text contains no cells")]
    Empty,
    /// A row's length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: u32,
        /// Length of the first row.
        expected: u32,
        /// Length of the offending row.
        found: u32,
    },
    /// A character other than `#` or `.` was found.
    #[error("unknown tile `{tile}` at column {column}, row {row}")]
    UnknownTile {
        /// Column of the character.
        column: u32,
        /// Row of the character.
        row: u32,
        /// The character itself.
        tile: char,
    },
}

/// Row-major grid of blocked and passable cells.
///
/// Queries are total: any coordinate outside the grid reports as a wall.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MazeGrid {
    width: u32,
    height: u32,
    blocked: Vec<bool>,
}

impl MazeGrid {
    /// Creates a grid where every cell is blocked.
    #[must_use]
    pub fn filled(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            blocked: vec![true; capacity],
        }
    }

    /// Parses a grid from rows of `#` (wall) and `.` (open) characters.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GridParseError> {
        let expected = rows.first().map_or(0, |row| row.chars().count());
        if expected == 0 {
            return Err(GridParseError::Empty);
        }

        let width = u32::try_from(expected).map_err(|_| GridParseError::Empty)?;
        let height = u32::try_from(rows.len()).map_err(|_| GridParseError::Empty)?;
        let mut blocked = Vec::with_capacity(expected * rows.len());

        for (row_index, row) in (0..height).zip(rows) {
            let found = row.chars().count();
            if found != expected {
                return Err(GridParseError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found: u32::try_from(found).unwrap_or(u32::MAX),
                });
            }

            for (column, tile) in (0..width).zip(row.chars()) {
                match tile {
                    '#' => blocked.push(true),
                    '.' => blocked.push(false),
                    other => {
                        return Err(GridParseError::UnknownTile {
                            column,
                            row: row_index,
                            tile: other,
                        })
                    }
                }
            }
        }

        Ok(Self {
            width,
            height,
            blocked,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.blocked.len()
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Reports whether the cell is blocked. Out-of-bounds cells are walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.blocked.get(index).copied())
            .unwrap_or(true)
    }

    /// Reports whether the cell is inside the grid and passable.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        !self.is_wall(cell)
    }

    /// Marks the cell passable. Out-of-bounds cells are ignored.
    pub fn open(&mut self, cell: CellCoord) {
        self.set_blocked(cell, false);
    }

    /// Marks the cell blocked. Out-of-bounds cells are ignored.
    pub fn block(&mut self, cell: CellCoord) {
        self.set_blocked(cell, true);
    }

    fn set_blocked(&mut self, cell: CellCoord, blocked: bool) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.blocked.get_mut(index) {
                *slot = blocked;
            }
        }
    }

    /// Row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell stored at the provided row-major index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.blocked.len() {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.width;
        (0..self.height)
            .flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }

    /// Every passable cell in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells().filter(|cell| self.is_open(*cell))
    }

    /// Every junction cell in row-major order, passable or not.
    pub fn junctions(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells().filter(CellCoord::is_junction)
    }

    /// Number of passable cells.
    #[must_use]
    pub fn open_cell_count(&self) -> usize {
        self.blocked.iter().filter(|blocked| !**blocked).count()
    }

    /// Passable cells orthogonally adjacent to `cell`.
    pub fn open_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::CARDINALS
            .into_iter()
            .filter_map(move |direction| cell.step(direction))
            .filter(|neighbor| self.is_open(*neighbor))
    }

    /// Every passable cell reachable from `start`, in breadth-first order.
    ///
    /// Returns an empty list when `start` is a wall.
    #[must_use]
    pub fn reachable_from(&self, start: CellCoord) -> Vec<CellCoord> {
        let mut reached = Vec::new();
        let _ = self.breadth_first(start, |cell| {
            reached.push(cell);
            false
        });
        reached
    }

    /// Shortest passable route from `from` to `to`.
    ///
    /// The route excludes `from` and ends with `to`; it is empty when both
    /// cells coincide. Returns `None` when either end is a wall or no route
    /// exists.
    #[must_use]
    pub fn shortest_path(&self, from: CellCoord, to: CellCoord) -> Option<Vec<CellCoord>> {
        if self.is_wall(to) {
            return None;
        }
        let parents = self.breadth_first(from, |cell| cell == to)?;

        let mut path = Vec::new();
        let mut cursor = to;
        while cursor != from {
            path.push(cursor);
            let index = self.index(cursor)?;
            cursor = parents.get(index).copied().flatten()?;
        }
        path.reverse();
        Some(path)
    }

    /// Breadth-first flood from `start`, calling `visit` for every reached
    /// cell until it returns `true`.
    ///
    /// Returns the parent links of the explored region once `visit` stops
    /// the search, or `None` when `start` is a wall or the flood exhausted
    /// the region without stopping.
    fn breadth_first<F>(&self, start: CellCoord, mut visit: F) -> Option<Vec<Option<CellCoord>>>
    where
        F: FnMut(CellCoord) -> bool,
    {
        let start_index = self.index(start)?;
        if self.is_wall(start) {
            return None;
        }

        let mut seen = vec![false; self.blocked.len()];
        let mut parents: Vec<Option<CellCoord>> = vec![None; self.blocked.len()];
        let mut queue = VecDeque::new();
        seen[start_index] = true;
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            if visit(cell) {
                return Some(parents);
            }

            for neighbor in self.open_neighbors(cell) {
                let Some(index) = self.index(neighbor) else {
                    continue;
                };
                if seen[index] {
                    continue;
                }
                seen[index] = true;
                parents[index] = Some(cell);
                queue.push_back(neighbor);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_up_to_odd_enforces_minimum() {
        assert_eq!(round_up_to_odd(0), 3);
        assert_eq!(round_up_to_odd(3), 3);
        assert_eq!(round_up_to_odd(10), 11);
        assert_eq!(round_up_to_odd(25), 25);
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = MazeGrid::from_rows(&["...", "...", "..."]).expect("grid parses");
        assert!(!grid.is_wall(CellCoord::new(2, 2)));
        assert!(grid.is_wall(CellCoord::new(3, 0)));
        assert!(grid.is_wall(CellCoord::new(0, 3)));
        assert!(grid.is_wall(CellCoord::new(u32::MAX, u32::MAX)));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        assert_eq!(
            MazeGrid::from_rows(&["...", ".."]),
            Err(GridParseError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            })
        );
        assert_eq!(MazeGrid::from_rows(&[]), Err(GridParseError::Empty));
        assert!(matches!(
            MazeGrid::from_rows(&[".x."]),
            Err(GridParseError::UnknownTile { tile: 'x', .. })
        ));
    }

    #[test]
    fn index_round_trips_through_cell_at() {
        let grid = MazeGrid::filled(5, 3);
        for cell in grid.cells() {
            let index = grid.index(cell).expect("cell inside grid");
            assert_eq!(grid.cell_at(index), Some(cell));
        }
        assert_eq!(grid.cell_at(15), None);
    }

    #[test]
    fn reachable_from_stops_at_walls() {
        let grid = MazeGrid::from_rows(&["..#..", "..#..", "..#.."]).expect("grid parses");
        let reached = grid.reachable_from(CellCoord::new(0, 0));
        assert_eq!(reached.len(), 6);
        assert!(reached.iter().all(|cell| cell.column() < 2));
        assert!(grid.reachable_from(CellCoord::new(2, 0)).is_empty());
    }

    #[test]
    fn shortest_path_walks_around_walls() {
        let grid = MazeGrid::from_rows(&[".#...", ".#.#.", "...#."]).expect("grid parses");
        let path = grid
            .shortest_path(CellCoord::new(0, 0), CellCoord::new(4, 0))
            .expect("route exists");
        assert_eq!(path.len(), 8);
        assert_eq!(path.last(), Some(&CellCoord::new(4, 0)));
        assert!(path.iter().all(|cell| grid.is_open(*cell)));
        assert_eq!(
            grid.shortest_path(CellCoord::new(0, 0), CellCoord::new(0, 0)),
            Some(Vec::new())
        );
        assert_eq!(
            grid.shortest_path(CellCoord::new(0, 0), CellCoord::new(1, 0)),
            None
        );
    }
}
