//! The board: a fixed-size square matrix of optional tiles.
//!
//! The grid owns its tiles outright. Every mutation goes through the
//! primitives here, which keep one invariant: an occupied cell's tile
//! always records that cell as its own position.
//!
//! Out-of-bounds lookups answer "no tile" rather than erroring; the move
//! resolver leans on this when probing one cell past the board edge.

use tracing::trace;

use crate::core::{Position, SpawnRng, Tile};
use crate::snapshot::{GridSnapshot, SavedTile, SnapshotError};

/// An N x N board of optional tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: usize,
    /// Row-major storage: `rows[y][x]`.
    rows: Vec<Vec<Option<Tile>>>,
}

impl Grid {
    /// Create an empty grid.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Grid size must be positive");
        Self {
            size,
            rows: vec![vec![None; size]; size],
        }
    }

    /// Rebuild a grid from a snapshot, reproducing exact occupancy.
    ///
    /// Fails fast on malformed data: wrong dimensions, values that are not
    /// powers of two, or tiles whose recorded position disagrees with the
    /// cell they sit in.
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.size == 0 {
            return Err(SnapshotError::ZeroSize);
        }
        if snapshot.cells.len() != snapshot.size {
            return Err(SnapshotError::RowCountMismatch {
                declared: snapshot.size,
                rows: snapshot.cells.len(),
            });
        }

        let mut grid = Grid::new(snapshot.size);
        for (y, row) in snapshot.cells.iter().enumerate() {
            if row.len() != snapshot.size {
                return Err(SnapshotError::RowLengthMismatch {
                    y,
                    actual: row.len(),
                    expected: snapshot.size,
                });
            }
            for (x, cell) in row.iter().enumerate() {
                let Some(saved) = cell else { continue };
                let here = Position::new(x as i32, y as i32);
                if saved.value < 2 || !saved.value.is_power_of_two() {
                    return Err(SnapshotError::InvalidTileValue {
                        value: saved.value,
                        x: here.x,
                        y: here.y,
                    });
                }
                if saved.position != here {
                    return Err(SnapshotError::PositionMismatch {
                        x: here.x,
                        y: here.y,
                        recorded: saved.position,
                    });
                }
                grid.rows[y][x] = Some(Tile::new(here, saved.value));
            }
        }
        Ok(grid)
    }

    /// Grid side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether a position lies on the board.
    #[must_use]
    pub fn within_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as usize) < self.size
            && (position.y as usize) < self.size
    }

    /// The tile at a position, if any. Out-of-bounds positions hold no tile.
    #[must_use]
    pub fn cell_content(&self, position: Position) -> Option<&Tile> {
        if self.within_bounds(position) {
            self.rows[position.y as usize][position.x as usize].as_ref()
        } else {
            None
        }
    }

    /// Whether a position is on the board and empty.
    #[must_use]
    pub fn cell_available(&self, position: Position) -> bool {
        self.within_bounds(position) && self.cell_content(position).is_none()
    }

    /// Whether at least one cell is empty.
    #[must_use]
    pub fn cells_available(&self) -> bool {
        self.rows.iter().any(|row| row.iter().any(Option::is_none))
    }

    /// All empty positions, in row-major order.
    #[must_use]
    pub fn available_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if cell.is_none() {
                    cells.push(Position::new(x as i32, y as i32));
                }
            }
        }
        cells
    }

    /// Pick one empty cell uniformly at random, or `None` when the board is
    /// full. Callers check `cells_available` before spawning.
    #[must_use]
    pub fn random_available_cell(&self, rng: &mut SpawnRng) -> Option<Position> {
        let cells = self.available_cells();
        if cells.is_empty() {
            None
        } else {
            Some(cells[rng.gen_range_usize(0..cells.len())])
        }
    }

    /// Place a tile at its own recorded position.
    ///
    /// The target cell must be empty; any prior occupant reference is
    /// overwritten (merge resolution relies on this to replace the target).
    pub fn insert_tile(&mut self, tile: Tile) {
        debug_assert!(self.within_bounds(tile.position));
        trace!(position = %tile.position, value = tile.value, "insert tile");
        let position = tile.position;
        self.rows[position.y as usize][position.x as usize] = Some(tile);
    }

    /// Clear the cell at a tile's recorded position.
    pub fn remove_tile(&mut self, tile: &Tile) {
        debug_assert!(self.within_bounds(tile.position));
        self.rows[tile.position.y as usize][tile.position.x as usize] = None;
    }

    /// Take the tile at a position out of the grid, leaving the cell empty.
    #[must_use]
    pub fn take_tile(&mut self, position: Position) -> Option<Tile> {
        if self.within_bounds(position) {
            self.rows[position.y as usize][position.x as usize].take()
        } else {
            None
        }
    }

    /// Iterate over all tiles.
    pub fn each_tile(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().flatten().filter_map(Option::as_ref)
    }

    /// Iterate mutably over all tiles (turn preparation).
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.rows.iter_mut().flatten().filter_map(Option::as_mut)
    }

    /// Snapshot current occupancy.
    #[must_use]
    pub fn serialize(&self) -> GridSnapshot {
        let cells = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        cell.as_ref().map(|tile| SavedTile {
                            position: tile.position,
                            value: tile.value,
                        })
                    })
                    .collect()
            })
            .collect();
        GridSnapshot {
            size: self.size,
            cells,
        }
    }
}
