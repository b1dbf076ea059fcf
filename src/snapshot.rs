//! Serializable game state.
//!
//! The snapshot is the single serializable unit: grid size, cell contents,
//! score, and the three terminal flags. The same shape backs persistence,
//! the single-level undo slot, and restart semantics.
//!
//! Cell contents are row-major: `cells[y][x]` is either `None` or the saved
//! tile at that cell. Per-turn provenance (`previous_position`,
//! `merged_from`) is deliberately absent; it never outlives a turn.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Position;

/// A tile as stored in a snapshot: position and value only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTile {
    pub position: Position,
    pub value: u32,
}

/// Serialized grid occupancy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Grid side length.
    pub size: usize,

    /// Row-major cell contents: `cells[y][x]`.
    pub cells: Vec<Vec<Option<SavedTile>>>,
}

/// Full game state at one point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub grid: GridSnapshot,
    pub score: u64,
    pub over: bool,
    pub won: bool,
    pub keep_playing: bool,
}

/// Why a stored snapshot was rejected on restore.
///
/// The engine fails fast on malformed data rather than building an
/// inconsistent grid; there are no recovery semantics for this case.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot grid size is zero")]
    ZeroSize,

    #[error("snapshot declares size {declared} but holds {rows} rows")]
    RowCountMismatch { declared: usize, rows: usize },

    #[error("row {y} holds {actual} cells, expected {expected}")]
    RowLengthMismatch {
        y: usize,
        actual: usize,
        expected: usize,
    },

    #[error("tile value {value} at ({x}, {y}) is not a power of two >= 2")]
    InvalidTileValue { value: u32, x: i32, y: i32 },

    #[error("tile stored at ({x}, {y}) records position {recorded}")]
    PositionMismatch { x: i32, y: i32, recorded: Position },
}
