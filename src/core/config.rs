//! Game configuration.
//!
//! The engine never hardcodes board geometry or the winning threshold;
//! callers configure them at startup. `Default` matches the classic game:
//! a 4x4 grid, two starting tiles, win at 2048.

use serde::{Deserialize, Serialize};

/// Configuration for one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Grid side length. Fixed for the grid's lifetime.
    pub size: usize,

    /// Number of tiles spawned on a fresh board.
    pub start_tiles: usize,

    /// Tile value that sets the `won` flag when first created by a merge.
    pub winning_value: u32,
}

impl GameConfig {
    /// Create a config with the given grid size and classic defaults for
    /// the rest.
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        assert!(size > 0, "Grid size must be positive");
        Self {
            size,
            ..Self::default()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 4,
            start_tiles: 2,
            winning_value: 2048,
        }
    }
}
