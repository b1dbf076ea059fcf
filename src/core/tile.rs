//! Numbered tiles and their per-turn provenance.
//!
//! Tiles are plain values owned by the grid cell they occupy. There is no
//! arena and no back-pointer from a tile to its cell; the grid primitives
//! keep `position` consistent with the occupied cell.
//!
//! Two fields exist only for the duration of one turn and are reset by
//! `prepare_for_turn` before traversal:
//!
//! - `previous_position`: where the tile sat when the turn began. Used for
//!   movement detection and as an animation hint for presentation.
//! - `merged_from`: the two source tiles a merge consumed, present only on
//!   tiles created by a merge this turn. Its presence is what enforces
//!   at-most-one-merge-per-tile-per-turn.

use super::direction::Position;

/// A single numbered tile on the grid.
///
/// `value` is always a power of two, 2 at minimum. When `merged_from` is
/// present the two sources sum to `value`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Current grid position.
    pub position: Position,

    /// Tile value (power of two, >= 2).
    pub value: u32,

    /// Position at the start of the current turn, if any.
    pub previous_position: Option<Position>,

    /// The two tiles this one absorbed, set only during the turn the merge
    /// happened. Boxed because the sources each carry their own provenance
    /// fields (always `None` at merge time).
    pub merged_from: Option<Box<(Tile, Tile)>>,
}

impl Tile {
    /// Create a freshly spawned tile with no provenance.
    #[must_use]
    pub fn new(position: Position, value: u32) -> Self {
        Self {
            position,
            value,
            previous_position: None,
            merged_from: None,
        }
    }

    /// Create the result of merging two equal tiles at `position`.
    ///
    /// The new tile's value is the sum of the sources.
    #[must_use]
    pub fn merged(position: Position, moving: Tile, target: Tile) -> Self {
        let value = moving.value + target.value;
        Self {
            position,
            value,
            previous_position: None,
            merged_from: Some(Box::new((moving, target))),
        }
    }

    /// Reset per-turn fields, recording the current position as previous.
    ///
    /// Called for every occupied cell before traversal begins.
    pub fn prepare_for_turn(&mut self) {
        self.previous_position = Some(self.position);
        self.merged_from = None;
    }

    /// Move the tile to a new position. The grid keeps cell occupancy in
    /// sync; this only updates the tile's own record.
    pub fn update_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Whether this tile was produced by a merge during the current turn.
    #[must_use]
    pub fn was_merged(&self) -> bool {
        self.merged_from.is_some()
    }
}
