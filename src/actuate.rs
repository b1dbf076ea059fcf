//! Presentation collaborator contract.
//!
//! The engine pushes full renders; it never waits on or reads back from
//! presentation. `continue_game` clears whatever won/lost banner the
//! presentation may be showing.

use crate::grid::Grid;

/// Metadata accompanying a render push.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActuateMeta {
    pub score: u64,
    pub over: bool,
    pub won: bool,
    pub best_score: u64,
    /// Over, or won without keep-playing.
    pub terminated: bool,
}

/// Renders the grid and game metadata.
pub trait Actuator {
    /// Push a full render of the board and metadata.
    fn actuate(&mut self, grid: &Grid, meta: &ActuateMeta);

    /// Clear any game won/lost banner.
    fn continue_game(&mut self);
}

/// Presentation that does nothing. Headless games and tests that don't
/// assert on rendering use this.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullActuator;

impl Actuator for NullActuator {
    fn actuate(&mut self, _grid: &Grid, _meta: &ActuateMeta) {}

    fn continue_game(&mut self) {}
}
