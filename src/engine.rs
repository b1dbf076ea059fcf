//! Game controller and move resolution.
//!
//! `GameManager` owns the grid, score, and terminal flags, and orchestrates
//! one complete turn per input intent: snapshot, resolve, mutate, spawn,
//! terminal check, actuate. Persistence and presentation are reached only
//! through the `Storage` and `Actuator` traits.
//!
//! ## Move resolution
//!
//! A move visits every cell in a direction-dependent traversal order: along
//! any axis whose movement vector component is `1`, indices are walked in
//! descending order, so tiles nearest the destination edge resolve first.
//! That ordering alone guarantees a tile is never moved into a cell that a
//! later tile still has to vacate, and gives merges their priority.
//!
//! Each occupied cell slides to the farthest empty cell in the move
//! direction. If the cell one step beyond holds an equal tile that has not
//! itself been produced by a merge this turn, the two combine into a new
//! tile of double value; `merged_from` on the product is what blocks chain
//! merges within the same turn.
//!
//! ## Concurrency
//!
//! Single-threaded and synchronous: one intent resolves completely before
//! control returns. There is no internal reentrancy guard; the input source
//! is expected to deliver intents sequentially.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::actuate::{ActuateMeta, Actuator};
use crate::core::{Direction, GameConfig, Position, SpawnRng, Tile, Vector};
use crate::grid::Grid;
use crate::snapshot::{GameSnapshot, SnapshotError};
use crate::storage::Storage;

/// Probability that a spawned tile is a 2 rather than a 4.
const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Traversal index list. Inline up to 8 so classic grid sizes never allocate.
type Traversal = SmallVec<[i32; 8]>;

/// One input event from the outside world.
///
/// The set is closed, so invalid input is not representable; there is
/// nothing to reject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Intent {
    Move(Direction),
    Restart,
    Undo,
    KeepPlaying,
}

/// The rules engine for one game.
///
/// Generic over its collaborators so tests can observe persistence and
/// rendering without a real medium or UI.
pub struct GameManager<S: Storage, A: Actuator> {
    config: GameConfig,
    grid: Grid,
    score: u64,
    over: bool,
    won: bool,
    keep_playing: bool,
    rng: SpawnRng,
    storage: S,
    actuator: A,
}

impl<S: Storage, A: Actuator> GameManager<S, A> {
    /// Create a manager and run setup.
    ///
    /// If `storage` holds a game state it is restored verbatim; otherwise a
    /// fresh grid is built and the configured start tiles are spawned. The
    /// seed drives all spawn randomness.
    ///
    /// Fails only when a stored snapshot is malformed.
    pub fn new(config: GameConfig, storage: S, actuator: A, seed: u64) -> Result<Self, SnapshotError> {
        let mut manager = Self {
            config,
            grid: Grid::new(config.size),
            score: 0,
            over: false,
            won: false,
            keep_playing: false,
            rng: SpawnRng::new(seed),
            storage,
            actuator,
        };
        manager.setup()?;
        Ok(manager)
    }

    /// Dispatch one input intent.
    pub fn handle(&mut self, intent: Intent) -> Result<(), SnapshotError> {
        match intent {
            Intent::Move(direction) => {
                self.make_move(direction);
                Ok(())
            }
            Intent::Restart => self.restart(),
            Intent::Undo => self.undo(),
            Intent::KeepPlaying => {
                self.keep_playing();
                Ok(())
            }
        }
    }

    // === Lifecycle ===

    /// Restore a stored game or start a fresh one, then push state to
    /// presentation and persistence.
    fn setup(&mut self) -> Result<(), SnapshotError> {
        if let Some(previous) = self.storage.game_state() {
            self.grid = Grid::from_snapshot(&previous.grid)?;
            self.score = previous.score;
            self.over = previous.over;
            self.won = previous.won;
            self.keep_playing = previous.keep_playing;
            debug!(score = self.score, "restored saved game");
        } else {
            self.grid = Grid::new(self.config.size);
            self.score = 0;
            self.over = false;
            self.won = false;
            self.keep_playing = false;
            for _ in 0..self.config.start_tiles {
                self.add_random_tile();
            }
            debug!(size = self.config.size, "started fresh game");
        }

        self.actuate();
        Ok(())
    }

    /// Wipe saved state and undo history, clear the banner, start over.
    pub fn restart(&mut self) -> Result<(), SnapshotError> {
        self.storage.clear_last_moves();
        self.storage.clear_game_state();
        self.actuator.continue_game();
        self.setup()
    }

    /// Restore the state preceding the last move, if one is stored.
    ///
    /// The slot is consumed on read, so a second consecutive undo is a
    /// no-op. Nothing spawns during the restore.
    pub fn undo(&mut self) -> Result<(), SnapshotError> {
        if let Some(snapshot) = self.storage.last_move(true) {
            self.storage.set_game_state(&snapshot);
            self.actuator.continue_game();
            self.setup()?;
        }
        Ok(())
    }

    /// Keep playing past a win; the game no longer reads as terminated.
    pub fn keep_playing(&mut self) {
        self.keep_playing = true;
        self.actuator.continue_game();
    }

    /// True iff the game is lost, or won without the player electing to
    /// keep playing.
    #[must_use]
    pub fn is_game_terminated(&self) -> bool {
        self.over || (self.won && !self.keep_playing)
    }

    // === Move resolution ===

    /// Resolve one full-grid move. A move that shifts nothing is a complete
    /// no-op: no spawn, no score change, no undo slot write.
    pub fn make_move(&mut self, direction: Direction) {
        if self.is_game_terminated() {
            return;
        }

        let before = self.serialize();
        let vector = direction.vector();
        let (xs, ys) = self.build_traversals(vector);

        for tile in self.grid.tiles_mut() {
            tile.prepare_for_turn();
        }

        let mut moved = false;

        for &x in &xs {
            for &y in &ys {
                let cell = Position::new(x, y);
                let Some(tile) = self.grid.cell_content(cell).cloned() else {
                    continue;
                };

                let (farthest, next) = self.find_farthest_position(cell, vector);

                // Merge only into an equal tile that is not itself the
                // product of a merge this turn. That single condition is
                // what stops 2,2,4 from collapsing past 4,4.
                let target = self
                    .grid
                    .cell_content(next)
                    .filter(|other| other.value == tile.value && !other.was_merged())
                    .cloned();

                if let Some(target) = target {
                    let merged = Tile::merged(next, tile.clone(), target);
                    let merged_value = merged.value;

                    self.grid.insert_tile(merged);
                    self.grid.remove_tile(&tile);

                    self.score += u64::from(merged_value);
                    if merged_value == self.config.winning_value {
                        self.won = true;
                    }

                    trace!(from = %cell, to = %next, value = merged_value, "merge");
                    // next is at least one step from cell, so this always moved
                    moved = true;
                } else if farthest != cell {
                    self.move_tile(cell, farthest);
                    trace!(from = %cell, to = %farthest, "slide");
                    moved = true;
                }
            }
        }

        if moved {
            self.storage.set_last_move(&before);
            self.add_random_tile();

            if !self.moves_available() {
                self.over = true;
            }

            debug!(%direction, score = self.score, over = self.over, won = self.won, "move resolved");
            self.actuate();
        }
    }

    /// Index orders per axis: descending along an axis whose vector
    /// component is 1, ascending otherwise, so destination-edge tiles
    /// resolve first.
    fn build_traversals(&self, vector: Vector) -> (Traversal, Traversal) {
        let size = self.grid.size() as i32;
        let mut xs: Traversal = (0..size).collect();
        let mut ys: Traversal = (0..size).collect();

        if vector.x == 1 {
            xs.reverse();
        }
        if vector.y == 1 {
            ys.reverse();
        }

        (xs, ys)
    }

    /// The farthest empty cell reachable from `cell` along `vector`, and
    /// the cell one step beyond it (possibly occupied or off the board).
    fn find_farthest_position(&self, cell: Position, vector: Vector) -> (Position, Position) {
        let mut previous = cell;
        let mut probe = cell.step(vector);

        while self.grid.within_bounds(probe) && self.grid.cell_available(probe) {
            previous = probe;
            probe = previous.step(vector);
        }

        (previous, probe)
    }

    /// Relocate a tile without merging, keeping cell and position in sync.
    fn move_tile(&mut self, from: Position, to: Position) {
        if let Some(mut tile) = self.grid.take_tile(from) {
            tile.update_position(to);
            self.grid.insert_tile(tile);
        }
    }

    /// Spawn one tile (2 with probability 0.9, else 4) at a uniformly
    /// random empty cell. Does nothing on a full board.
    fn add_random_tile(&mut self) {
        if !self.grid.cells_available() {
            return;
        }
        let value = if self.rng.gen_bool(SPAWN_TWO_PROBABILITY) { 2 } else { 4 };
        if let Some(cell) = self.grid.random_available_cell(&mut self.rng) {
            self.grid.insert_tile(Tile::new(cell, value));
        }
    }

    // === Terminal detection ===

    /// Whether any move remains in any direction. Pure query, no mutation.
    fn moves_available(&self) -> bool {
        self.grid.cells_available() || self.tile_matches_available()
    }

    /// Whether any tile has an equal-valued neighbor.
    fn tile_matches_available(&self) -> bool {
        for tile in self.grid.each_tile() {
            for direction in Direction::ALL {
                let neighbor = tile.position.step(direction.vector());
                if let Some(other) = self.grid.cell_content(neighbor) {
                    if other.value == tile.value {
                        return true;
                    }
                }
            }
        }
        false
    }

    // === Rendering and persistence ===

    /// Maintain the best score, persist (or clear, once over) the current
    /// state, and push a render.
    fn actuate(&mut self) {
        if self.storage.best_score() < self.score {
            self.storage.set_best_score(self.score);
        }

        // A finished game is not worth restoring
        if self.over {
            self.storage.clear_game_state();
        } else {
            self.storage.set_game_state(&self.serialize());
        }

        let meta = ActuateMeta {
            score: self.score,
            over: self.over,
            won: self.won,
            best_score: self.storage.best_score(),
            terminated: self.is_game_terminated(),
        };
        self.actuator.actuate(&self.grid, &meta);
    }

    /// The full serializable state.
    #[must_use]
    pub fn serialize(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.grid.serialize(),
            score: self.score,
            over: self.over,
            won: self.won,
            keep_playing: self.keep_playing,
        }
    }

    // === Accessors ===

    /// Current board.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Whether no further move is possible.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Whether the winning tile has been created.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// The configuration this game runs under.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The persistence collaborator, for inspection.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuate::NullActuator;
    use crate::snapshot::{GridSnapshot, SavedTile};
    use crate::storage::MemoryStorage;

    fn snapshot_from_rows(rows: &[[u32; 4]; 4], score: u64) -> GameSnapshot {
        let cells = rows
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, &value)| {
                        (value != 0).then(|| SavedTile {
                            position: Position::new(x as i32, y as i32),
                            value,
                        })
                    })
                    .collect()
            })
            .collect();
        GameSnapshot {
            grid: GridSnapshot { size: 4, cells },
            score,
            over: false,
            won: false,
            keep_playing: false,
        }
    }

    fn manager_from_rows(rows: &[[u32; 4]; 4]) -> GameManager<MemoryStorage, NullActuator> {
        let mut storage = MemoryStorage::new();
        storage.set_game_state(&snapshot_from_rows(rows, 0));
        GameManager::new(GameConfig::default(), storage, NullActuator, 42).unwrap()
    }

    #[test]
    fn test_fresh_setup_spawns_start_tiles() {
        let manager =
            GameManager::new(GameConfig::default(), MemoryStorage::new(), NullActuator, 42).unwrap();

        assert_eq!(manager.grid().each_tile().count(), 2);
        assert_eq!(manager.score(), 0);
        assert!(!manager.is_over());
        assert!(!manager.is_won());
        for tile in manager.grid().each_tile() {
            assert!(tile.value == 2 || tile.value == 4);
        }
    }

    #[test]
    fn test_setup_restores_verbatim() {
        let mut snapshot = snapshot_from_rows(&[[2, 0, 0, 0]; 4], 300);
        snapshot.won = true;
        snapshot.keep_playing = true;

        let mut storage = MemoryStorage::new();
        storage.set_game_state(&snapshot);
        let manager =
            GameManager::new(GameConfig::default(), storage, NullActuator, 1).unwrap();

        assert_eq!(manager.score(), 300);
        assert!(manager.is_won());
        assert!(!manager.is_game_terminated()); // keep_playing restored
        assert_eq!(manager.grid().each_tile().count(), 4); // no extra spawns
    }

    #[test]
    fn test_malformed_stored_snapshot_fails_fast() {
        let mut snapshot = snapshot_from_rows(&[[0; 4]; 4], 0);
        snapshot.grid.cells[0][0] = Some(SavedTile {
            position: Position::new(0, 0),
            value: 5,
        });

        let mut storage = MemoryStorage::new();
        storage.set_game_state(&snapshot);
        let result = GameManager::new(GameConfig::default(), storage, NullActuator, 1);

        assert!(matches!(result, Err(SnapshotError::InvalidTileValue { value: 5, .. })));
    }

    #[test]
    fn test_traversal_reversed_toward_destination() {
        let manager = manager_from_rows(&[[0; 4]; 4]);

        let (xs, ys) = manager.build_traversals(Direction::Right.vector());
        assert_eq!(xs.as_slice(), &[3, 2, 1, 0]);
        assert_eq!(ys.as_slice(), &[0, 1, 2, 3]);

        let (xs, ys) = manager.build_traversals(Direction::Down.vector());
        assert_eq!(xs.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(ys.as_slice(), &[3, 2, 1, 0]);

        let (xs, ys) = manager.build_traversals(Direction::Left.vector());
        assert_eq!(xs.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(ys.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_find_farthest_position() {
        let manager = manager_from_rows(&[
            [2, 0, 0, 8],
            [0; 4],
            [0; 4],
            [0; 4],
        ]);

        // Sliding right from (0,0): farthest empty is (2,0), beyond is the 8
        let (farthest, next) =
            manager.find_farthest_position(Position::new(0, 0), Direction::Right.vector());
        assert_eq!(farthest, Position::new(2, 0));
        assert_eq!(next, Position::new(3, 0));

        // Sliding left from (3,0): blocked immediately past (1,0) by the 2
        let (farthest, next) =
            manager.find_farthest_position(Position::new(3, 0), Direction::Left.vector());
        assert_eq!(farthest, Position::new(1, 0));
        assert_eq!(next, Position::new(0, 0));

        // Sliding up from (0,0): already on the edge, beyond is off-board
        let (farthest, next) =
            manager.find_farthest_position(Position::new(0, 0), Direction::Up.vector());
        assert_eq!(farthest, Position::new(0, 0));
        assert_eq!(next, Position::new(0, -1));
    }

    #[test]
    fn test_moves_available_on_sparse_and_full_grids() {
        let sparse = manager_from_rows(&[[2, 0, 0, 0]; 4]);
        assert!(sparse.moves_available());

        // Full, no equal neighbors
        let stuck = manager_from_rows(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(!stuck.moves_available());

        // Full, but one adjacent equal pair remains
        let matchable = manager_from_rows(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 4],
        ]);
        assert!(matchable.moves_available());
    }

    #[test]
    fn test_intent_dispatch() {
        let mut manager = manager_from_rows(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);

        manager.handle(Intent::Move(Direction::Left)).unwrap();
        assert_eq!(manager.score(), 4);

        manager.handle(Intent::Undo).unwrap();
        assert_eq!(manager.score(), 0);

        manager.handle(Intent::Restart).unwrap();
        assert_eq!(manager.score(), 0);
        assert_eq!(manager.grid().each_tile().count(), 2);
    }

    #[test]
    fn test_intent_serde() {
        let intent = Intent::Move(Direction::Down);
        let json = serde_json::to_string(&intent).unwrap();
        let back: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(intent, back);
    }
}
