//! Persistence collaborator contract.
//!
//! The engine never touches a concrete store; it talks to a `Storage`
//! implementation through three slots:
//!
//! - the current game state, restored by `setup`,
//! - a single-use "last move" slot backing one level of undo,
//! - the best score.
//!
//! Failures in the medium are the implementation's concern and never roll
//! back game state.

use tracing::warn;

use crate::snapshot::GameSnapshot;

/// Where game state, the undo slot, and the best score live.
pub trait Storage {
    /// The stored game state, if a game is in progress.
    fn game_state(&self) -> Option<GameSnapshot>;

    /// Store the current game state.
    fn set_game_state(&mut self, snapshot: &GameSnapshot);

    /// Remove the stored game state.
    fn clear_game_state(&mut self);

    /// Best score seen so far (0 when none stored).
    fn best_score(&self) -> u64;

    /// Store a new best score.
    fn set_best_score(&mut self, score: u64);

    /// The pre-move snapshot backing undo.
    ///
    /// With `consume` the stored value is removed after the read, which is
    /// what limits undo to a single level.
    fn last_move(&mut self, consume: bool) -> Option<GameSnapshot>;

    /// Store the pre-move snapshot for undo.
    fn set_last_move(&mut self, snapshot: &GameSnapshot);

    /// Drop any stored undo history.
    fn clear_last_moves(&mut self);
}

/// In-process storage.
///
/// Snapshots are held as `bincode` bytes rather than live values, the same
/// encode/decode round trip a real medium would impose. A slot that fails
/// to decode reads as absent.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    game_state: Option<Vec<u8>>,
    last_move: Option<Vec<u8>>,
    best_score: u64,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn decode(slot: &str, bytes: &[u8]) -> Option<GameSnapshot> {
        match bincode::deserialize(bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                warn!(slot, %error, "stored snapshot failed to decode; treating as absent");
                None
            }
        }
    }

    fn encode(slot: &str, snapshot: &GameSnapshot) -> Option<Vec<u8>> {
        match bincode::serialize(snapshot) {
            Ok(bytes) => Some(bytes),
            Err(error) => {
                warn!(slot, %error, "snapshot failed to encode; slot left unchanged");
                None
            }
        }
    }
}

impl Storage for MemoryStorage {
    fn game_state(&self) -> Option<GameSnapshot> {
        Self::decode("game_state", self.game_state.as_deref()?)
    }

    fn set_game_state(&mut self, snapshot: &GameSnapshot) {
        if let Some(bytes) = Self::encode("game_state", snapshot) {
            self.game_state = Some(bytes);
        }
    }

    fn clear_game_state(&mut self) {
        self.game_state = None;
    }

    fn best_score(&self) -> u64 {
        self.best_score
    }

    fn set_best_score(&mut self, score: u64) {
        self.best_score = score;
    }

    fn last_move(&mut self, consume: bool) -> Option<GameSnapshot> {
        let bytes = if consume {
            self.last_move.take()?
        } else {
            self.last_move.clone()?
        };
        Self::decode("last_move", &bytes)
    }

    fn set_last_move(&mut self, snapshot: &GameSnapshot) {
        if let Some(bytes) = Self::encode("last_move", snapshot) {
            self.last_move = Some(bytes);
        }
    }

    fn clear_last_moves(&mut self) {
        self.last_move = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;
    use crate::snapshot::{GridSnapshot, SavedTile};

    fn snapshot(score: u64) -> GameSnapshot {
        let mut cells = vec![vec![None; 2]; 2];
        cells[0][0] = Some(SavedTile {
            position: Position::new(0, 0),
            value: 2,
        });
        GameSnapshot {
            grid: GridSnapshot { size: 2, cells },
            score,
            over: false,
            won: false,
            keep_playing: false,
        }
    }

    #[test]
    fn test_empty_storage() {
        let mut storage = MemoryStorage::new();
        assert!(storage.game_state().is_none());
        assert!(storage.last_move(true).is_none());
        assert_eq!(storage.best_score(), 0);
    }

    #[test]
    fn test_game_state_round_trip() {
        let mut storage = MemoryStorage::new();
        let snap = snapshot(40);

        storage.set_game_state(&snap);
        assert_eq!(storage.game_state(), Some(snap));

        storage.clear_game_state();
        assert!(storage.game_state().is_none());
    }

    #[test]
    fn test_last_move_peek_does_not_consume() {
        let mut storage = MemoryStorage::new();
        let snap = snapshot(8);
        storage.set_last_move(&snap);

        assert_eq!(storage.last_move(false), Some(snap.clone()));
        assert_eq!(storage.last_move(false), Some(snap));
    }

    #[test]
    fn test_last_move_consume_is_single_use() {
        let mut storage = MemoryStorage::new();
        let snap = snapshot(8);
        storage.set_last_move(&snap);

        assert_eq!(storage.last_move(true), Some(snap));
        assert!(storage.last_move(true).is_none());
    }

    #[test]
    fn test_clear_last_moves() {
        let mut storage = MemoryStorage::new();
        storage.set_last_move(&snapshot(8));
        storage.clear_last_moves();
        assert!(storage.last_move(false).is_none());
    }

    #[test]
    fn test_best_score() {
        let mut storage = MemoryStorage::new();
        storage.set_best_score(128);
        assert_eq!(storage.best_score(), 128);
    }

    #[test]
    fn test_corrupt_slot_reads_as_absent() {
        let mut storage = MemoryStorage::new();
        storage.game_state = Some(vec![0xff, 0x01]);
        assert!(storage.game_state().is_none());
    }
}
