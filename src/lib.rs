//! # merge-grid
//!
//! A deterministic rules engine for sliding-tile merge puzzles (2048-style).
//!
//! The engine owns grid state, tile movement, the merge algorithm, scoring,
//! win/loss detection, and the snapshot machinery behind persistence, undo,
//! and restart. Rendering, input devices, and the persistence medium stay
//! outside, behind narrow traits.
//!
//! ## Design Principles
//!
//! 1. **One synchronous turn per intent**: an input event triggers one
//!    complete, non-interruptible resolution pass.
//!
//! 2. **Injected randomness**: tile spawns draw from a seeded `SpawnRng`,
//!    so games replay exactly under the same seed.
//!
//! 3. **Collaborators behind traits**: the engine never touches a concrete
//!    store or UI; `Storage` and `Actuator` are the only seams.
//!
//! ## Modules
//!
//! - `core`: directions, positions, tiles, RNG, configuration
//! - `grid`: the board and its mutation primitives
//! - `snapshot`: serializable game state and restore errors
//! - `storage`: persistence contract and in-memory implementation
//! - `actuate`: presentation contract
//! - `engine`: the game controller and move resolver

pub mod actuate;
pub mod core;
pub mod engine;
pub mod grid;
pub mod snapshot;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{Direction, GameConfig, Position, SpawnRng, SpawnRngState, Tile, Vector};

pub use crate::grid::Grid;

pub use crate::snapshot::{GameSnapshot, GridSnapshot, SavedTile, SnapshotError};

pub use crate::storage::{MemoryStorage, Storage};

pub use crate::actuate::{ActuateMeta, Actuator, NullActuator};

pub use crate::engine::{GameManager, Intent};
