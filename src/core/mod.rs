//! Core engine types: directions, positions, tiles, RNG, configuration.
//!
//! This module contains the fundamental building blocks the grid and the
//! game engine are built from.

pub mod config;
pub mod direction;
pub mod rng;
pub mod tile;

pub use config::GameConfig;
pub use direction::{Direction, Position, Vector};
pub use rng::{SpawnRng, SpawnRngState};
pub use tile::Tile;
