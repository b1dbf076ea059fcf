//! Directions, movement vectors, and grid positions.
//!
//! Input directions form a closed enum, so "invalid direction" is not a
//! representable state. Positions are signed: the move resolver probes one
//! cell past the farthest reachable cell, and that probe may step off the
//! board before a bounds check rejects it.

use serde::{Deserialize, Serialize};

/// One of the four cardinal move directions.
///
/// ```
/// use merge_grid::core::Direction;
///
/// let v = Direction::Left.vector();
/// assert_eq!((v.x, v.y), (-1, 0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All four directions, in the order used for terminal-state checks.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The unit vector tiles travel along for this direction.
    ///
    /// Up is negative `y`: the origin is the top-left corner.
    #[must_use]
    pub const fn vector(self) -> Vector {
        match self {
            Direction::Up => Vector { x: 0, y: -1 },
            Direction::Right => Vector { x: 1, y: 0 },
            Direction::Down => Vector { x: 0, y: 1 },
            Direction::Left => Vector { x: -1, y: 0 },
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        write!(f, "{name}")
    }
}

/// A unit step applied repeatedly while sliding a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

/// A grid coordinate. `(0, 0)` is the top-left cell.
///
/// Positions may hold out-of-bounds values transiently while probing past
/// the edge; `Grid::within_bounds` decides validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring position one step along `vector`.
    #[must_use]
    pub const fn step(self, vector: Vector) -> Self {
        Self {
            x: self.x + vector.x,
            y: self.y + vector.y,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_are_unit_steps() {
        for direction in Direction::ALL {
            let v = direction.vector();
            assert_eq!(v.x.abs() + v.y.abs(), 1);
        }
    }

    #[test]
    fn test_vector_mapping() {
        assert_eq!(Direction::Up.vector(), Vector { x: 0, y: -1 });
        assert_eq!(Direction::Right.vector(), Vector { x: 1, y: 0 });
        assert_eq!(Direction::Down.vector(), Vector { x: 0, y: 1 });
        assert_eq!(Direction::Left.vector(), Vector { x: -1, y: 0 });
    }

    #[test]
    fn test_step() {
        let pos = Position::new(1, 2);
        assert_eq!(pos.step(Direction::Right.vector()), Position::new(2, 2));
        assert_eq!(pos.step(Direction::Up.vector()), Position::new(1, 1));
    }

    #[test]
    fn test_step_can_leave_the_board() {
        let pos = Position::new(0, 0);
        assert_eq!(pos.step(Direction::Left.vector()), Position::new(-1, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Direction::Up), "up");
        assert_eq!(format!("{}", Position::new(3, 1)), "(3, 1)");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        let back: Direction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Direction::Left);

        let pos = Position::new(2, 3);
        let json = serde_json::to_string(&pos).unwrap();
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pos);
    }
}
