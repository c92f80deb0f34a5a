use serde::{Deserialize, Serialize};

pub mod config;
pub mod engine;
pub mod level;
pub mod map;

pub use config::{ConfigError, EngineConfig};
pub use engine::{GridEngine, PendingReset};
pub use level::{GameState, LevelError, Tile};

/// Represents a 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Offsets the position by `(dx, dy)`.
    ///
    /// Returns `None` if either coordinate would go below zero. The upper
    /// bound is the grid's concern, not the position's.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Position> {
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

/// One of the four unit moves the player can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the `(dx, dy)` step for this direction. `y` grows downwards.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Converts a unit vector back into a direction.
    ///
    /// Zero and diagonal vectors have no direction.
    pub fn from_delta(dx: isize, dy: isize) -> Option<Direction> {
        match (dx, dy) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Categorical result of one engine operation, consumed by presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing noteworthy happened (including blocked moves).
    None,
    KeyCollected,
    /// Emitted right after the `KeyCollected` that opened the door.
    AllKeysCollected,
    DoorLocked,
    Death,
    Win,
    /// A scheduled reset has restored the level.
    LevelReset,
}

impl Outcome {
    /// Whether this outcome ends the round and schedules a reset.
    pub fn ends_round(self) -> bool {
        matches!(self, Outcome::Death | Outcome::Win)
    }
}
