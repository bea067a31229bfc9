use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key code for the left arrow key.
pub const KEY_LEFT: i32 = 37;
/// Key code for the up arrow key.
pub const KEY_UP: i32 = 38;
/// Key code for the right arrow key.
pub const KEY_RIGHT: i32 = 39;
/// Key code for the down arrow key.
pub const KEY_DOWN: i32 = 40;
pub const KEY_A: i32 = 65;
pub const KEY_D: i32 = 68;
pub const KEY_S: i32 = 83;
pub const KEY_W: i32 = 87;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Movement axis shared by a pair of opposite directions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// Unit step `(dx, dy)` in grid cells; y grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Maps a raw key code to a direction using the fixed arrow/WASD table.
    pub fn from_key_code(key_code: i32) -> Result<Self, InputError> {
        match key_code {
            KEY_UP | KEY_W => Ok(Self::Up),
            KEY_DOWN | KEY_S => Ok(Self::Down),
            KEY_LEFT | KEY_A => Ok(Self::Left),
            KEY_RIGHT | KEY_D => Ok(Self::Right),
            other => Err(InputError::UnknownKeyCode(other)),
        }
    }

    /// Arrow key code that maps to this direction.
    #[must_use]
    pub fn key_code(self) -> i32 {
        match self {
            Self::Up => KEY_UP,
            Self::Down => KEY_DOWN,
            Self::Left => KEY_LEFT,
            Self::Right => KEY_RIGHT,
        }
    }
}

/// Rejected player input. Never fatal; the engine ignores the input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum InputError {
    #[error("key code {0} does not map to a direction")]
    UnknownKeyCode(i32),
    #[error("cannot turn from {current:?} to {requested:?}: same axis")]
    SameAxis {
        current: Direction,
        requested: Direction,
    },
}

/// Returns whether a direction change is legal: only 90° turns are allowed,
/// so both reversals and repeats of the current direction are rejected.
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    current.axis() != next.axis()
}
