//! Directional input shared by discrete commands and swipe gestures.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parse a direction word or its WASD key.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "w" => Some(Direction::Up),
            "down" | "s" => Some(Direction::Down),
            "left" | "l" | "a" => Some(Direction::Left),
            "right" | "r" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drag from touch-down to release, in screen coordinates (+y is down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub dx: f32,
    pub dy: f32,
}

impl Gesture {
    /// Minimum travel along the dominant axis before a drag counts as a swipe.
    pub const MIN_TRAVEL: f32 = 30.0;

    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Resolve the swipe to a direction by its dominant axis.
    ///
    /// Returns `None` for taps and drags shorter than [`Self::MIN_TRAVEL`].
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        let (ax, ay) = (self.dx.abs(), self.dy.abs());
        if !ax.is_finite() || !ay.is_finite() || ax.max(ay) < Self::MIN_TRAVEL {
            return None;
        }
        if ax >= ay {
            Some(if self.dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            Some(if self.dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        }
    }
}
