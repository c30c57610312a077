//! Errors raised by puzzle state mutations.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("position {position} is outside a row of {len}")]
    PositionOutOfRange { position: usize, len: usize },
}
