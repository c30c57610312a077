//! Errors returned by the orchestrator.

use thiserror::Error;

use breakthrough_core::PuzzleError;
use breakthrough_types::{PuzzleKind, TrialStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrialError {
    #[error("a trial is already open")]
    AlreadyOpen,
    #[error("no trial is open")]
    NotOpen,
    #[error("input is not accepted during {status}")]
    NotAcceptingInput { status: TrialStatus },
    #[error("{action} does not apply to a {kind} puzzle")]
    ActionMismatch {
        action: &'static str,
        kind: PuzzleKind,
    },
    #[error("position {position} is outside a row of {len}")]
    PositionOutOfRange { position: usize, len: usize },
}

impl From<PuzzleError> for TrialError {
    fn from(err: PuzzleError) -> Self {
        match err {
            PuzzleError::PositionOutOfRange { position, len } => {
                TrialError::PositionOutOfRange { position, len }
            }
        }
    }
}
