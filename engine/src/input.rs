//! What the host sends in and what it gets back.

use serde::Serialize;

use breakthrough_types::{Direction, Gesture, TrialResult};

use crate::stages::AnimationStage;

/// The single input surface of a trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    /// Sequence answer.
    Answer(i64),
    /// Two-click permutation selection (0-based).
    Select(usize),
    /// Direct permutation swap (0-based).
    Swap(usize, usize),
    Move(Direction),
    /// Resolved to a [`Direction`] and routed through the same move as
    /// [`PlayerAction::Move`].
    Swipe(Gesture),
    Submit,
    /// Dismiss a narrative phase.
    Acknowledge,
}

impl PlayerAction {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PlayerAction::Answer(_) => "answer",
            PlayerAction::Select(_) => "select",
            PlayerAction::Swap(..) => "swap",
            PlayerAction::Move(_) => "move",
            PlayerAction::Swipe(_) => "swipe",
            PlayerAction::Submit => "submit",
            PlayerAction::Acknowledge => "acknowledge",
        }
    }
}

/// Immediate effect of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ActionOutcome {
    /// Puzzle state changed; nothing was decided.
    Updated,
    /// Nothing changed (blocked move, short swipe, swap in place).
    NoOp,
    /// A failed attempt was recorded and attempts remain.
    AttemptFailed { attempts_used: u32, max_attempts: u32 },
    /// Phase solved; the next phase (0-based) is now active.
    PhaseCleared { next_phase: usize },
    /// Last phase solved; the animation has started.
    ChallengeCleared,
    /// Attempts exhausted; the trial resolved as a failure without a roll.
    ForcedFailure,
}

/// Things that happened while time passed, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum TrialEvent {
    StageEntered(AnimationStage),
    /// A grid board reached a terminal state. The board was dealt again
    /// unless attempts ran out.
    BoardCollapsed { attempts_used: u32, max_attempts: u32 },
    Resolved(TrialResult),
}
