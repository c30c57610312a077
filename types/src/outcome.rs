//! Trial status and the result handed to the caller.

use std::fmt;

use serde::Serialize;

use crate::{NonEmptyStaticStr, PuzzleKind, TrialTier};

/// Coarse lifecycle of the trial session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialStatus {
    Idle,
    /// Waiting on player input for phase `phase` (0-based).
    PuzzlePhase { phase: usize },
    /// Narrating stage `stage` (0-based); input is not accepted.
    AnimationPhase { stage: usize },
    Resolved,
}

impl TrialStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TrialStatus::Idle => "idle",
            TrialStatus::PuzzlePhase { .. } => "puzzle",
            TrialStatus::AnimationPhase { .. } => "animation",
            TrialStatus::Resolved => "resolved",
        }
    }

    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, TrialStatus::Idle)
    }
}

impl fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialStatus::PuzzlePhase { phase } => write!(f, "puzzle phase {}", phase + 1),
            TrialStatus::AnimationPhase { stage } => write!(f, "animation stage {}", stage + 1),
            TrialStatus::Idle | TrialStatus::Resolved => f.write_str(self.as_str()),
        }
    }
}

/// Why a trial resolved the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", rename_all = "kebab-case")]
pub enum ResolutionCause {
    /// The outcome roll decided it.
    Roll,
    /// Attempts ran out on a puzzle phase; the roll never happened.
    PuzzleExhausted { kind: PuzzleKind },
}

/// Outcome of one trial.
///
/// Constructed once at resolution through the named constructors below and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResult {
    tier: TrialTier,
    success: bool,
    failure_probability: f64,
    roll: Option<f64>,
    hp_loss_amount: u32,
    narrative_outcome: NonEmptyStaticStr,
    #[serde(flatten)]
    cause: ResolutionCause,
}

impl TrialResult {
    #[must_use]
    pub fn ascended(
        tier: TrialTier,
        failure_probability: f64,
        roll: f64,
        hp_loss_amount: u32,
        narrative_outcome: NonEmptyStaticStr,
    ) -> Self {
        Self {
            tier,
            success: true,
            failure_probability,
            roll: Some(roll),
            hp_loss_amount,
            narrative_outcome,
            cause: ResolutionCause::Roll,
        }
    }

    #[must_use]
    pub fn roll_failed(
        tier: TrialTier,
        failure_probability: f64,
        roll: f64,
        narrative_outcome: NonEmptyStaticStr,
    ) -> Self {
        Self {
            tier,
            success: false,
            failure_probability,
            roll: Some(roll),
            hp_loss_amount: 0,
            narrative_outcome,
            cause: ResolutionCause::Roll,
        }
    }

    #[must_use]
    pub fn forced_failure(
        tier: TrialTier,
        failure_probability: f64,
        kind: PuzzleKind,
        narrative_outcome: NonEmptyStaticStr,
    ) -> Self {
        Self {
            tier,
            success: false,
            failure_probability,
            roll: None,
            hp_loss_amount: 0,
            narrative_outcome,
            cause: ResolutionCause::PuzzleExhausted { kind },
        }
    }

    #[must_use]
    pub const fn tier(&self) -> TrialTier {
        self.tier
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// The probability the roll was compared against.
    #[must_use]
    pub const fn failure_probability(&self) -> f64 {
        self.failure_probability
    }

    /// The uniform draw, absent for forced failures.
    #[must_use]
    pub const fn roll(&self) -> Option<f64> {
        self.roll
    }

    /// HP the caller should deduct. Zero unless the trial succeeded.
    #[must_use]
    pub const fn hp_loss_amount(&self) -> u32 {
        self.hp_loss_amount
    }

    #[must_use]
    pub const fn narrative_outcome(&self) -> NonEmptyStaticStr {
        self.narrative_outcome
    }

    #[must_use]
    pub const fn cause(&self) -> ResolutionCause {
        self.cause
    }

    #[must_use]
    pub const fn is_forced_failure(&self) -> bool {
        matches!(self.cause, ResolutionCause::PuzzleExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: NonEmptyStaticStr = NonEmptyStaticStr::new("the pattern eludes you");

    #[test]
    fn forced_failure_has_no_roll_and_no_hp_loss() {
        let result = TrialResult::forced_failure(
            TrialTier::CoreFormation,
            0.3,
            PuzzleKind::Permutation,
            LINE,
        );
        assert!(!result.success());
        assert!(result.is_forced_failure());
        assert_eq!(result.roll(), None);
        assert_eq!(result.hp_loss_amount(), 0);
    }

    #[test]
    fn serializes_cause_inline() {
        let result =
            TrialResult::forced_failure(TrialTier::NascentSoul, 0.5, PuzzleKind::GridMerge, LINE);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["cause"], "puzzle-exhausted");
        assert_eq!(value["kind"], "grid-merge");
        assert_eq!(value["tier"], "nascent-soul");
        assert_eq!(value["narrative_outcome"], "the pattern eludes you");
    }

    #[test]
    fn status_display() {
        assert_eq!(TrialStatus::PuzzlePhase { phase: 0 }.to_string(), "puzzle phase 1");
        assert_eq!(TrialStatus::Resolved.to_string(), "resolved");
    }
}
