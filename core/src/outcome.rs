//! The outcome roll and forced failures.

use breakthrough_types::{PuzzleKind, RandomSource, RiskProfile, TrialResult, TrialTier};

use crate::narrative::{
    ProbabilityBand, failure_narrative, forced_failure_narrative, success_narrative,
};

/// Base HP cost of a successful breakthrough, as a fraction of max HP.
const HP_LOSS_BASE: f64 = 0.05;
/// Extra HP cost per unit of failure probability.
const HP_LOSS_PER_RISK: f64 = 0.25;

/// HP a successful breakthrough costs. Riskier trials cost more.
#[must_use]
pub fn hp_loss_on_success(max_hp: u32, failure_probability: f64) -> u32 {
    let fraction = HP_LOSS_BASE + HP_LOSS_PER_RISK * failure_probability.clamp(0.0, 1.0);
    (f64::from(max_hp) * fraction).round() as u32
}

/// Draw once and compare against the frozen failure probability.
pub fn roll_outcome<R: RandomSource + ?Sized>(
    tier: TrialTier,
    risk: &RiskProfile,
    rng: &mut R,
) -> TrialResult {
    let roll = rng.next_unit();
    outcome_for_roll(tier, risk, roll)
}

/// The trial fails iff `roll < failure_probability`.
#[must_use]
pub fn outcome_for_roll(tier: TrialTier, risk: &RiskProfile, roll: f64) -> TrialResult {
    let failure_probability = risk.failure_probability();
    let band = ProbabilityBand::from_failure_probability(failure_probability);
    if roll < failure_probability {
        TrialResult::roll_failed(tier, failure_probability, roll, failure_narrative(band))
    } else {
        let hp_loss = hp_loss_on_success(risk.aggregate_stats().max_hp, failure_probability);
        TrialResult::ascended(
            tier,
            failure_probability,
            roll,
            hp_loss,
            success_narrative(band),
        )
    }
}

/// Puzzle gate exhausted: no roll happens.
#[must_use]
pub fn forced_failure(tier: TrialTier, risk: &RiskProfile, kind: PuzzleKind) -> TrialResult {
    TrialResult::forced_failure(
        tier,
        risk.failure_probability(),
        kind,
        forced_failure_narrative(kind),
    )
}
