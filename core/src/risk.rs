//! Risk model: aggregate character state to a single failure probability.
//!
//! Pure scoring. Only the eventual outcome roll is random; the probability
//! itself is a deterministic function of its inputs.

use breakthrough_types::{CombatStats, RiskInputs, RiskProfile, TrialTier};

/// Upper bound on the reduction stats can buy.
pub const MAX_ATTRIBUTE_BONUS: f64 = 0.20;
/// Reduction per multiple of the tier's stat requirement.
const ATTRIBUTE_BONUS_PER_REQUIREMENT: f64 = 0.05;
/// Reduction at a perfect equipment quality score.
pub const MAX_EQUIPMENT_BONUS: f64 = 0.15;
pub const MAX_EQUIPMENT_QUALITY: f64 = 100.0;
/// Fixed reduction granted by a bonded artifact.
pub const BONDED_ARTIFACT_BONUS: f64 = 0.10;

#[must_use]
pub fn compute_risk_profile(
    target_tier: TrialTier,
    aggregate_stats: &CombatStats,
    equipment_quality_score: f64,
    has_bonded_artifact: bool,
) -> RiskProfile {
    let attribute_bonus = attribute_bonus(target_tier, aggregate_stats);
    let equipment_bonus = equipment_bonus(equipment_quality_score);
    let artifact_bonus = if has_bonded_artifact {
        BONDED_ARTIFACT_BONUS
    } else {
        0.0
    };

    let failure_probability =
        (target_tier.base_risk() - attribute_bonus - equipment_bonus - artifact_bonus)
            .clamp(0.0, 1.0);

    RiskProfile::new(
        failure_probability,
        attribute_bonus,
        equipment_bonus,
        *aggregate_stats,
    )
}

/// Convenience over [`compute_risk_profile`] for a bundled request.
#[must_use]
pub fn profile_for(inputs: &RiskInputs) -> RiskProfile {
    compute_risk_profile(
        inputs.target_tier,
        &inputs.aggregate_stats,
        inputs.equipment_quality_score,
        inputs.has_bonded_artifact,
    )
}

fn attribute_bonus(tier: TrialTier, stats: &CombatStats) -> f64 {
    let ratio = stats.power() / tier.stat_requirement();
    (ratio * ATTRIBUTE_BONUS_PER_REQUIREMENT).clamp(0.0, MAX_ATTRIBUTE_BONUS)
}

fn equipment_bonus(quality: f64) -> f64 {
    if !quality.is_finite() {
        return 0.0;
    }
    MAX_EQUIPMENT_BONUS * quality.clamp(0.0, MAX_EQUIPMENT_QUALITY) / MAX_EQUIPMENT_QUALITY
}
