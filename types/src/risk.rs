//! Risk inputs and the immutable snapshot computed from them.

use serde::{Deserialize, Serialize};

use crate::{CombatStats, TrialTier};

/// Everything the risk model reads when a trial opens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskInputs {
    pub target_tier: TrialTier,
    pub aggregate_stats: CombatStats,
    pub equipment_quality_score: f64,
    pub has_bonded_artifact: bool,
}

/// Probability snapshot taken once when a trial opens.
///
/// # Invariants
///
/// - `failure_probability` is in `[0, 1]`
/// - Bonuses are non-negative
/// - Immutable: no setters exist, so the value rolled against is always the
///   value that was shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskProfile {
    failure_probability: f64,
    attribute_bonus: f64,
    equipment_bonus: f64,
    aggregate_stats: CombatStats,
}

impl RiskProfile {
    /// Clamp and freeze a computed profile. Non-finite values collapse to 0.
    #[must_use]
    pub fn new(
        failure_probability: f64,
        attribute_bonus: f64,
        equipment_bonus: f64,
        aggregate_stats: CombatStats,
    ) -> Self {
        Self {
            failure_probability: clamp_unit(failure_probability),
            attribute_bonus: clamp_unit(attribute_bonus),
            equipment_bonus: clamp_unit(equipment_bonus),
            aggregate_stats,
        }
    }

    #[must_use]
    pub const fn failure_probability(&self) -> f64 {
        self.failure_probability
    }

    #[must_use]
    pub const fn success_probability(&self) -> f64 {
        1.0 - self.failure_probability
    }

    #[must_use]
    pub const fn attribute_bonus(&self) -> f64 {
        self.attribute_bonus
    }

    #[must_use]
    pub const fn equipment_bonus(&self) -> f64 {
        self.equipment_bonus
    }

    #[must_use]
    pub const fn aggregate_stats(&self) -> &CombatStats {
        &self.aggregate_stats
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
