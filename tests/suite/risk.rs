//! Risk model bounds and monotonicity.

use proptest::prelude::*;

use breakthrough_core::{compute_risk_profile, hp_loss_on_success, outcome_for_roll};
use breakthrough_core::risk::{MAX_ATTRIBUTE_BONUS, MAX_EQUIPMENT_BONUS};
use breakthrough_types::{CombatStats, TrialTier};

use crate::common::arb_tier;

fn arb_stats() -> impl Strategy<Value = CombatStats> {
    (0u32..2000, 0u32..2000, 0u32..50_000, 0u32..2000, 0u32..2000, 0u32..2000).prop_map(
        |(attack, defense, max_hp, spirit, physique, speed)| CombatStats {
            attack,
            defense,
            max_hp,
            spirit,
            physique,
            speed,
        },
    )
}

proptest! {
    #[test]
    fn probabilities_stay_in_bounds(
        tier in arb_tier(),
        stats in arb_stats(),
        quality in any::<f64>(),
        artifact in any::<bool>(),
    ) {
        let profile = compute_risk_profile(tier, &stats, quality, artifact);
        let fp = profile.failure_probability();
        prop_assert!((0.0..=1.0).contains(&fp));
        prop_assert!((profile.success_probability() - (1.0 - fp)).abs() < 1e-12);
        prop_assert!((0.0..=MAX_ATTRIBUTE_BONUS).contains(&profile.attribute_bonus()));
        prop_assert!((0.0..=MAX_EQUIPMENT_BONUS).contains(&profile.equipment_bonus()));
    }

    #[test]
    fn better_character_never_raises_risk(
        tier in arb_tier(),
        stats in arb_stats(),
        extra in 0u32..500,
        quality in 0.0f64..100.0,
        more_quality in 0.0f64..50.0,
    ) {
        let base = compute_risk_profile(tier, &stats, quality, false).failure_probability();

        let stronger = CombatStats { attack: stats.attack + extra, ..stats };
        prop_assert!(compute_risk_profile(tier, &stronger, quality, false).failure_probability() <= base);
        prop_assert!(compute_risk_profile(tier, &stats, quality + more_quality, false).failure_probability() <= base);
        prop_assert!(compute_risk_profile(tier, &stats, quality, true).failure_probability() <= base);
    }

    #[test]
    fn higher_tiers_are_never_safer(stats in arb_stats(), quality in 0.0f64..100.0) {
        let risks: Vec<f64> = TrialTier::all()
            .iter()
            .map(|&tier| compute_risk_profile(tier, &stats, quality, false).failure_probability())
            .collect();
        for pair in risks.windows(2) {
            prop_assert!(pair[0] <= pair[1], "{:?}", risks);
        }
    }

    #[test]
    fn roll_decides_against_the_frozen_probability(
        tier in arb_tier(),
        stats in arb_stats(),
        roll in 0.0f64..1.0,
    ) {
        let profile = compute_risk_profile(tier, &stats, 0.0, false);
        let result = outcome_for_roll(tier, &profile, roll);
        prop_assert_eq!(result.success(), roll >= profile.failure_probability());
        prop_assert_eq!(result.roll(), Some(roll));
        if result.success() {
            prop_assert_eq!(
                result.hp_loss_amount(),
                hp_loss_on_success(stats.max_hp, profile.failure_probability())
            );
        } else {
            prop_assert_eq!(result.hp_loss_amount(), 0);
        }
    }
}

#[test]
fn unprepared_first_breakthrough_uses_base_risk() {
    let profile =
        compute_risk_profile(TrialTier::QiCondensation, &CombatStats::default(), 0.0, false);
    assert!((profile.failure_probability() - 0.15).abs() < 1e-12);
}

#[test]
fn bonuses_cap_out() {
    let stats = CombatStats {
        attack: 100_000,
        ..CombatStats::default()
    };
    let profile = compute_risk_profile(TrialTier::ImmortalAscension, &stats, 500.0, true);
    assert!((profile.attribute_bonus() - MAX_ATTRIBUTE_BONUS).abs() < 1e-12);
    assert!((profile.equipment_bonus() - MAX_EQUIPMENT_BONUS).abs() < 1e-12);
    assert!((profile.failure_probability() - (0.85 - 0.20 - 0.15 - 0.10)).abs() < 1e-9);
}
