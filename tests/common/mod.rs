//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use breakthrough_core::GridState;
use breakthrough_engine::TrialRequest;
use breakthrough_types::{CombatStats, MasteryScalar, RandomSource, RiskInputs, TrialResult, TrialTier};

/// Every unit draw returns the same value and every index draw is 0.
pub struct FixedUnit(pub f64);

impl RandomSource for FixedUnit {
    fn next_unit(&mut self) -> f64 {
        self.0
    }

    fn next_index(&mut self, _bound: usize) -> usize {
        0
    }
}

/// Middling stats, no gear, no artifact.
pub fn stats() -> CombatStats {
    CombatStats {
        attack: 40,
        defense: 40,
        max_hp: 800,
        spirit: 30,
        physique: 30,
        speed: 20,
    }
}

pub fn request(tier: TrialTier, mastery: f64) -> TrialRequest {
    TrialRequest {
        risk: RiskInputs {
            target_tier: tier,
            aggregate_stats: stats(),
            equipment_quality_score: 0.0,
            has_bonded_artifact: false,
        },
        mastery: MasteryScalar::new(mastery),
    }
}

/// Collects every result the completion handler receives.
#[derive(Clone, Default)]
pub struct Completions(Arc<Mutex<Vec<TrialResult>>>);

impl Completions {
    pub fn handler(&self) -> impl FnOnce(TrialResult) + Send + 'static {
        let sink = Arc::clone(&self.0);
        move |result| sink.lock().unwrap().push(result)
    }

    pub fn results(&self) -> Vec<TrialResult> {
        self.0.lock().unwrap().clone()
    }
}

/// Tiles drawn from small powers of two, with plenty of empties.
pub fn arb_tile() -> impl Strategy<Value = u32> {
    prop_oneof![
        3 => Just(0u32),
        2 => Just(2u32),
        2 => Just(4u32),
        1 => Just(8u32),
        1 => Just(16u32),
        1 => Just(32u32),
    ]
}

pub fn arb_grid() -> impl Strategy<Value = GridState> {
    prop::array::uniform4(prop::array::uniform4(arb_tile())).prop_map(GridState::from_cells)
}

/// Boards with no empty cell, so terminal states show up often.
pub fn arb_full_grid() -> impl Strategy<Value = GridState> {
    let tile = prop::sample::select(vec![2u32, 4, 8, 16]);
    prop::array::uniform4(prop::array::uniform4(tile)).prop_map(GridState::from_cells)
}

pub fn arb_tier() -> impl Strategy<Value = TrialTier> {
    prop::sample::select(TrialTier::all().to_vec())
}
