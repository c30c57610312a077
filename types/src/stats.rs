//! Character inputs the trial reads but never mutates.

use serde::{Deserialize, Serialize};

/// Aggregate combat stats copied into a trial when it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack: u32,
    pub defense: u32,
    pub max_hp: u32,
    pub spirit: u32,
    pub physique: u32,
    pub speed: u32,
}

impl CombatStats {
    /// Single power figure the risk model compares against a tier's requirement.
    ///
    /// HP is weighted down because it runs an order of magnitude above the
    /// other stats.
    #[must_use]
    pub fn power(&self) -> f64 {
        f64::from(self.attack)
            + f64::from(self.defense)
            + f64::from(self.spirit)
            + f64::from(self.physique)
            + f64::from(self.speed)
            + f64::from(self.max_hp) / 10.0
    }
}

/// Progression proxy that scales puzzle difficulty.
///
/// Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasteryScalar(f64);

impl MasteryScalar {
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.max(0.0))
        } else {
            Self(0.0)
        }
    }

    /// Derive mastery from unlocked abilities, unlocks, and bonded artifact quality.
    #[must_use]
    pub fn from_progression(abilities: u32, unlocks: u32, artifact_quality: f64) -> Self {
        let artifact = if artifact_quality.is_finite() {
            artifact_quality.clamp(0.0, 10.0)
        } else {
            0.0
        };
        Self::new(1.5 * f64::from(abilities) + f64::from(unlocks) + 2.0 * artifact)
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.0 * factor)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}
