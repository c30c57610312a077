//! Realm ladder, challenge kinds, and difficulty bands.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The realm a breakthrough trial attempts to reach.
///
/// Ordered: each tier is strictly riskier than the one before it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TrialTier {
    QiCondensation,
    FoundationEstablishment,
    CoreFormation,
    NascentSoul,
    SpiritSevering,
    VoidRefinement,
    BodyIntegration,
    ImmortalAscension,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown realm: {0}")]
pub struct TierParseError(pub String);

impl TrialTier {
    const ALL: [TrialTier; 8] = [
        TrialTier::QiCondensation,
        TrialTier::FoundationEstablishment,
        TrialTier::CoreFormation,
        TrialTier::NascentSoul,
        TrialTier::SpiritSevering,
        TrialTier::VoidRefinement,
        TrialTier::BodyIntegration,
        TrialTier::ImmortalAscension,
    ];

    #[must_use]
    pub fn all() -> &'static [TrialTier] {
        &Self::ALL
    }

    /// 1-based position on the ladder.
    #[must_use]
    pub const fn rank(self) -> u32 {
        match self {
            TrialTier::QiCondensation => 1,
            TrialTier::FoundationEstablishment => 2,
            TrialTier::CoreFormation => 3,
            TrialTier::NascentSoul => 4,
            TrialTier::SpiritSevering => 5,
            TrialTier::VoidRefinement => 6,
            TrialTier::BodyIntegration => 7,
            TrialTier::ImmortalAscension => 8,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TrialTier::QiCondensation => "qi-condensation",
            TrialTier::FoundationEstablishment => "foundation-establishment",
            TrialTier::CoreFormation => "core-formation",
            TrialTier::NascentSoul => "nascent-soul",
            TrialTier::SpiritSevering => "spirit-severing",
            TrialTier::VoidRefinement => "void-refinement",
            TrialTier::BodyIntegration => "body-integration",
            TrialTier::ImmortalAscension => "immortal-ascension",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            TrialTier::QiCondensation => "Qi Condensation",
            TrialTier::FoundationEstablishment => "Foundation Establishment",
            TrialTier::CoreFormation => "Core Formation",
            TrialTier::NascentSoul => "Nascent Soul",
            TrialTier::SpiritSevering => "Spirit Severing",
            TrialTier::VoidRefinement => "Void Refinement",
            TrialTier::BodyIntegration => "Body Integration",
            TrialTier::ImmortalAscension => "Immortal Ascension",
        }
    }

    /// Failure probability before any stat, gear, or artifact reduction.
    #[must_use]
    pub const fn base_risk(self) -> f64 {
        match self {
            TrialTier::QiCondensation => 0.15,
            TrialTier::FoundationEstablishment => 0.25,
            TrialTier::CoreFormation => 0.35,
            TrialTier::NascentSoul => 0.45,
            TrialTier::SpiritSevering => 0.55,
            TrialTier::VoidRefinement => 0.65,
            TrialTier::BodyIntegration => 0.75,
            TrialTier::ImmortalAscension => 0.85,
        }
    }

    /// Aggregate stat power at which the stat reduction reaches a quarter of its cap.
    #[must_use]
    pub const fn stat_requirement(self) -> f64 {
        100.0 * self.rank() as f64
    }

    /// The puzzle gate guarding this tier, if any.
    #[must_use]
    pub const fn challenge(self) -> Option<Challenge> {
        match self {
            TrialTier::QiCondensation | TrialTier::SpiritSevering => None,
            TrialTier::FoundationEstablishment => Some(Challenge::Single(PuzzleKind::Sequence)),
            TrialTier::CoreFormation | TrialTier::VoidRefinement => {
                Some(Challenge::Single(PuzzleKind::Permutation))
            }
            TrialTier::NascentSoul | TrialTier::BodyIntegration => {
                Some(Challenge::Single(PuzzleKind::GridMerge))
            }
            TrialTier::ImmortalAscension => Some(Challenge::Composite),
        }
    }

    #[must_use]
    pub fn first() -> Self {
        Self::ALL[0]
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.rank() as usize).copied()
    }

    /// Parse from the kebab-case id or the display name, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, TierParseError> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Self::ALL
            .iter()
            .copied()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| TierParseError(raw.trim().to_string()))
    }
}

impl fmt::Display for TrialTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Puzzle variants a trial phase can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PuzzleKind {
    Sequence,
    Permutation,
    GridMerge,
    Narrative,
}

impl PuzzleKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PuzzleKind::Sequence => "sequence",
            PuzzleKind::Permutation => "permutation",
            PuzzleKind::GridMerge => "grid-merge",
            PuzzleKind::Narrative => "narrative",
        }
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Challenge {
    Single(PuzzleKind),
    /// The five-phase gate of the final realm.
    Composite,
}

/// Difficulty band derived from a mastery scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifficultyTier {
    Novice,
    Adept,
    Master,
}

impl DifficultyTier {
    pub const ADEPT_THRESHOLD: f64 = 12.0;
    pub const MASTER_THRESHOLD: f64 = 30.0;

    #[must_use]
    pub fn from_mastery(mastery: crate::MasteryScalar) -> Self {
        let value = mastery.value();
        if value >= Self::MASTER_THRESHOLD {
            DifficultyTier::Master
        } else if value >= Self::ADEPT_THRESHOLD {
            DifficultyTier::Adept
        } else {
            DifficultyTier::Novice
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DifficultyTier::Novice => "novice",
            DifficultyTier::Adept => "adept",
            DifficultyTier::Master => "master",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MasteryScalar;

    #[test]
    fn base_risk_strictly_increases_along_the_ladder() {
        let risks: Vec<f64> = TrialTier::all().iter().map(|t| t.base_risk()).collect();
        assert!(risks.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn next_walks_the_ladder_and_stops_at_the_peak() {
        assert_eq!(
            TrialTier::QiCondensation.next(),
            Some(TrialTier::FoundationEstablishment)
        );
        assert_eq!(TrialTier::ImmortalAscension.next(), None);
    }

    #[test]
    fn parse_accepts_ids_and_display_names() {
        assert_eq!(
            TrialTier::parse("core-formation").unwrap(),
            TrialTier::CoreFormation
        );
        assert_eq!(
            TrialTier::parse("  Nascent Soul ").unwrap(),
            TrialTier::NascentSoul
        );
        assert_eq!(
            TrialTier::parse("immortal_ascension").unwrap(),
            TrialTier::ImmortalAscension
        );
        assert!(TrialTier::parse("mortal").is_err());
    }

    #[test]
    fn only_the_final_realm_is_composite() {
        let composite: Vec<_> = TrialTier::all()
            .iter()
            .filter(|t| t.challenge() == Some(Challenge::Composite))
            .collect();
        assert_eq!(composite, vec![&TrialTier::ImmortalAscension]);
    }

    #[test]
    fn difficulty_bands() {
        assert_eq!(
            DifficultyTier::from_mastery(MasteryScalar::new(0.0)),
            DifficultyTier::Novice
        );
        assert_eq!(
            DifficultyTier::from_mastery(MasteryScalar::new(12.0)),
            DifficultyTier::Adept
        );
        assert_eq!(
            DifficultyTier::from_mastery(MasteryScalar::new(29.9)),
            DifficultyTier::Adept
        );
        assert_eq!(
            DifficultyTier::from_mastery(MasteryScalar::new(45.0)),
            DifficultyTier::Master
        );
    }
}
