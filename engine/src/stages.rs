use std::fmt;

use serde::Serialize;

/// Narration shown between the last puzzle and the outcome roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationStage {
    GatheringQi,
    OpeningMeridians,
    TribulationClouds,
    HeavenlyLightning,
    FateRevealed,
}

impl AnimationStage {
    pub const ALL: [AnimationStage; 5] = [
        AnimationStage::GatheringQi,
        AnimationStage::OpeningMeridians,
        AnimationStage::TribulationClouds,
        AnimationStage::HeavenlyLightning,
        AnimationStage::FateRevealed,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            AnimationStage::GatheringQi => 0,
            AnimationStage::OpeningMeridians => 1,
            AnimationStage::TribulationClouds => 2,
            AnimationStage::HeavenlyLightning => 3,
            AnimationStage::FateRevealed => 4,
        }
    }

    #[must_use]
    pub const fn first() -> Self {
        AnimationStage::GatheringQi
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            AnimationStage::GatheringQi => "Gathering Qi",
            AnimationStage::OpeningMeridians => "Opening the Meridians",
            AnimationStage::TribulationClouds => "Tribulation Clouds Gather",
            AnimationStage::HeavenlyLightning => "Heavenly Lightning Descends",
            AnimationStage::FateRevealed => "Fate Revealed",
        }
    }
}

impl fmt::Display for AnimationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
