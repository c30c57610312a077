//! Flavor text: outcome bands, forced-failure lines, and narrative phases.

use serde::Serialize;

use breakthrough_types::{DifficultyTier, MasteryScalar, NonEmptyStaticStr, PuzzleKind};

/// Coarse band of a failure probability. Outcome text depends on the band,
/// never on the exact roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbabilityBand {
    /// `[0, 0.25)`
    Favorable,
    /// `[0.25, 0.5)`
    Uncertain,
    /// `[0.5, 0.75)`
    Perilous,
    /// `[0.75, 1]`
    Dire,
}

impl ProbabilityBand {
    pub const ALL: [ProbabilityBand; 4] = [
        ProbabilityBand::Favorable,
        ProbabilityBand::Uncertain,
        ProbabilityBand::Perilous,
        ProbabilityBand::Dire,
    ];

    #[must_use]
    pub fn from_failure_probability(failure_probability: f64) -> Self {
        if failure_probability < 0.25 {
            ProbabilityBand::Favorable
        } else if failure_probability < 0.5 {
            ProbabilityBand::Uncertain
        } else if failure_probability < 0.75 {
            ProbabilityBand::Perilous
        } else {
            ProbabilityBand::Dire
        }
    }
}

#[must_use]
pub const fn success_narrative(band: ProbabilityBand) -> NonEmptyStaticStr {
    match band {
        ProbabilityBand::Favorable => NonEmptyStaticStr::new(
            "The heavens barely stir. Your foundation was never in doubt, and the new realm settles into you like an old robe.",
        ),
        ProbabilityBand::Uncertain => NonEmptyStaticStr::new(
            "The lightning tests you and finds you sufficient. You rise, scorched but whole, into the next realm.",
        ),
        ProbabilityBand::Perilous => NonEmptyStaticStr::new(
            "Against the odds the tribulation breaks before you do. Blood on your lips, you step across the threshold.",
        ),
        ProbabilityBand::Dire => NonEmptyStaticStr::new(
            "No one believed you would survive, least of all the heavens. Through sheer will you tear the sky open and ascend.",
        ),
    }
}

#[must_use]
pub const fn failure_narrative(band: ProbabilityBand) -> NonEmptyStaticStr {
    match band {
        ProbabilityBand::Favorable => NonEmptyStaticStr::new(
            "A single stray thought scatters your gathered qi. The realm was within reach, and it slipped away.",
        ),
        ProbabilityBand::Uncertain => NonEmptyStaticStr::new(
            "The fourth bolt finds the crack in your meridians. You fall back to the earth, your cultivation shaken.",
        ),
        ProbabilityBand::Perilous => NonEmptyStaticStr::new(
            "The tribulation clouds do not relent. Your body endures, but the breakthrough collapses around you.",
        ),
        ProbabilityBand::Dire => NonEmptyStaticStr::new(
            "You reached for a realm far beyond your foundation. The heavens answered, and you were not ready.",
        ),
    }
}

/// Line shown when the puzzle gate of `kind` is exhausted.
#[must_use]
pub const fn forced_failure_narrative(kind: PuzzleKind) -> NonEmptyStaticStr {
    match kind {
        PuzzleKind::Sequence => NonEmptyStaticStr::new(
            "The pattern of the heavens eludes you. Without understanding, the breakthrough cannot begin.",
        ),
        PuzzleKind::Permutation => NonEmptyStaticStr::new(
            "The trigrams refuse to align. Your meridians knot and the gathered qi disperses.",
        ),
        PuzzleKind::GridMerge => NonEmptyStaticStr::new(
            "The spirit stones jam and crack. The resonance you needed never forms.",
        ),
        PuzzleKind::Narrative => NonEmptyStaticStr::new(
            "Your resolve wavers at the last moment, and the heavens do not wait.",
        ),
    }
}

/// Which story beat a narrative phase tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NarrativePrompt {
    /// Opening phase of the composite trial.
    HeartDemon,
    /// Closing phase of the composite trial.
    FinalResolve,
}

const HEART_DEMON_LINES: &[NonEmptyStaticStr] = &[
    NonEmptyStaticStr::new("A voice that sounds like your own whispers every doubt you have buried."),
    NonEmptyStaticStr::new("It names the friends you abandoned and the shortcuts you took."),
    NonEmptyStaticStr::new("You listen, acknowledge each word, and let it pass through you."),
];

const FINAL_RESOLVE_LINES: &[NonEmptyStaticStr] = &[
    NonEmptyStaticStr::new("Every trial is behind you. Only the last step remains."),
    NonEmptyStaticStr::new("Immortality waits on the far side of the storm."),
    NonEmptyStaticStr::new("Steady your breath. Commit."),
];

impl NarrativePrompt {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            NarrativePrompt::HeartDemon => "Heart Demon",
            NarrativePrompt::FinalResolve => "Final Resolve",
        }
    }

    #[must_use]
    pub const fn lines(self) -> &'static [NonEmptyStaticStr] {
        match self {
            NarrativePrompt::HeartDemon => HEART_DEMON_LINES,
            NarrativePrompt::FinalResolve => FINAL_RESOLVE_LINES,
        }
    }
}

/// A phase with nothing to solve. It resolves on acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativePuzzle {
    prompt: NarrativePrompt,
    mastery: MasteryScalar,
}

impl NarrativePuzzle {
    pub const MAX_ATTEMPTS: u32 = 1;

    #[must_use]
    pub const fn new(prompt: NarrativePrompt, mastery: MasteryScalar) -> Self {
        Self { prompt, mastery }
    }

    #[must_use]
    pub const fn prompt(&self) -> NarrativePrompt {
        self.prompt
    }

    #[must_use]
    pub const fn lines(&self) -> &'static [NonEmptyStaticStr] {
        self.prompt.lines()
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyTier {
        DifficultyTier::from_mastery(self.mastery)
    }
}
