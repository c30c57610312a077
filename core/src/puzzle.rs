//! The puzzle sum type handed to the orchestrator.

use serde::Serialize;

use breakthrough_types::{DifficultyTier, MasteryScalar, PuzzleKind, RandomSource};

use crate::grid::{GridMergePuzzle, GridTarget};
use crate::narrative::{NarrativePrompt, NarrativePuzzle};
use crate::permutation::PermutationPuzzle;
use crate::sequence::{REVEALED_TERMS, SequencePuzzle};

/// One generated challenge. Each variant carries exactly the payload its
/// logic needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "kebab-case")]
pub enum PuzzleInstance {
    Sequence(SequencePuzzle),
    Permutation(PermutationPuzzle),
    GridMerge(GridMergePuzzle),
    Narrative(NarrativePuzzle),
}

impl PuzzleInstance {
    #[must_use]
    pub const fn kind(&self) -> PuzzleKind {
        match self {
            PuzzleInstance::Sequence(_) => PuzzleKind::Sequence,
            PuzzleInstance::Permutation(_) => PuzzleKind::Permutation,
            PuzzleInstance::GridMerge(_) => PuzzleKind::GridMerge,
            PuzzleInstance::Narrative(_) => PuzzleKind::Narrative,
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyTier {
        match self {
            PuzzleInstance::Sequence(p) => p.difficulty(),
            PuzzleInstance::Permutation(p) => p.difficulty(),
            PuzzleInstance::GridMerge(p) => p.difficulty(),
            PuzzleInstance::Narrative(p) => p.difficulty(),
        }
    }

    /// Failed attempts (or permutation steps) allowed before forced failure.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        match self {
            PuzzleInstance::Sequence(p) => p.max_attempts(),
            PuzzleInstance::Permutation(p) => p.max_steps(),
            PuzzleInstance::GridMerge(p) => p.max_attempts(),
            PuzzleInstance::Narrative(_) => NarrativePuzzle::MAX_ATTEMPTS,
        }
    }

    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        match self {
            PuzzleInstance::Sequence(_) => "Divine the next number in the heavenly sequence.",
            PuzzleInstance::Permutation(_) => "Restore the trigrams to their true order.",
            PuzzleInstance::GridMerge(_) => {
                "Merge the spirit stones until their resonance reaches the target."
            }
            PuzzleInstance::Narrative(p) => p.prompt().title(),
        }
    }

    /// Check generator output. Violations are generator bugs, so this only
    /// fires in debug builds.
    pub fn debug_validate(&self) {
        match self {
            PuzzleInstance::Sequence(p) => {
                debug_assert_eq!(p.revealed().len(), REVEALED_TERMS, "sequence length");
                debug_assert!(
                    p.rule().verify(p.revealed(), p.solution()),
                    "sequence solution disagrees with its rule"
                );
            }
            PuzzleInstance::Permutation(p) => {
                let mut target = p.target().to_vec();
                let mut current = p.current().to_vec();
                target.sort_by_key(|g| g.symbol());
                current.sort_by_key(|g| g.symbol());
                debug_assert_eq!(target, current, "permutation is not a rearrangement");
                debug_assert!(!p.scramble().is_empty(), "permutation was never scrambled");
                debug_assert!(!p.is_solved(), "permutation starts solved");
            }
            PuzzleInstance::GridMerge(p) => {
                debug_assert!(
                    p.grid()
                        .cells()
                        .iter()
                        .flatten()
                        .all(|&v| v == 0 || (v >= 2 && v.is_power_of_two())),
                    "grid holds a non-tile value"
                );
                debug_assert!(p.grid().tile_count() > 0, "grid dealt without tiles");
            }
            PuzzleInstance::Narrative(p) => {
                debug_assert!(!p.lines().is_empty(), "narrative without lines");
            }
        }
    }
}

/// What a single phase will present once it is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PhaseChallenge {
    Sequence,
    Permutation,
    GridMerge { target: GridTarget },
    Narrative { prompt: NarrativePrompt },
}

impl PhaseChallenge {
    /// Challenge used when `kind` gates a single-phase trial.
    #[must_use]
    pub const fn single(kind: PuzzleKind) -> Self {
        match kind {
            PuzzleKind::Sequence => PhaseChallenge::Sequence,
            PuzzleKind::Permutation => PhaseChallenge::Permutation,
            PuzzleKind::GridMerge => PhaseChallenge::GridMerge {
                target: GridTarget::Standard,
            },
            PuzzleKind::Narrative => PhaseChallenge::Narrative {
                prompt: NarrativePrompt::FinalResolve,
            },
        }
    }

    #[must_use]
    pub const fn kind(self) -> PuzzleKind {
        match self {
            PhaseChallenge::Sequence => PuzzleKind::Sequence,
            PhaseChallenge::Permutation => PuzzleKind::Permutation,
            PhaseChallenge::GridMerge { .. } => PuzzleKind::GridMerge,
            PhaseChallenge::Narrative { .. } => PuzzleKind::Narrative,
        }
    }

    /// Delegate to the single-variant generator.
    pub fn generate<R: RandomSource + ?Sized>(
        self,
        mastery: MasteryScalar,
        rng: &mut R,
    ) -> PuzzleInstance {
        let instance = match self {
            PhaseChallenge::Sequence => {
                PuzzleInstance::Sequence(SequencePuzzle::generate(mastery, rng))
            }
            PhaseChallenge::Permutation => {
                PuzzleInstance::Permutation(PermutationPuzzle::generate(mastery, rng))
            }
            PhaseChallenge::GridMerge { target } => {
                PuzzleInstance::GridMerge(GridMergePuzzle::generate(target, mastery, rng))
            }
            PhaseChallenge::Narrative { prompt } => {
                PuzzleInstance::Narrative(NarrativePuzzle::new(prompt, mastery))
            }
        };
        instance.debug_validate();
        tracing::debug!(
            kind = %instance.kind(),
            difficulty = ?instance.difficulty(),
            max_attempts = instance.max_attempts(),
            "puzzle generated"
        );
        instance
    }
}
