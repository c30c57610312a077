//! Phase plans, including the five-phase gate of the final realm.
//!
//! A plan records what each phase will be without generating anything, so
//! the orchestrator can produce each instance only when its phase begins.

use breakthrough_types::{Challenge, MasteryScalar, PuzzleKind, RandomSource, TrialTier};

use crate::grid::GridTarget;
use crate::narrative::NarrativePrompt;
use crate::puzzle::{PhaseChallenge, PuzzleInstance};

/// Composite phases are generated harder than their single-trial versions.
pub const COMPOSITE_MASTERY_FACTOR: f64 = 1.5;

const COMPOSITE_PHASES: [PhaseChallenge; 5] = [
    PhaseChallenge::Narrative {
        prompt: NarrativePrompt::HeartDemon,
    },
    PhaseChallenge::Sequence,
    PhaseChallenge::GridMerge {
        target: GridTarget::Grand,
    },
    PhaseChallenge::Permutation,
    PhaseChallenge::Narrative {
        prompt: NarrativePrompt::FinalResolve,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpec {
    challenge: PhaseChallenge,
    mastery: MasteryScalar,
}

impl PhaseSpec {
    #[must_use]
    pub const fn new(challenge: PhaseChallenge, mastery: MasteryScalar) -> Self {
        Self { challenge, mastery }
    }

    #[must_use]
    pub const fn challenge(&self) -> PhaseChallenge {
        self.challenge
    }

    #[must_use]
    pub const fn kind(&self) -> PuzzleKind {
        self.challenge.kind()
    }

    #[must_use]
    pub const fn mastery(&self) -> MasteryScalar {
        self.mastery
    }

    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> PuzzleInstance {
        self.challenge.generate(self.mastery, rng)
    }
}

/// Ordered, non-empty list of phases.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialPlan {
    phases: Vec<PhaseSpec>,
}

impl TrialPlan {
    #[must_use]
    pub fn single(kind: PuzzleKind, mastery: MasteryScalar) -> Self {
        Self {
            phases: vec![PhaseSpec::new(PhaseChallenge::single(kind), mastery)],
        }
    }

    #[must_use]
    pub fn composite(mastery: MasteryScalar) -> Self {
        CompositeGenerator::plan(mastery)
    }

    /// The gate guarding `tier`, or `None` when the tier rolls directly.
    #[must_use]
    pub fn for_tier(tier: TrialTier, mastery: MasteryScalar) -> Option<Self> {
        match tier.challenge()? {
            Challenge::Single(kind) => Some(Self::single(kind, mastery)),
            Challenge::Composite => Some(Self::composite(mastery)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    #[must_use]
    pub fn phases(&self) -> &[PhaseSpec] {
        &self.phases
    }

    #[must_use]
    pub fn phase(&self, index: usize) -> Option<&PhaseSpec> {
        self.phases.get(index)
    }

    /// Generate the instance for phase `index`.
    pub fn generate_phase<R: RandomSource + ?Sized>(
        &self,
        index: usize,
        rng: &mut R,
    ) -> Option<PuzzleInstance> {
        self.phases.get(index).map(|spec| spec.generate(rng))
    }
}

/// Aggregates the single-variant generators; holds no puzzle logic itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeGenerator;

impl CompositeGenerator {
    pub const PHASES: usize = COMPOSITE_PHASES.len();

    #[must_use]
    pub fn plan(mastery: MasteryScalar) -> TrialPlan {
        let scaled = mastery.scaled(COMPOSITE_MASTERY_FACTOR);
        TrialPlan {
            phases: COMPOSITE_PHASES
                .iter()
                .map(|&challenge| PhaseSpec::new(challenge, scaled))
                .collect(),
        }
    }

    /// Generate all five phases up front.
    pub fn generate<R: RandomSource + ?Sized>(
        mastery: MasteryScalar,
        rng: &mut R,
    ) -> Vec<PuzzleInstance> {
        let plan = Self::plan(mastery);
        (0..plan.len())
            .filter_map(|index| plan.generate_phase(index, rng))
            .collect()
    }
}
