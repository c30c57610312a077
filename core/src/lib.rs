//! Trial logic for breakthrough attempts.
//!
//! Pure, synchronous building blocks: the risk model, the puzzle generators,
//! the grid-merge simulator, outcome rolls, and narrative tables. Everything
//! random draws from an injected [`RandomSource`](breakthrough_types::RandomSource).

mod composite;
mod errors;
pub mod grid;
pub mod narrative;
mod outcome;
pub mod permutation;
mod puzzle;
pub mod risk;
mod rng;
pub mod sequence;

pub use composite::{COMPOSITE_MASTERY_FACTOR, CompositeGenerator, PhaseSpec, TrialPlan};
pub use errors::PuzzleError;
pub use grid::{GridMergePuzzle, GridState, GridTarget, MoveOutcome, SlideResult, merge_line};
pub use narrative::{NarrativePrompt, NarrativePuzzle, ProbabilityBand};
pub use outcome::{forced_failure, hp_loss_on_success, outcome_for_roll, roll_outcome};
pub use permutation::{PermutationPuzzle, Selection};
pub use puzzle::{PhaseChallenge, PuzzleInstance};
pub use risk::{compute_risk_profile, profile_for};
pub use rng::SeededRng;
pub use sequence::{SequencePuzzle, SequenceRule};
