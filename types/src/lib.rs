//! Core domain types for the breakthrough trial engine.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod glyph;
mod input;
mod outcome;
mod proofs;
mod random;
mod risk;
mod stats;
mod tier;

pub use glyph::Glyph;
pub use input::{Direction, Gesture};
pub use outcome::{ResolutionCause, TrialResult, TrialStatus};
pub use proofs::NonEmptyStaticStr;
pub use random::RandomSource;
pub use risk::{RiskInputs, RiskProfile};
pub use stats::{CombatStats, MasteryScalar};
pub use tier::{Challenge, DifficultyTier, PuzzleKind, TierParseError, TrialTier};
