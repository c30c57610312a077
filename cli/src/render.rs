//! Plain-text rendering of trial state for the terminal runner.

use breakthrough_core::PuzzleInstance;
use breakthrough_engine::{ActionOutcome, Readiness, TrialEvent};
use breakthrough_types::{Glyph, RiskProfile, TrialResult, TrialTier};

fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

#[must_use]
pub fn risk(tier: TrialTier, profile: &RiskProfile) -> String {
    format!(
        "{tier}: {} chance of failure (stats -{}, gear -{})",
        percent(profile.failure_probability()),
        percent(profile.attribute_bonus()),
        percent(profile.equipment_bonus()),
    )
}

/// The puzzle as it should appear before the next prompt.
#[must_use]
pub fn puzzle(puzzle: &PuzzleInstance, attempts_used: u32) -> String {
    let max = puzzle.max_attempts();
    let left = max.saturating_sub(attempts_used);
    let mut out = String::from(puzzle.prompt());

    match puzzle {
        PuzzleInstance::Sequence(p) => {
            let terms: Vec<String> = p.revealed().iter().map(ToString::to_string).collect();
            out.push_str(&format!("\n  {}, ?", terms.join(", ")));
            out.push_str(&format!("\n  attempts left: {left} of {max}"));
        }
        PuzzleInstance::Permutation(p) => {
            let row = |glyphs: &[Glyph]| {
                glyphs
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            let positions: Vec<String> = (1..=p.len()).map(|n| n.to_string()).collect();
            out.push_str(&format!("\n  target:  {}", row(p.target())));
            out.push_str(&format!("\n  current: {}", row(p.current())));
            out.push_str(&format!("\n           {}", positions.join(" ")));
            if let Some(selected) = p.selection() {
                out.push_str(&format!("\n  selected: {}", selected + 1));
            }
            out.push_str(&format!("\n  swaps left: {left} of {max}"));
        }
        PuzzleInstance::GridMerge(p) => {
            out.push('\n');
            out.push_str(&p.grid().to_string());
            out.push_str(&format!(
                "\n  score {} / {}, boards left: {left} of {max}",
                p.grid().score(),
                p.target_score()
            ));
        }
        PuzzleInstance::Narrative(p) => {
            for line in p.lines() {
                out.push_str(&format!("\n  {line}"));
            }
            out.push_str("\n  (press enter)");
        }
    }
    out
}

/// Feedback for an action. `None` when there is nothing worth saying.
#[must_use]
pub fn outcome(outcome: ActionOutcome) -> Option<String> {
    match outcome {
        ActionOutcome::Updated | ActionOutcome::ForcedFailure => None,
        ActionOutcome::NoOp => Some("Nothing moves.".to_string()),
        ActionOutcome::AttemptFailed {
            attempts_used,
            max_attempts,
        } => Some(format!(
            "Not quite. {} of {max_attempts} attempts left.",
            max_attempts.saturating_sub(attempts_used)
        )),
        ActionOutcome::PhaseCleared { next_phase } => {
            Some(format!("Phase cleared. Phase {} begins.", next_phase + 1))
        }
        ActionOutcome::ChallengeCleared => {
            Some("The gate yields. The tribulation begins.".to_string())
        }
    }
}

#[must_use]
pub fn event(event: &TrialEvent) -> String {
    match event {
        TrialEvent::StageEntered(stage) => format!("~ {stage} ~"),
        TrialEvent::BoardCollapsed {
            attempts_used,
            max_attempts,
        } => format!("The board seizes up. Board {attempts_used} of {max_attempts} lost."),
        TrialEvent::Resolved(outcome) => result(outcome),
    }
}

#[must_use]
pub fn result(result: &TrialResult) -> String {
    let tier = result.tier();
    let narrative = result.narrative_outcome();
    match result.roll() {
        _ if result.success() => format!(
            "ASCENDED to {tier}. Lost {} HP.\n{narrative}",
            result.hp_loss_amount()
        ),
        Some(roll) => format!(
            "FAILED to reach {tier} (rolled {roll:.2} under {:.2}).\n{narrative}",
            result.failure_probability()
        ),
        None => format!("FAILED to reach {tier}. The gate held.\n{narrative}"),
    }
}

#[must_use]
pub fn readiness(readiness: &Readiness) -> String {
    match readiness {
        Readiness::NotReady => "Your cultivation has not yet peaked.".to_string(),
        Readiness::AtPeak => "There is no realm above yours.".to_string(),
        Readiness::Blocked { target, missing } => {
            let mut out = format!("A breakthrough to {target} needs:");
            for item in missing {
                out.push_str(&format!("\n  - {item}"));
            }
            out
        }
        Readiness::Ready { target } => {
            format!("Your cultivation has peaked. Attempt a breakthrough to {target}? [y/N]")
        }
    }
}
