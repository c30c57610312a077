//! Trial orchestrator lifecycle through the public API.

use std::time::Duration;

use proptest::prelude::*;

use breakthrough_core::PuzzleInstance;
use breakthrough_engine::{
    ActionOutcome, AnimationStage, OrchestratorSettings, PlayerAction, TrialError, TrialEvent,
    TrialOrchestrator,
};
use breakthrough_types::{PuzzleKind, ResolutionCause, TrialStatus, TrialTier};

use crate::common::{Completions, FixedUnit, request};

const LONG: Duration = Duration::from_secs(30);

fn seeded(seed: u64) -> TrialOrchestrator {
    TrialOrchestrator::seeded(OrchestratorSettings::default(), seed)
}

fn wrong_answer(orchestrator: &TrialOrchestrator) -> i64 {
    match orchestrator.current_puzzle() {
        Some(PuzzleInstance::Sequence(p)) => p.solution() + 1,
        other => panic!("expected a sequence puzzle, got {other:?}"),
    }
}

proptest! {
    #[test]
    fn exhausting_attempts_always_forces_failure(seed in any::<u64>(), mastery in 0.0f64..60.0) {
        let mut orchestrator = seeded(seed);
        let completions = Completions::default();
        orchestrator
            .open(request(TrialTier::FoundationEstablishment, mastery), completions.handler())
            .unwrap();
        let max = orchestrator.max_attempts().unwrap();

        let mut failures = 0;
        loop {
            let answer = wrong_answer(&orchestrator);
            match orchestrator.act(PlayerAction::Answer(answer)).unwrap() {
                ActionOutcome::AttemptFailed { attempts_used, max_attempts } => {
                    failures += 1;
                    prop_assert_eq!(attempts_used, failures);
                    prop_assert_eq!(max_attempts, max);
                }
                ActionOutcome::ForcedFailure => break,
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }

        prop_assert_eq!(failures + 1, max);
        prop_assert_eq!(orchestrator.status(), TrialStatus::Resolved);
        let results = completions.results();
        prop_assert_eq!(results.len(), 1);
        prop_assert_eq!(results[0].roll(), None);
        prop_assert_eq!(
            results[0].cause(),
            ResolutionCause::PuzzleExhausted { kind: PuzzleKind::Sequence }
        );
    }

    #[test]
    fn composite_generates_one_phase_at_a_time(seed in any::<u64>()) {
        let mut orchestrator = seeded(seed);
        orchestrator
            .open(request(TrialTier::ImmortalAscension, 10.0), |_| {})
            .unwrap();
        prop_assert_eq!(orchestrator.phase_count(), 5);
        prop_assert_eq!(orchestrator.puzzles_generated(), 1);
        prop_assert_eq!(
            orchestrator.current_puzzle().map(PuzzleInstance::kind),
            Some(PuzzleKind::Narrative)
        );

        orchestrator.act(PlayerAction::Acknowledge).unwrap();
        prop_assert_eq!(orchestrator.puzzles_generated(), 2);
        prop_assert!(orchestrator.puzzles_generated() <= orchestrator.phase_index() + 1);
    }

    #[test]
    fn same_seed_replays_the_same_trial(seed in any::<u64>()) {
        let run = |seed| {
            let mut orchestrator = seeded(seed);
            orchestrator.open(request(TrialTier::SpiritSevering, 0.0), |_| {}).unwrap();
            orchestrator.advance(LONG);
            orchestrator.result().cloned()
        };
        prop_assert_eq!(run(seed), run(seed));
    }
}

#[test]
fn animation_runs_every_stage_then_resolves_once() {
    let mut orchestrator = TrialOrchestrator::new(OrchestratorSettings::default(), FixedUnit(0.999));
    let completions = Completions::default();
    orchestrator
        .open(request(TrialTier::QiCondensation, 0.0), completions.handler())
        .unwrap();

    let mut events = Vec::new();
    for _ in 0..100 {
        events.extend(orchestrator.advance(Duration::from_millis(100)));
    }

    let (stages, rest): (Vec<_>, Vec<_>) = events
        .into_iter()
        .partition(|event| matches!(event, TrialEvent::StageEntered(_)));
    assert_eq!(
        stages,
        AnimationStage::ALL
            .iter()
            .map(|&stage| TrialEvent::StageEntered(stage))
            .collect::<Vec<_>>()
    );
    assert!(matches!(rest.as_slice(), [TrialEvent::Resolved(result)] if result.success()));
    assert_eq!(completions.results().len(), 1);
}

#[test]
fn nothing_resolves_before_the_animation_ends() {
    let settings = OrchestratorSettings::default();
    let mut orchestrator = TrialOrchestrator::new(settings, FixedUnit(0.999));
    orchestrator
        .open(request(TrialTier::QiCondensation, 0.0), |_| {})
        .unwrap();

    orchestrator.advance(settings.total_animation() - Duration::from_millis(1));
    assert_eq!(orchestrator.status(), TrialStatus::AnimationPhase { stage: 4 });
    orchestrator.advance(Duration::from_millis(1));
    assert_eq!(orchestrator.status(), TrialStatus::Resolved);
}

#[test]
fn close_mid_animation_then_reopen() {
    let mut orchestrator = seeded(9);
    let first = Completions::default();
    orchestrator
        .open(request(TrialTier::QiCondensation, 0.0), first.handler())
        .unwrap();
    orchestrator.advance(Duration::from_millis(2000));
    orchestrator.close();

    let second = Completions::default();
    orchestrator
        .open(request(TrialTier::SpiritSevering, 0.0), second.handler())
        .unwrap();
    let events = orchestrator.advance(LONG);

    assert!(first.results().is_empty());
    assert_eq!(second.results().len(), 1);
    assert_eq!(second.results()[0].tier(), TrialTier::SpiritSevering);
    let stage_events = events
        .iter()
        .filter(|event| matches!(event, TrialEvent::StageEntered(_)))
        .count();
    assert_eq!(stage_events, AnimationStage::ALL.len());
}

#[test]
fn giving_up_every_board_exhausts_the_grid() {
    let mut orchestrator = seeded(4);
    let completions = Completions::default();
    orchestrator
        .open(request(TrialTier::NascentSoul, 0.0), completions.handler())
        .unwrap();
    let max = orchestrator.max_attempts().unwrap();

    for used in 1..max {
        assert_eq!(
            orchestrator.act(PlayerAction::Submit),
            Ok(ActionOutcome::AttemptFailed {
                attempts_used: used,
                max_attempts: max
            })
        );
    }
    assert_eq!(
        orchestrator.act(PlayerAction::Submit),
        Ok(ActionOutcome::ForcedFailure)
    );
    assert_eq!(
        completions.results()[0].cause(),
        ResolutionCause::PuzzleExhausted {
            kind: PuzzleKind::GridMerge
        }
    );
    assert_eq!(
        orchestrator.act(PlayerAction::Submit),
        Err(TrialError::NotAcceptingInput {
            status: TrialStatus::Resolved
        })
    );
}

#[test]
fn reduced_motion_still_reports_every_stage() {
    let mut orchestrator =
        TrialOrchestrator::new(OrchestratorSettings::default().reduced_motion(), FixedUnit(0.0));
    orchestrator
        .open(request(TrialTier::CoreFormation, 0.0), |_| {})
        .unwrap();
    // The fixed source scrambles with a single (0, 1) swap.
    assert_eq!(
        orchestrator.act(PlayerAction::Swap(0, 1)),
        Ok(ActionOutcome::ChallengeCleared)
    );

    let events = orchestrator.advance(Duration::ZERO);
    assert_eq!(events.len(), AnimationStage::ALL.len() + 1);
    let result = orchestrator.result().unwrap();
    assert!(!result.success());
    assert_eq!(result.roll(), Some(0.0));
}
