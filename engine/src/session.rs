//! One open trial and its transitions.

use std::fmt;

use breakthrough_core::{
    PuzzleInstance, Selection, TrialPlan, forced_failure, roll_outcome,
};
use breakthrough_types::{PuzzleKind, RandomSource, RiskProfile, TrialResult, TrialStatus, TrialTier};

use crate::error::TrialError;
use crate::input::{ActionOutcome, PlayerAction, TrialEvent};
use crate::settings::OrchestratorSettings;
use crate::stages::AnimationStage;
use crate::timers::{Continuation, TimerQueue};

pub(crate) type CompletionHandler = Box<dyn FnOnce(TrialResult) + Send>;

/// Orchestrator resources a transition may touch, borrowed alongside the
/// session.
pub(crate) struct Env<'a> {
    pub(crate) rng: &'a mut dyn RandomSource,
    pub(crate) timers: &'a mut TimerQueue,
    pub(crate) settings: &'a OrchestratorSettings,
    pub(crate) events: &'a mut Vec<TrialEvent>,
}

#[derive(Debug)]
pub(crate) enum SessionState {
    Puzzle(PuzzleInstance),
    Animation(AnimationStage),
    Resolved(TrialResult),
}

/// What a single action did to the puzzle, before bookkeeping.
enum Step {
    Solved,
    Failed,
    /// Grid submission below target; the board has been dealt again.
    Forfeited,
    /// Grid changed without reaching the target.
    Moved,
    Changed,
    Unchanged,
}

pub(crate) struct TrialSession {
    epoch: u64,
    tier: TrialTier,
    risk: RiskProfile,
    plan: Option<TrialPlan>,
    phase_index: usize,
    attempts_used: u32,
    puzzles_generated: usize,
    board_moves: u64,
    state: SessionState,
    on_complete: Option<CompletionHandler>,
}

impl fmt::Debug for TrialSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrialSession")
            .field("epoch", &self.epoch)
            .field("tier", &self.tier)
            .field("phase_index", &self.phase_index)
            .field("attempts_used", &self.attempts_used)
            .field("puzzles_generated", &self.puzzles_generated)
            .field("state", &self.state)
            .field("on_complete", &self.on_complete.as_ref().map(|_| "<handler>"))
            .finish_non_exhaustive()
    }
}

impl TrialSession {
    /// Enter the first puzzle phase, or go straight to the animation when
    /// the tier has no gate.
    pub(crate) fn open(
        epoch: u64,
        tier: TrialTier,
        risk: RiskProfile,
        plan: Option<TrialPlan>,
        on_complete: CompletionHandler,
        env: &mut Env<'_>,
    ) -> Self {
        let first = plan
            .as_ref()
            .and_then(|plan| plan.generate_phase(0, &mut *env.rng));
        let puzzles_generated = usize::from(first.is_some());
        let state = match first {
            Some(puzzle) => SessionState::Puzzle(puzzle),
            None => Self::start_animation(epoch, env),
        };

        Self {
            epoch,
            tier,
            risk,
            plan,
            phase_index: 0,
            attempts_used: 0,
            puzzles_generated,
            board_moves: 0,
            state,
            on_complete: Some(on_complete),
        }
    }

    pub(crate) const fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) const fn tier(&self) -> TrialTier {
        self.tier
    }

    pub(crate) const fn risk(&self) -> &RiskProfile {
        &self.risk
    }

    pub(crate) const fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub(crate) fn phase_count(&self) -> usize {
        self.plan.as_ref().map_or(0, TrialPlan::len)
    }

    pub(crate) const fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    pub(crate) const fn puzzles_generated(&self) -> usize {
        self.puzzles_generated
    }

    pub(crate) const fn state(&self) -> &SessionState {
        &self.state
    }

    pub(crate) const fn status(&self) -> TrialStatus {
        match &self.state {
            SessionState::Puzzle(_) => TrialStatus::PuzzlePhase {
                phase: self.phase_index,
            },
            SessionState::Animation(stage) => TrialStatus::AnimationPhase {
                stage: stage.index(),
            },
            SessionState::Resolved(_) => TrialStatus::Resolved,
        }
    }

    pub(crate) fn act(
        &mut self,
        action: PlayerAction,
        env: &mut Env<'_>,
    ) -> Result<ActionOutcome, TrialError> {
        let status = self.status();
        let SessionState::Puzzle(puzzle) = &mut self.state else {
            return Err(TrialError::NotAcceptingInput { status });
        };
        let kind = puzzle.kind();
        let max_attempts = puzzle.max_attempts();

        let step = match (puzzle, action) {
            (PuzzleInstance::Sequence(p), PlayerAction::Answer(answer)) => {
                if p.is_correct(answer) {
                    Step::Solved
                } else {
                    Step::Failed
                }
            }
            (PuzzleInstance::Permutation(p), PlayerAction::Select(position)) => {
                match p.select(position)? {
                    Selection::Marked(_) | Selection::Cleared => Step::Changed,
                    Selection::Swapped(..) if p.is_solved() => Step::Solved,
                    Selection::Swapped(..) => Step::Failed,
                }
            }
            (PuzzleInstance::Permutation(p), PlayerAction::Swap(a, b)) => {
                if !p.swap(a, b)? {
                    Step::Unchanged
                } else if p.is_solved() {
                    Step::Solved
                } else {
                    Step::Failed
                }
            }
            (PuzzleInstance::Permutation(p), PlayerAction::Submit) => {
                if p.is_solved() {
                    Step::Solved
                } else {
                    Step::Failed
                }
            }
            (PuzzleInstance::GridMerge(p), PlayerAction::Move(direction)) => {
                let outcome = p.apply_move(direction, &mut *env.rng);
                if !outcome.moved {
                    Step::Unchanged
                } else if p.is_complete() {
                    Step::Solved
                } else {
                    Step::Moved
                }
            }
            (PuzzleInstance::GridMerge(p), PlayerAction::Swipe(gesture)) => {
                match gesture.direction() {
                    Some(direction) => {
                        let outcome = p.apply_move(direction, &mut *env.rng);
                        if !outcome.moved {
                            Step::Unchanged
                        } else if p.is_complete() {
                            Step::Solved
                        } else {
                            Step::Moved
                        }
                    }
                    None => Step::Unchanged,
                }
            }
            (PuzzleInstance::GridMerge(p), PlayerAction::Submit) => {
                if p.is_complete() {
                    Step::Solved
                } else {
                    p.reset(&mut *env.rng);
                    Step::Forfeited
                }
            }
            (PuzzleInstance::Narrative(_), PlayerAction::Acknowledge | PlayerAction::Submit) => {
                Step::Solved
            }
            (_, action) => {
                return Err(TrialError::ActionMismatch {
                    action: action.name(),
                    kind,
                });
            }
        };

        Ok(match step {
            Step::Solved => self.clear_phase(env),
            Step::Failed => self.record_failure(kind, max_attempts, env),
            Step::Forfeited => {
                self.supersede_board(env);
                self.record_failure(kind, max_attempts, env)
            }
            Step::Moved => {
                self.board_moves += 1;
                env.timers.schedule(
                    self.epoch,
                    env.settings.game_over_check_delay(),
                    Continuation::GameOverCheck {
                        phase: self.phase_index,
                        board_moves: self.board_moves,
                    },
                );
                ActionOutcome::Updated
            }
            Step::Changed => ActionOutcome::Updated,
            Step::Unchanged => ActionOutcome::NoOp,
        })
    }

    /// Apply a continuation that is known to belong to this session.
    pub(crate) fn fire(&mut self, continuation: Continuation, env: &mut Env<'_>) {
        match continuation {
            Continuation::StageElapsed { stage } => self.stage_elapsed(stage, env),
            Continuation::GameOverCheck { phase, board_moves } => {
                self.check_game_over(phase, board_moves, env);
            }
        }
    }

    fn stage_elapsed(&mut self, stage: AnimationStage, env: &mut Env<'_>) {
        if !matches!(self.state, SessionState::Animation(current) if current == stage) {
            tracing::debug!(stage = %stage, "stage timer no longer current");
            return;
        }
        match stage.next() {
            Some(next) => {
                tracing::debug!(stage = %next, "animation stage entered");
                self.state = SessionState::Animation(next);
                env.events.push(TrialEvent::StageEntered(next));
                env.timers.schedule(
                    self.epoch,
                    env.settings.stage_delay(next),
                    Continuation::StageElapsed { stage: next },
                );
            }
            None => {
                let result = roll_outcome(self.tier, &self.risk, &mut *env.rng);
                self.resolve(result, env);
            }
        }
    }

    fn check_game_over(&mut self, phase: usize, board_moves: u64, env: &mut Env<'_>) {
        if phase != self.phase_index || board_moves != self.board_moves {
            tracing::debug!(phase, board_moves, "game-over check superseded");
            return;
        }
        let SessionState::Puzzle(PuzzleInstance::GridMerge(grid)) = &mut self.state else {
            return;
        };
        if !grid.grid().is_game_over() {
            return;
        }

        let max_attempts = grid.max_attempts();
        let attempts_used = self.attempts_used + 1;
        env.events.push(TrialEvent::BoardCollapsed {
            attempts_used,
            max_attempts,
        });
        if attempts_used < max_attempts {
            grid.reset(&mut *env.rng);
            self.supersede_board(env);
        }
        self.record_failure(PuzzleKind::GridMerge, max_attempts, env);
    }

    /// Invalidate outstanding game-over checks for the current board.
    fn supersede_board(&mut self, env: &mut Env<'_>) {
        self.board_moves += 1;
        env.timers.cancel_game_over_checks();
    }

    fn record_failure(
        &mut self,
        kind: PuzzleKind,
        max_attempts: u32,
        env: &mut Env<'_>,
    ) -> ActionOutcome {
        self.attempts_used += 1;
        tracing::debug!(
            kind = %kind,
            attempts_used = self.attempts_used,
            max_attempts,
            "failed attempt recorded"
        );
        if self.attempts_used < max_attempts {
            return ActionOutcome::AttemptFailed {
                attempts_used: self.attempts_used,
                max_attempts,
            };
        }
        let result = forced_failure(self.tier, &self.risk, kind);
        self.resolve(result, env);
        ActionOutcome::ForcedFailure
    }

    fn clear_phase(&mut self, env: &mut Env<'_>) -> ActionOutcome {
        tracing::debug!(phase = self.phase_index, "phase cleared");
        self.phase_index += 1;
        self.attempts_used = 0;
        env.timers.cancel_game_over_checks();

        let next = self
            .plan
            .as_ref()
            .and_then(|plan| plan.generate_phase(self.phase_index, &mut *env.rng));
        match next {
            Some(puzzle) => {
                self.puzzles_generated += 1;
                self.state = SessionState::Puzzle(puzzle);
                ActionOutcome::PhaseCleared {
                    next_phase: self.phase_index,
                }
            }
            None => {
                self.state = Self::start_animation(self.epoch, env);
                ActionOutcome::ChallengeCleared
            }
        }
    }

    fn start_animation(epoch: u64, env: &mut Env<'_>) -> SessionState {
        let first = AnimationStage::first();
        tracing::debug!(stage = %first, "animation stage entered");
        env.events.push(TrialEvent::StageEntered(first));
        env.timers.schedule(
            epoch,
            env.settings.stage_delay(first),
            Continuation::StageElapsed { stage: first },
        );
        SessionState::Animation(first)
    }

    fn resolve(&mut self, result: TrialResult, env: &mut Env<'_>) {
        tracing::info!(
            tier = %self.tier,
            success = result.success(),
            failure_probability = result.failure_probability(),
            roll = ?result.roll(),
            forced = result.is_forced_failure(),
            "trial resolved"
        );
        env.timers.cancel_game_over_checks();
        self.state = SessionState::Resolved(result.clone());
        env.events.push(TrialEvent::Resolved(result.clone()));
        if let Some(handler) = self.on_complete.take() {
            handler(result);
        }
    }

    #[cfg(test)]
    pub(crate) fn replace_puzzle(&mut self, puzzle: PuzzleInstance) {
        self.state = SessionState::Puzzle(puzzle);
    }

    #[cfg(test)]
    pub(crate) const fn board_moves(&self) -> u64 {
        self.board_moves
    }
}
