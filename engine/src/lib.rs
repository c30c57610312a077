//! Trial orchestration for breakthrough attempts.
//!
//! [`TrialOrchestrator`] owns at most one open trial and walks it through
//! `Idle -> PuzzlePhase(n) -> AnimationPhase -> Resolved`:
//!
//! - `open` snapshots the risk profile and enters the first puzzle phase, or
//!   the animation when the tier has no gate.
//! - `act` feeds player input to the current puzzle. Exhausting attempts
//!   resolves the trial immediately as a forced failure.
//! - `advance` moves the virtual clock. Animation stages and deferred grid
//!   checks run as scheduled continuations, each tagged with the epoch of the
//!   trial that scheduled it.
//! - `close` bumps the epoch, purges every continuation, and drops the trial
//!   (including an uncalled completion handler).
//!
//! Everything is single-threaded and synchronous. The host supplies time.

use std::fmt;
use std::mem;
use std::time::Duration;

use breakthrough_core::{PuzzleInstance, SeededRng, TrialPlan, profile_for};
use breakthrough_types::{
    MasteryScalar, RandomSource, RiskInputs, RiskProfile, TrialResult, TrialStatus, TrialTier,
};

mod error;
mod input;
mod session;
mod settings;
mod stages;
mod timers;
pub mod watcher;

pub use error::TrialError;
pub use input::{ActionOutcome, PlayerAction, TrialEvent};
pub use settings::OrchestratorSettings;
pub use stages::AnimationStage;
pub use watcher::{CharacterProgress, Consent, Prerequisite, Readiness, UnlockLedger};

use session::{Env, SessionState, TrialSession};
use timers::TimerQueue;

/// Everything `open` needs to start a trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialRequest {
    pub risk: RiskInputs,
    /// Scales puzzle difficulty.
    pub mastery: MasteryScalar,
}

pub struct TrialOrchestrator {
    settings: OrchestratorSettings,
    rng: Box<dyn RandomSource + Send>,
    /// Bumped on every open and close. Continuations from older epochs are
    /// discarded.
    epoch: u64,
    timers: TimerQueue,
    events: Vec<TrialEvent>,
    session: Option<TrialSession>,
}

impl fmt::Debug for TrialOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrialOrchestrator")
            .field("settings", &self.settings)
            .field("epoch", &self.epoch)
            .field("timers", &self.timers)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl TrialOrchestrator {
    pub fn new(settings: OrchestratorSettings, rng: impl RandomSource + Send + 'static) -> Self {
        Self {
            settings,
            rng: Box::new(rng),
            epoch: 0,
            timers: TimerQueue::default(),
            events: Vec::new(),
            session: None,
        }
    }

    #[must_use]
    pub fn seeded(settings: OrchestratorSettings, seed: u64) -> Self {
        Self::new(settings, SeededRng::new(seed))
    }

    /// Start a trial. Only valid while idle; a resolved trial must be closed
    /// first.
    ///
    /// `on_complete` runs exactly once, when the trial resolves. It is
    /// dropped without being called if the trial is closed earlier.
    pub fn open<F>(&mut self, request: TrialRequest, on_complete: F) -> Result<TrialStatus, TrialError>
    where
        F: FnOnce(TrialResult) + Send + 'static,
    {
        if self.session.is_some() {
            return Err(TrialError::AlreadyOpen);
        }
        self.epoch += 1;

        let tier = request.risk.target_tier;
        let risk = profile_for(&request.risk);
        let plan = TrialPlan::for_tier(tier, request.mastery);

        tracing::info!(
            tier = %tier,
            failure_probability = risk.failure_probability(),
            attribute_bonus = risk.attribute_bonus(),
            equipment_bonus = risk.equipment_bonus(),
            phases = plan.as_ref().map_or(0, TrialPlan::len),
            epoch = self.epoch,
            "trial opened"
        );

        let Self {
            settings,
            rng,
            timers,
            events,
            epoch,
            ..
        } = self;
        let mut env = Env {
            rng: &mut **rng,
            timers,
            settings,
            events,
        };
        let session = TrialSession::open(*epoch, tier, risk, plan, Box::new(on_complete), &mut env);
        let status = session.status();
        self.session = Some(session);
        Ok(status)
    }

    /// Apply one player action to the current puzzle phase.
    pub fn act(&mut self, action: PlayerAction) -> Result<ActionOutcome, TrialError> {
        let Self {
            settings,
            rng,
            timers,
            events,
            session,
            ..
        } = self;
        let session = session.as_mut().ok_or(TrialError::NotOpen)?;
        let mut env = Env {
            rng: &mut **rng,
            timers,
            settings,
            events,
        };
        session.act(action, &mut env)
    }

    /// Move the clock forward by `elapsed`, running every continuation that
    /// falls due, and return what happened since the last call.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TrialEvent> {
        let deadline = self.timers.now().saturating_add(elapsed);
        while let Some(entry) = self.timers.pop_due(deadline) {
            let Self {
                settings,
                rng,
                timers,
                events,
                session,
                epoch,
            } = self;
            let live = session
                .as_mut()
                .filter(|session| entry.epoch == *epoch && session.epoch() == entry.epoch);
            let Some(session) = live else {
                tracing::debug!(
                    scheduled_epoch = entry.epoch,
                    current_epoch = *epoch,
                    "stale continuation discarded"
                );
                continue;
            };
            let mut env = Env {
                rng: &mut **rng,
                timers,
                settings,
                events,
            };
            session.fire(entry.continuation, &mut env);
        }
        self.timers.settle(deadline);
        mem::take(&mut self.events)
    }

    /// Drop the open trial, if any, and cancel everything it scheduled.
    /// Safe from any state.
    pub fn close(&mut self) {
        self.epoch += 1;
        self.timers.purge();
        self.events.clear();
        if let Some(session) = self.session.take() {
            tracing::info!(
                tier = %session.tier(),
                status = %session.status(),
                epoch = session.epoch(),
                "trial closed"
            );
        }
    }

    #[must_use]
    pub fn status(&self) -> TrialStatus {
        self.session
            .as_ref()
            .map_or(TrialStatus::Idle, TrialSession::status)
    }

    #[must_use]
    pub fn tier(&self) -> Option<TrialTier> {
        self.session.as_ref().map(TrialSession::tier)
    }

    #[must_use]
    pub fn risk_profile(&self) -> Option<&RiskProfile> {
        self.session.as_ref().map(TrialSession::risk)
    }

    #[must_use]
    pub fn current_puzzle(&self) -> Option<&PuzzleInstance> {
        match self.session.as_ref()?.state() {
            SessionState::Puzzle(puzzle) => Some(puzzle),
            SessionState::Animation(_) | SessionState::Resolved(_) => None,
        }
    }

    #[must_use]
    pub fn current_stage(&self) -> Option<AnimationStage> {
        match self.session.as_ref()?.state() {
            SessionState::Animation(stage) => Some(*stage),
            SessionState::Puzzle(_) | SessionState::Resolved(_) => None,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&TrialResult> {
        match self.session.as_ref()?.state() {
            SessionState::Resolved(result) => Some(result),
            SessionState::Puzzle(_) | SessionState::Animation(_) => None,
        }
    }

    /// Failed attempts in the current phase.
    #[must_use]
    pub fn attempts_used(&self) -> u32 {
        self.session.as_ref().map_or(0, TrialSession::attempts_used)
    }

    #[must_use]
    pub fn max_attempts(&self) -> Option<u32> {
        self.current_puzzle().map(PuzzleInstance::max_attempts)
    }

    #[must_use]
    pub fn phase_index(&self) -> usize {
        self.session.as_ref().map_or(0, TrialSession::phase_index)
    }

    /// Number of puzzle phases in the open trial; zero for ungated tiers.
    #[must_use]
    pub fn phase_count(&self) -> usize {
        self.session.as_ref().map_or(0, TrialSession::phase_count)
    }

    /// Puzzle instances created so far for the open trial.
    #[must_use]
    pub fn puzzles_generated(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, TrialSession::puzzles_generated)
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Virtual time elapsed since construction.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.timers.now()
    }

    #[must_use]
    pub const fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }
}
