//! Virtual clock and cancellable continuations.
//!
//! Nothing here sleeps. The host reports elapsed time through
//! `TrialOrchestrator::advance`, and every continuation that falls due
//! inside that window is handed back in due order. Each entry carries the
//! epoch it was scheduled under so the orchestrator can drop it if the
//! trial it belonged to has since been closed.

use std::time::Duration;

use crate::stages::AnimationStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Continuation {
    /// `stage` has been shown for its full delay.
    StageElapsed { stage: AnimationStage },
    /// Deferred terminal-board check for the grid on `phase` after the
    /// `board_moves`-th board change.
    GameOverCheck { phase: usize, board_moves: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Scheduled {
    pub(crate) epoch: u64,
    pub(crate) due: Duration,
    seq: u64,
    pub(crate) continuation: Continuation,
}

#[derive(Debug, Default)]
pub(crate) struct TimerQueue {
    now: Duration,
    next_seq: u64,
    pending: Vec<Scheduled>,
}

impl TimerQueue {
    pub(crate) const fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    /// Schedule `delay` after the current clock reading.
    pub(crate) fn schedule(&mut self, epoch: u64, delay: Duration, continuation: Continuation) {
        let due = self.now.saturating_add(delay);
        self.schedule_at(epoch, due, continuation);
    }

    pub(crate) fn schedule_at(&mut self, epoch: u64, due: Duration, continuation: Continuation) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            epoch,
            due,
            seq,
            continuation,
        });
    }

    /// Remove and return the earliest entry due at or before `deadline`,
    /// moving the clock to its due time. Ties fire in scheduling order.
    pub(crate) fn pop_due(&mut self, deadline: Duration) -> Option<Scheduled> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= deadline)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(index, _)| index)?;
        let entry = self.pending.swap_remove(index);
        self.now = self.now.max(entry.due);
        Some(entry)
    }

    /// Move the clock forward to `deadline` once everything due is drained.
    pub(crate) fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Drop the stage timers and game-over checks of a closed trial.
    pub(crate) fn purge(&mut self) {
        self.pending.clear();
    }

    /// Drop pending game-over checks, e.g. when a board is dealt again.
    pub(crate) fn cancel_game_over_checks(&mut self) {
        self.pending
            .retain(|entry| !matches!(entry.continuation, Continuation::GameOverCheck { .. }));
    }
}
