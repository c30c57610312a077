use std::time::Duration;

use breakthrough_config::{AnimationConfig, DEFAULT_GAME_OVER_CHECK_DELAY_MS, DEFAULT_STAGE_DELAYS_MS};

use crate::stages::AnimationStage;

/// Timing knobs for one orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorSettings {
    stage_delays: [Duration; 5],
    game_over_check_delay: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            stage_delays: DEFAULT_STAGE_DELAYS_MS.map(Duration::from_millis),
            game_over_check_delay: Duration::from_millis(DEFAULT_GAME_OVER_CHECK_DELAY_MS),
        }
    }
}

impl OrchestratorSettings {
    #[must_use]
    pub fn from_config(config: &AnimationConfig) -> Self {
        let settings = Self {
            stage_delays: config.stage_delays().map(Duration::from_millis),
            game_over_check_delay: Duration::from_millis(config.game_over_check_delay_ms),
        };
        if config.reduced_motion {
            settings.reduced_motion()
        } else {
            settings
        }
    }

    /// Every delay collapsed to zero. The sequence still runs in order, it
    /// just completes on the next `advance`.
    #[must_use]
    pub const fn reduced_motion(self) -> Self {
        Self {
            stage_delays: [Duration::ZERO; 5],
            game_over_check_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn with_game_over_check_delay(mut self, delay: Duration) -> Self {
        self.game_over_check_delay = delay;
        self
    }

    #[must_use]
    pub const fn stage_delay(&self, stage: AnimationStage) -> Duration {
        self.stage_delays[stage.index()]
    }

    #[must_use]
    pub const fn game_over_check_delay(&self) -> Duration {
        self.game_over_check_delay
    }

    /// Time from the first stage to the roll.
    #[must_use]
    pub fn total_animation(&self) -> Duration {
        self.stage_delays.iter().sum()
    }
}
