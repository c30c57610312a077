//! Configuration for the breakthrough trial engine.
//!
//! ```toml
//! [trial]
//! seed = 42
//!
//! [animation]
//! reduced_motion = false
//! stage_delays_ms = [700, 900, 1100, 1300, 800]
//! game_over_check_delay_ms = 150
//!
//! [character]
//! realm = "qi-condensation"
//! experience = 1000
//! experience_cap = 1000
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fs, io, iter};

use serde::Deserialize;
use thiserror::Error;

use breakthrough_types::{CombatStats, MasteryScalar, TrialTier};

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "BREAKTHROUGH_CONFIG";
/// Overrides `[trial] seed`.
pub const SEED_ENV: &str = "BREAKTHROUGH_SEED";

pub const DEFAULT_STAGE_DELAYS_MS: [u64; 5] = [700, 900, 1100, 1300, 800];
pub const DEFAULT_GAME_OVER_CHECK_DELAY_MS: u64 = 150;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BreakthroughConfig {
    pub trial: TrialConfig,
    pub animation: AnimationConfig,
    pub character: CharacterConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    /// Fixed seed for replayable trials. `None` seeds from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Collapse every stage delay to zero.
    pub reduced_motion: bool,
    /// One entry per animation stage.
    pub stage_delays_ms: Vec<u64>,
    pub game_over_check_delay_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            stage_delays_ms: DEFAULT_STAGE_DELAYS_MS.to_vec(),
            game_over_check_delay_ms: DEFAULT_GAME_OVER_CHECK_DELAY_MS,
        }
    }
}

impl AnimationConfig {
    /// Configured stage delays, or the defaults when the list has the wrong
    /// number of entries.
    #[must_use]
    pub fn stage_delays(&self) -> [u64; 5] {
        match <[u64; 5]>::try_from(self.stage_delays_ms.as_slice()) {
            Ok(delays) => delays,
            Err(_) => {
                tracing::warn!(
                    configured = self.stage_delays_ms.len(),
                    expected = DEFAULT_STAGE_DELAYS_MS.len(),
                    "stage_delays_ms has the wrong length; using defaults"
                );
                DEFAULT_STAGE_DELAYS_MS
            }
        }
    }
}

/// The character a trial is run for when the binary is started without an
/// explicit tier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Current realm. `None` is a mortal who has not yet condensed qi.
    pub realm: Option<TrialTier>,
    pub experience: u64,
    pub experience_cap: u64,
    pub stage: u32,
    pub stage_cap: u32,
    pub attack: u32,
    pub defense: u32,
    pub max_hp: u32,
    pub spirit: u32,
    pub physique: u32,
    pub speed: u32,
    /// Feeds the risk model.
    pub equipment_quality: f64,
    pub bonded_artifact: bool,
    pub abilities: u32,
    pub unlocks: u32,
    pub artifact_quality: f64,
    /// Feeds the realm prerequisites.
    pub gear_quality: f64,
    pub materials: BTreeMap<String, u32>,
    pub cleared_challenges: Vec<String>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            realm: None,
            experience: 1000,
            experience_cap: 1000,
            stage: 9,
            stage_cap: 9,
            attack: 120,
            defense: 90,
            max_hp: 1500,
            spirit: 80,
            physique: 70,
            speed: 60,
            equipment_quality: 45.0,
            bonded_artifact: false,
            abilities: 6,
            unlocks: 4,
            artifact_quality: 3.0,
            gear_quality: 50.0,
            materials: BTreeMap::new(),
            cleared_challenges: Vec::new(),
        }
    }
}

impl CharacterConfig {
    #[must_use]
    pub const fn stats(&self) -> CombatStats {
        CombatStats {
            attack: self.attack,
            defense: self.defense,
            max_hp: self.max_hp,
            spirit: self.spirit,
            physique: self.physique,
            speed: self.speed,
        }
    }

    #[must_use]
    pub fn mastery(&self) -> MasteryScalar {
        MasteryScalar::from_progression(self.abilities, self.unlocks, self.artifact_quality)
    }
}

impl BreakthroughConfig {
    /// Load from [`config_path`]. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read config");
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::parse(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to parse config");
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// `BREAKTHROUGH_SEED` if set and numeric, else `[trial] seed`.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        match env::var(SEED_ENV) {
            Ok(raw) => match raw.trim().parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring non-numeric {SEED_ENV}");
                    self.trial.seed
                }
            },
            Err(_) => self.trial.seed,
        }
    }
}

/// `$BREAKTHROUGH_CONFIG`, else `~/.breakthrough/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".breakthrough").join("config.toml"))
}

pub const LOG_FILE_NAME: &str = "breakthrough.log";

/// Where the binary may write its log, most preferred first: `logs/` beside
/// the config file, then `./.breakthrough/logs/`.
#[must_use]
pub fn log_file_candidates() -> Vec<PathBuf> {
    let beside_config = config_path().and_then(|path| path.parent().map(|dir| dir.join("logs")));
    beside_config
        .into_iter()
        .chain(iter::once(Path::new(".breakthrough").join("logs")))
        .map(|dir| dir.join(LOG_FILE_NAME))
        .collect()
}
