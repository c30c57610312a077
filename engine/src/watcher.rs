//! Progression watcher: decides when a breakthrough trial is due.
//!
//! The watcher never opens a trial itself. It reports readiness, and the
//! host asks the player before calling `TrialOrchestrator::open`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use breakthrough_config::CharacterConfig;
use breakthrough_types::TrialTier;

/// Gear, materials, and challenge records checked against realm prerequisites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnlockLedger {
    pub gear_quality: f64,
    pub materials: BTreeMap<String, u32>,
    pub cleared_challenges: BTreeSet<String>,
}

impl UnlockLedger {
    #[must_use]
    pub fn material_count(&self, name: &str) -> u32 {
        self.materials.get(name).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterProgress {
    /// `None` for a mortal.
    pub realm: Option<TrialTier>,
    pub experience: u64,
    pub experience_cap: u64,
    pub stage: u32,
    pub stage_cap: u32,
    pub ledger: UnlockLedger,
}

impl CharacterProgress {
    #[must_use]
    pub fn from_config(character: &CharacterConfig) -> Self {
        Self {
            realm: character.realm,
            experience: character.experience,
            experience_cap: character.experience_cap,
            stage: character.stage,
            stage_cap: character.stage_cap,
            ledger: UnlockLedger {
                gear_quality: character.gear_quality,
                materials: character.materials.clone(),
                cleared_challenges: character.cleared_challenges.iter().cloned().collect(),
            },
        }
    }

    /// The realm a breakthrough would reach.
    #[must_use]
    pub fn next_realm(&self) -> Option<TrialTier> {
        match self.realm {
            None => Some(TrialTier::first()),
            Some(realm) => realm.next(),
        }
    }
}

/// One unmet condition for entering a realm.
#[derive(Debug, Clone, PartialEq)]
pub enum Prerequisite {
    GearQuality { required: f64, current: f64 },
    Material {
        name: &'static str,
        required: u32,
        held: u32,
    },
    Challenge { name: &'static str },
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prerequisite::GearQuality { required, current } => {
                write!(f, "gear quality {required:.0} (have {current:.0})")
            }
            Prerequisite::Material {
                name,
                required,
                held,
            } => write!(f, "{required}x {name} (have {held})"),
            Prerequisite::Challenge { name } => write!(f, "clear the {name}"),
        }
    }
}

struct RealmRequirements {
    gear_quality: f64,
    materials: &'static [(&'static str, u32)],
    challenges: &'static [&'static str],
}

const fn requirements(tier: TrialTier) -> RealmRequirements {
    match tier {
        TrialTier::QiCondensation => RealmRequirements {
            gear_quality: 0.0,
            materials: &[],
            challenges: &[],
        },
        TrialTier::FoundationEstablishment => RealmRequirements {
            gear_quality: 0.0,
            materials: &[("Foundation Pill", 1)],
            challenges: &[],
        },
        TrialTier::CoreFormation => RealmRequirements {
            gear_quality: 20.0,
            materials: &[("Core Condensing Pill", 1)],
            challenges: &[],
        },
        TrialTier::NascentSoul => RealmRequirements {
            gear_quality: 35.0,
            materials: &[("Nascent Lotus", 1)],
            challenges: &["Core Tempering Trial"],
        },
        TrialTier::SpiritSevering => RealmRequirements {
            gear_quality: 50.0,
            materials: &[("Spirit Jade", 2)],
            challenges: &[],
        },
        TrialTier::VoidRefinement => RealmRequirements {
            gear_quality: 60.0,
            materials: &[("Void Crystal", 1)],
            challenges: &["Spirit Severing Trial"],
        },
        TrialTier::BodyIntegration => RealmRequirements {
            gear_quality: 70.0,
            materials: &[("Dragon Marrow", 1), ("Void Crystal", 1)],
            challenges: &[],
        },
        TrialTier::ImmortalAscension => RealmRequirements {
            gear_quality: 85.0,
            materials: &[("Heavenly Dao Fragment", 1)],
            challenges: &["Tribulation Rehearsal"],
        },
    }
}

/// Everything `ledger` lacks for `tier`, in table order.
#[must_use]
pub fn missing_prerequisites(tier: TrialTier, ledger: &UnlockLedger) -> Vec<Prerequisite> {
    let table = requirements(tier);
    let mut missing = Vec::new();

    if ledger.gear_quality < table.gear_quality || !ledger.gear_quality.is_finite() {
        missing.push(Prerequisite::GearQuality {
            required: table.gear_quality,
            current: ledger.gear_quality,
        });
    }
    for &(name, required) in table.materials {
        let held = ledger.material_count(name);
        if held < required {
            missing.push(Prerequisite::Material {
                name,
                required,
                held,
            });
        }
    }
    for &name in table.challenges {
        if !ledger.cleared_challenges.contains(name) {
            missing.push(Prerequisite::Challenge { name });
        }
    }
    missing
}

#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    /// Experience or stage has not reached its cap.
    NotReady,
    /// Already at the highest realm.
    AtPeak,
    Blocked {
        target: TrialTier,
        missing: Vec<Prerequisite>,
    },
    Ready { target: TrialTier },
}

#[must_use]
pub fn evaluate(progress: &CharacterProgress) -> Readiness {
    if progress.experience < progress.experience_cap || progress.stage < progress.stage_cap {
        return Readiness::NotReady;
    }
    let Some(target) = progress.next_realm() else {
        return Readiness::AtPeak;
    };
    let missing = missing_prerequisites(target, &progress.ledger);
    if missing.is_empty() {
        Readiness::Ready { target }
    } else {
        Readiness::Blocked { target, missing }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Accept,
    Decline,
}

/// Record the player's answer to the breakthrough prompt.
///
/// Declining drops experience just under the cap so the watcher does not
/// fire again on the next tick.
pub fn apply_consent(
    progress: &mut CharacterProgress,
    target: TrialTier,
    consent: Consent,
) -> Option<TrialTier> {
    match consent {
        Consent::Accept => {
            tracing::info!(target = %target, "breakthrough accepted");
            Some(target)
        }
        Consent::Decline => {
            progress.experience = progress.experience.min(progress.experience_cap.saturating_sub(1));
            tracing::info!(
                target = %target,
                experience = progress.experience,
                "breakthrough declined"
            );
            None
        }
    }
}
