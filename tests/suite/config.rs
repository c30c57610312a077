//! Config file to watcher to orchestrator, end to end.

use std::fs;
use std::time::Duration;

use tempfile::tempdir;

use breakthrough_config::BreakthroughConfig;
use breakthrough_engine::watcher::{apply_consent, evaluate};
use breakthrough_engine::{
    CharacterProgress, Consent, OrchestratorSettings, Prerequisite, Readiness, TrialOrchestrator,
    TrialRequest,
};
use breakthrough_types::{RiskInputs, TrialStatus, TrialTier};

const CHARACTER: &str = r#"
[trial]
seed = 7

[animation]
stage_delays_ms = [10, 20, 30, 40, 50]
game_over_check_delay_ms = 5

[character]
realm = "qi-condensation"
experience = 2000
experience_cap = 2000
stage = 9
stage_cap = 9
gear_quality = 10.0
materials = { "Foundation Pill" = 1 }
"#;

fn load(content: &str) -> BreakthroughConfig {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    BreakthroughConfig::load_from(&path).unwrap().unwrap()
}

#[test]
fn configured_delays_drive_the_animation() {
    let config = load(CHARACTER);
    let settings = OrchestratorSettings::from_config(&config.animation);
    assert_eq!(settings.total_animation(), Duration::from_millis(150));
    assert_eq!(settings.game_over_check_delay(), Duration::from_millis(5));

    let mut orchestrator = TrialOrchestrator::seeded(settings, config.trial.seed.unwrap());
    let character = &config.character;
    orchestrator
        .open(
            TrialRequest {
                risk: RiskInputs {
                    target_tier: TrialTier::SpiritSevering,
                    aggregate_stats: character.stats(),
                    equipment_quality_score: character.equipment_quality,
                    has_bonded_artifact: character.bonded_artifact,
                },
                mastery: character.mastery(),
            },
            |_| {},
        )
        .unwrap();
    orchestrator.advance(Duration::from_millis(149));
    assert_eq!(orchestrator.status(), TrialStatus::AnimationPhase { stage: 4 });
    orchestrator.advance(Duration::from_millis(1));
    assert_eq!(orchestrator.status(), TrialStatus::Resolved);
}

#[test]
fn reduced_motion_from_config() {
    let config = load("[animation]\nreduced_motion = true\n");
    let settings = OrchestratorSettings::from_config(&config.animation);
    assert_eq!(settings.total_animation(), Duration::ZERO);
    assert_eq!(settings.game_over_check_delay(), Duration::ZERO);
}

#[test]
fn watcher_reads_the_configured_character() {
    let config = load(CHARACTER);
    let mut progress = CharacterProgress::from_config(&config.character);

    let readiness = evaluate(&progress);
    assert_eq!(
        readiness,
        Readiness::Ready {
            target: TrialTier::FoundationEstablishment
        }
    );

    assert_eq!(
        apply_consent(&mut progress, TrialTier::FoundationEstablishment, Consent::Decline),
        None
    );
    assert_eq!(evaluate(&progress), Readiness::NotReady);
}

#[test]
fn watcher_blocks_on_missing_gear() {
    let mut config = load(CHARACTER);
    config.character.realm = Some(TrialTier::FoundationEstablishment);
    config.character.materials.insert("Core Condensing Pill".to_string(), 1);

    let readiness = evaluate(&CharacterProgress::from_config(&config.character));
    assert_eq!(
        readiness,
        Readiness::Blocked {
            target: TrialTier::CoreFormation,
            missing: vec![Prerequisite::GearQuality {
                required: 20.0,
                current: 10.0
            }],
        }
    );
}
