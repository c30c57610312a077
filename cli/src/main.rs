//! Breakthrough CLI - terminal runner for a single breakthrough trial.
//!
//! # Architecture
//!
//! The CLI bridges [`breakthrough_engine`] (trial state) and stdin/stdout:
//!
//! ```text
//! main() -> Args::parse -> tier from argv, or watcher readiness + consent
//!        -> TrialOrchestrator::open -> run_trial() -> TrialResult
//! ```
//!
//! # Event Loop
//!
//! A fixed frame interval reports wall-clock elapsed time to
//! `TrialOrchestrator::advance`, which runs due animation stages and deferred
//! board checks. Stdin lines are parsed against the current puzzle kind and
//! fed to `act`. Input typed during the animation is ignored.

mod commands;
mod render;

use std::{
    fs::{self, File, OpenOptions},
    io,
    path::Path,
    sync::Mutex,
    time::Duration,
};

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin, stdin};
use tokio::sync::oneshot;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use breakthrough_config::{BreakthroughConfig, log_file_candidates};
use breakthrough_core::SeededRng;
use breakthrough_engine::{
    ActionOutcome, CharacterProgress, Consent, OrchestratorSettings, Readiness, TrialEvent,
    TrialOrchestrator, TrialRequest, watcher,
};
use breakthrough_types::{RiskInputs, TrialResult, TrialTier};

use commands::Command;

/// Log to the first candidate file that opens. Stdout belongs to the trial,
/// so without a file nothing is logged.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let mut skipped = Vec::new();
    let opened = log_file_candidates()
        .into_iter()
        .find_map(|path| match open_append(&path) {
            Ok(file) => Some((path, file)),
            Err(err) => {
                skipped.push(format!("{}: {err}", path.display()));
                None
            }
        });

    let Some((path, file)) = opened else {
        tracing_subscriber::registry().with(filter).init();
        return;
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(filter)
        .init();
    tracing::info!(path = %path.display(), "logging to file");
    for reason in skipped {
        tracing::warn!(%reason, "skipped log file");
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Attempt a cultivation breakthrough in the terminal.
#[derive(Debug, Parser)]
#[command(name = "breakthrough", version)]
struct Args {
    /// Realm to attempt, e.g. `nascent-soul`. Without it the configured
    /// character is checked for readiness first.
    #[arg(value_parser = TrialTier::parse)]
    tier: Option<TrialTier>,
    /// Replay a trial deterministically
    #[arg(long)]
    seed: Option<u64>,
    /// Print puzzles, outcomes, and events as JSON lines
    #[arg(long)]
    json: bool,
    /// Skip the animation delays
    #[arg(long)]
    reduced_motion: bool,
}

/// Where trial output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Text,
    Json,
}

impl Output {
    fn risk(self, orchestrator: &TrialOrchestrator) -> Result<()> {
        let (Some(tier), Some(profile)) = (orchestrator.tier(), orchestrator.risk_profile()) else {
            return Ok(());
        };
        match self {
            Output::Text => println!("{}", render::risk(tier, profile)),
            Output::Json => println!(
                "{}",
                serde_json::to_string(&serde_json::json!({
                    "tier": tier,
                    "failure_probability": profile.failure_probability(),
                    "attribute_bonus": profile.attribute_bonus(),
                    "equipment_bonus": profile.equipment_bonus(),
                    "phases": orchestrator.phase_count(),
                }))?
            ),
        }
        Ok(())
    }

    fn puzzle(self, orchestrator: &TrialOrchestrator) -> Result<()> {
        let Some(puzzle) = orchestrator.current_puzzle() else {
            return Ok(());
        };
        match self {
            Output::Text => println!(
                "\n{}",
                render::puzzle(puzzle, orchestrator.attempts_used())
            ),
            Output::Json => println!("{}", serde_json::to_string(puzzle)?),
        }
        Ok(())
    }

    fn outcome(self, outcome: ActionOutcome) -> Result<()> {
        match self {
            Output::Text => {
                if let Some(line) = render::outcome(outcome) {
                    println!("{line}");
                }
            }
            Output::Json => println!("{}", serde_json::to_string(&outcome)?),
        }
        Ok(())
    }

    fn event(self, event: &TrialEvent) -> Result<()> {
        match self {
            Output::Text => println!("{}", render::event(event)),
            Output::Json => println!("{}", serde_json::to_string(event)?),
        }
        Ok(())
    }
}

type StdinLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = match BreakthroughConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            eprintln!("Ignoring config: {err}");
            BreakthroughConfig::default()
        }
    };
    let mut lines = BufReader::new(stdin()).lines();

    let tier = match args.tier {
        Some(tier) => tier,
        None => {
            let mut progress = CharacterProgress::from_config(&config.character);
            match ask_for_breakthrough(&mut progress, &mut lines).await? {
                Some(tier) => tier,
                None => return Ok(()),
            }
        }
    };

    let mut settings = OrchestratorSettings::from_config(&config.animation);
    if args.reduced_motion {
        settings = settings.reduced_motion();
    }
    let mut orchestrator = match args.seed.or_else(|| config.seed()) {
        Some(seed) => {
            tracing::info!(seed, "using fixed seed");
            TrialOrchestrator::seeded(settings, seed)
        }
        None => TrialOrchestrator::new(settings, SeededRng::from_entropy()),
    };

    let character = &config.character;
    let request = TrialRequest {
        risk: RiskInputs {
            target_tier: tier,
            aggregate_stats: character.stats(),
            equipment_quality_score: character.equipment_quality,
            has_bonded_artifact: character.bonded_artifact,
        },
        mastery: character.mastery(),
    };
    let output = if args.json { Output::Json } else { Output::Text };

    let result = run_trial(&mut orchestrator, request, &mut lines, output).await;
    orchestrator.close();

    match result? {
        Some(result) => tracing::info!(success = result.success(), "trial finished"),
        None => tracing::info!("trial abandoned"),
    }
    Ok(())
}

/// Run the watcher over the configured character and ask before opening.
async fn ask_for_breakthrough(
    progress: &mut CharacterProgress,
    lines: &mut StdinLines,
) -> Result<Option<TrialTier>> {
    let readiness = watcher::evaluate(progress);
    println!("{}", render::readiness(&readiness));
    let Readiness::Ready { target } = readiness else {
        return Ok(None);
    };

    let answer = lines.next_line().await?.unwrap_or_default();
    let consent = match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Consent::Accept,
        _ => Consent::Decline,
    };
    Ok(watcher::apply_consent(progress, target, consent))
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

/// What the loop should do after a line of input.
enum Flow {
    Continue,
    Quit,
}

async fn run_trial(
    orchestrator: &mut TrialOrchestrator,
    request: TrialRequest,
    lines: &mut StdinLines,
    output: Output,
) -> Result<Option<TrialResult>> {
    let (done_tx, mut done_rx) = oneshot::channel();
    orchestrator.open(request, move |result| {
        // The receiver only goes away once the loop has already returned.
        let _ = done_tx.send(result);
    })?;
    output.risk(orchestrator)?;
    output.puzzle(orchestrator)?;

    let mut frames = time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let now = Instant::now();
                let events = orchestrator.advance(now.duration_since(last));
                last = now;

                for event in &events {
                    output.event(event)?;
                }
                if events
                    .iter()
                    .any(|event| matches!(event, TrialEvent::BoardCollapsed { .. }))
                {
                    output.puzzle(orchestrator)?;
                }
                if let Ok(result) = done_rx.try_recv() {
                    return Ok(Some(result));
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if let Flow::Quit = handle_line(orchestrator, &line, output)? {
                            return Ok(None);
                        }
                    }
                    None => {
                        stdin_open = false;
                        // Nobody is left to solve the puzzle.
                        if orchestrator.current_puzzle().is_some() {
                            return Ok(None);
                        }
                    }
                }
            }
        }
    }
}

fn handle_line(orchestrator: &mut TrialOrchestrator, line: &str, output: Output) -> Result<Flow> {
    let Some(kind) = orchestrator.current_puzzle().map(|puzzle| puzzle.kind()) else {
        tracing::debug!("input ignored outside a puzzle phase");
        return Ok(Flow::Continue);
    };

    let action = match commands::parse(line, kind) {
        Ok(Command::Act(action)) => action,
        Ok(Command::Quit) => return Ok(Flow::Quit),
        Ok(Command::Help) => {
            println!("{}", commands::help(kind));
            return Ok(Flow::Continue);
        }
        Ok(Command::Nothing) => return Ok(Flow::Continue),
        Err(err) => {
            eprintln!("{err}");
            return Ok(Flow::Continue);
        }
    };

    match orchestrator.act(action) {
        Ok(outcome) => {
            output.outcome(outcome)?;
            match outcome {
                ActionOutcome::Updated
                | ActionOutcome::AttemptFailed { .. }
                | ActionOutcome::PhaseCleared { .. } => output.puzzle(orchestrator)?,
                ActionOutcome::NoOp
                | ActionOutcome::ChallengeCleared
                | ActionOutcome::ForcedFailure => {}
            }
        }
        Err(err) => eprintln!("{err}"),
    }
    Ok(Flow::Continue)
}
