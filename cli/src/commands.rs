//! Line commands typed at the trial prompt.
//!
//! Positions are 1-based on the command line and 0-based everywhere else.

use thiserror::Error;

use breakthrough_engine::PlayerAction;
use breakthrough_types::{Direction, Gesture, PuzzleKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Act(PlayerAction),
    Help,
    Quit,
    /// Blank line outside a narrative phase.
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("expected a whole number, got `{0}`")]
    NotANumber(String),
    #[error("positions start at 1")]
    ZeroPosition,
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("`{input}` does nothing during a {kind} puzzle (try `help`)")]
    Unknown { input: String, kind: PuzzleKind },
}

/// Parse one input line against the kind of puzzle currently shown.
pub fn parse(line: &str, kind: PuzzleKind) -> Result<Command, CommandError> {
    let line = line.trim();
    let lower = line.to_ascii_lowercase();
    let mut words = lower.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(match kind {
            PuzzleKind::Narrative => Command::Act(PlayerAction::Acknowledge),
            _ => Command::Nothing,
        });
    };
    let rest: Vec<&str> = words.collect();

    match head {
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "?" | "help" => return Ok(Command::Help),
        _ => {}
    }

    let action = match kind {
        PuzzleKind::Sequence => match head {
            "answer" => PlayerAction::Answer(number(single(&rest, "answer <n>")?)?),
            _ if rest.is_empty() => PlayerAction::Answer(number(head)?),
            _ => return Err(unknown(line, kind)),
        },
        PuzzleKind::Permutation => match head {
            "swap" => match rest.as_slice() {
                [a, b] => PlayerAction::Swap(position(a)?, position(b)?),
                _ => return Err(CommandError::Usage("swap <a> <b>")),
            },
            "pick" => PlayerAction::Select(position(single(&rest, "pick <n>")?)?),
            "submit" | "done" => PlayerAction::Submit,
            _ if rest.is_empty() && head.chars().all(|c| c.is_ascii_digit()) => {
                PlayerAction::Select(position(head)?)
            }
            _ => return Err(unknown(line, kind)),
        },
        PuzzleKind::GridMerge => match head {
            "swipe" => match rest.as_slice() {
                [dx, dy] => PlayerAction::Swipe(Gesture::new(travel(dx)?, travel(dy)?)),
                _ => return Err(CommandError::Usage("swipe <dx> <dy>")),
            },
            "submit" | "done" => PlayerAction::Submit,
            _ if rest.is_empty() => match Direction::parse(head) {
                Some(direction) => PlayerAction::Move(direction),
                None => return Err(unknown(line, kind)),
            },
            _ => return Err(unknown(line, kind)),
        },
        PuzzleKind::Narrative => match head {
            "ok" | "continue" | "accept" => PlayerAction::Acknowledge,
            "submit" => PlayerAction::Submit,
            _ => return Err(unknown(line, kind)),
        },
    };
    Ok(Command::Act(action))
}

/// One-line hint for the commands a puzzle kind accepts.
#[must_use]
pub const fn help(kind: PuzzleKind) -> &'static str {
    match kind {
        PuzzleKind::Sequence => "type the next number, or `quit`",
        PuzzleKind::Permutation => {
            "`swap a b` exchanges two positions; `pick n` (or just `n`) twice swaps by clicking"
        }
        PuzzleKind::GridMerge => {
            "w/a/s/d or up/left/down/right to slide, `swipe dx dy` to drag, `submit` to give up the board"
        }
        PuzzleKind::Narrative => "press enter or type `ok` to continue",
    }
}

fn single<'a>(rest: &[&'a str], usage: &'static str) -> Result<&'a str, CommandError> {
    match rest {
        [only] => Ok(*only),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn number(raw: &str) -> Result<i64, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::NotANumber(raw.to_string()))
}

fn position(raw: &str) -> Result<usize, CommandError> {
    let n: usize = raw
        .parse()
        .map_err(|_| CommandError::NotANumber(raw.to_string()))?;
    n.checked_sub(1).ok_or(CommandError::ZeroPosition)
}

fn travel(raw: &str) -> Result<f32, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::NotANumber(raw.to_string()))
}

fn unknown(line: &str, kind: PuzzleKind) -> CommandError {
    CommandError::Unknown {
        input: line.to_string(),
        kind,
    }
}
