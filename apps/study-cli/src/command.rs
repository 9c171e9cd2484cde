//! Line commands typed at the study prompt.

use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  tap                 flip the front card
  drag <dx> [dy]      move the front card to an offset from rest
  release             let go of the front card
  swipe <dx>          drag to <dx> and release at once
  play                play the pronunciation of the revealed word
  show                print the deck
  stats               print session statistics
  help                print this help
  quit                end the session";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Tap,
    Drag { dx: f32, dy: f32 },
    Release,
    Swipe { dx: f32 },
    Play,
    Show,
    Stats,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("not a number: {0}")]
    InvalidNumber(String),
}

fn number(raw: &str) -> Result<f32, CommandError> {
    raw.parse::<f32>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber(raw.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = parts.collect();

        let command = match (name.to_lowercase().as_str(), args.as_slice()) {
            ("tap" | "t", []) => Self::Tap,
            ("drag" | "d", [dx]) => Self::Drag {
                dx: number(dx)?,
                dy: 0.0,
            },
            ("drag" | "d", [dx, dy]) => Self::Drag {
                dx: number(dx)?,
                dy: number(dy)?,
            },
            ("drag" | "d", _) => return Err(CommandError::Usage("drag <dx> [dy]")),
            ("release" | "r", []) => Self::Release,
            ("swipe" | "s", [dx]) => Self::Swipe { dx: number(dx)? },
            ("swipe" | "s", _) => return Err(CommandError::Usage("swipe <dx>")),
            ("play" | "p", []) => Self::Play,
            ("show", []) => Self::Show,
            ("stats", []) => Self::Stats,
            ("help" | "?", []) => Self::Help,
            ("quit" | "q" | "exit", []) => Self::Quit,
            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}
