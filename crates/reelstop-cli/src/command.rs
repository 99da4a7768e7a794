//! Line commands read from stdin

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `start` or `start <reel>`
    Start(Option<usize>),
    /// `stop <reel>`
    Stop(usize),
    /// `set <reel> <symbol>`
    Set(usize, char),
    Show,
    Options,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("not a reel number: {0}")]
    BadReel(String),

    #[error("symbol must be a single character: {0}")]
    BadSymbol(String),

    #[error("unexpected argument: {0}")]
    Extra(String),
}

pub const HELP: &str = "\
commands:
  start [reel]        start every reel, or one
  stop <reel>         stop a reel
  set <reel> <sym>    pick a symbol on a stopped reel
  show                print the reels
  options             list the symbols
  help                this text
  quit                leave";

fn reel(arg: Option<&str>) -> Result<usize, CommandError> {
    let arg = arg.ok_or(CommandError::Missing("reel number"))?;
    arg.parse().map_err(|_| CommandError::BadReel(arg.to_string()))
}

fn symbol(arg: Option<&str>) -> Result<char, CommandError> {
    let arg = arg.ok_or(CommandError::Missing("symbol"))?;
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CommandError::BadSymbol(arg.to_string())),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "start" | "spin" => match words.next() {
                Some(arg) => Command::Start(Some(reel(Some(arg))?)),
                None => Command::Start(None),
            },
            "stop" => Command::Stop(reel(words.next())?),
            "set" | "pick" => {
                let r = reel(words.next())?;
                Command::Set(r, symbol(words.next())?)
            }
            "show" | "s" => Command::Show,
            "options" => Command::Options,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::Extra(extra.to_string())),
            None => Ok(command),
        }
    }
}
