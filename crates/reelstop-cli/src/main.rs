//! ReelStop terminal front end
//!
//! Usage:
//!   reelstop                         - classic 3 reels, stop on 777
//!   reelstop --config machine.yaml   - load engine config from file
//!   reelstop --reels 5 --target 9    - override config values
//!   reelstop --watch --json          - echo every engine event as JSON
//!
//! Commands are read line by line from stdin; type `help` for the list.

mod command;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossbeam_channel::{Receiver, unbounded};

use reelstop_core::{EngineConfig, ReelEngine, ReelEvent, ThreadTicker};

use crate::command::{Command, HELP};

#[derive(Parser)]
#[command(name = "reelstop", about = "Stop the reels on the target symbol")]
struct Cli {
    /// Engine config file (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of reels
    #[arg(long)]
    reels: Option<usize>,

    /// Milliseconds between symbol advances
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Symbol every reel must show to win
    #[arg(long)]
    target: Option<char>,

    /// Reel symbols in strip order, e.g. "0123456789"
    #[arg(long)]
    alphabet: Option<String>,

    /// Print every engine event as it happens
    #[arg(short, long)]
    watch: bool,

    /// Print watched events as JSON lines
    #[arg(long, requires = "watch")]
    json: bool,

    /// End the session on the first win
    #[arg(long)]
    exit_on_win: bool,
}

fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(reels) = cli.reels {
        config.reels = reels;
    }
    if let Some(interval) = cli.interval_ms {
        config.tick_interval_ms = interval;
    }
    if let Some(target) = cli.target {
        config.target = target;
    }
    if let Some(alphabet) = &cli.alphabet {
        config.alphabet = alphabet.chars().collect();
    }

    config.validate().context("invalid engine config")?;
    Ok(config)
}

fn render(engine: &ReelEngine) -> String {
    engine
        .snapshot()
        .iter()
        .map(|s| {
            if s.spinning {
                format!("[{}]~", s.symbol)
            } else {
                format!("[{}] ", s.symbol)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn check_reel(engine: &ReelEngine, reel: usize) -> Result<()> {
    let count = engine.reel_count();
    if reel >= count {
        bail!("no reel {} (reels are 0..{})", reel, count - 1);
    }
    Ok(())
}

fn watch(events: Receiver<ReelEvent>, json: bool) {
    let spawned = thread::Builder::new()
        .name("reelstop-watch".into())
        .spawn(move || {
            for event in events {
                if json {
                    match serde_json::to_string(&event) {
                        Ok(line) => println!("{}", line),
                        Err(e) => log::warn!("Failed to encode event: {}", e),
                    }
                } else {
                    println!("{:?}", event);
                }
            }
        });
    if let Err(e) = spawned {
        log::warn!("Failed to spawn watch thread: {}", e);
    }
}

fn execute(engine: &ReelEngine, command: Command) -> Result<()> {
    match command {
        Command::Start(None) => engine.start_all(),
        Command::Start(Some(reel)) => {
            check_reel(engine, reel)?;
            engine.start_one(reel);
        }
        Command::Stop(reel) => {
            check_reel(engine, reel)?;
            if !engine.stop_one(reel) {
                println!("reel {} is already stopped", reel);
            }
        }
        Command::Set(reel, symbol) => {
            check_reel(engine, reel)?;
            if !engine.manual_set_symbol(reel, symbol)? {
                println!("reel {} is spinning, stop it first", reel);
            }
        }
        Command::Show => {}
        Command::Options => {
            let options: String = engine.options().iter().collect();
            println!("symbols: {}", options);
            return Ok(());
        }
        Command::Help => {
            println!("{}", HELP);
            return Ok(());
        }
        Command::Quit => return Ok(()),
    }
    println!("{}", render(engine));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let engine = ReelEngine::new(&config, ThreadTicker::new()).context("starting reel engine")?;

    let (win_tx, win_rx) = unbounded::<char>();
    let reels = config.reels;
    engine.set_outcome_sink(Arc::new(move |symbol: char| {
        let line: String = std::iter::repeat_n(symbol, reels).collect();
        println!("*** {} *** cleared!", line);
        let _ = win_tx.send(symbol);
    }));

    if cli.watch {
        watch(engine.subscribe(), cli.json);
    }

    println!("Line up {} on every reel. Type `help` for commands.", config.target);
    println!("{}", render(&engine));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if let Err(e) = execute(&engine, command) {
                    println!("error: {:#}", e);
                }
            }
            Err(e) => println!("error: {} (try `help`)", e),
        }

        if cli.exit_on_win && win_rx.try_recv().is_ok() {
            break;
        }
        stdout.flush().ok();
    }

    log::info!("Session over");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelstop_core::ManualTicker;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("reelstop").chain(args.iter().copied()))
    }

    #[test]
    fn test_overrides_apply() {
        let config = build_config(&cli(&["--reels", "4", "--target", "b", "--alphabet", "abc"]))
            .unwrap();
        assert_eq!(config.reels, 4);
        assert_eq!(config.target, 'b');
        assert_eq!(config.alphabet, vec!['a', 'b', 'c']);
        assert_eq!(config.tick_interval_ms, 50);
    }

    #[test]
    fn test_invalid_override_rejected() {
        assert!(build_config(&cli(&["--target", "x"])).is_err());
        assert!(build_config(&cli(&["--interval-ms", "0"])).is_err());
    }

    #[test]
    fn test_execute_guards_reel_range() {
        let ticker = ManualTicker::new();
        let engine = ReelEngine::with_defaults(ticker.clone());
        assert!(execute(&engine, Command::Stop(3)).is_err());
        assert!(execute(&engine, Command::Stop(0)).is_ok());
        assert!(!engine.is_spinning(0));
        assert!(execute(&engine, Command::Set(0, 'x')).is_err());
        assert!(execute(&engine, Command::Set(0, '5')).is_ok());
        assert_eq!(engine.symbol(0), '5');
    }

    #[test]
    fn test_render_marks_spinning() {
        let ticker = ManualTicker::new();
        let engine = ReelEngine::with_defaults(ticker.clone());
        ticker.tick_n(1, 7);
        engine.stop_one(1);
        assert_eq!(render(&engine), "[0]~ [7]  [0]~");
    }
}
