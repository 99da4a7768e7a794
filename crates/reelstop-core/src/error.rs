//! Error types for the reel engine

use thiserror::Error;

/// Engine error type
///
/// Only configuration and symbol lookups can fail. Wiring bugs such as an
/// out-of-range reel index panic instead.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Symbol alphabet is empty")]
    EmptyAlphabet,

    #[error("Duplicate symbol in alphabet: {0:?}")]
    DuplicateSymbol(char),

    #[error("Engine needs at least one reel")]
    NoReels,

    #[error("Tick interval must be greater than zero")]
    ZeroInterval,

    #[error("Target symbol {0:?} is not in the alphabet")]
    TargetNotInAlphabet(char),

    #[error("Unknown symbol: {0:?}")]
    UnknownSymbol(char),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type EngineResult<T> = Result<T, EngineError>;
