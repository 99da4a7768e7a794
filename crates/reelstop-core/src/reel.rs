//! Reel state: a position on the cyclic alphabet plus a spin flag

use serde::{Deserialize, Serialize};

use crate::alphabet::SymbolAlphabet;
use crate::error::{EngineError, EngineResult};

/// Spin state of a single reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReelState {
    Spinning,
    Stopped,
}

/// One reel.
///
/// The reel does not police who mutates it. `ReelEngine` is the only owner
/// and enforces that `advance` runs only while spinning and `set_index` only
/// while stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reel {
    index: usize,
    spinning: bool,
}

impl Reel {
    /// Reels start at the first symbol and already spinning
    pub fn new() -> Self {
        Self {
            index: 0,
            spinning: true,
        }
    }

    /// Move one symbol forward, wrapping after the last one
    #[inline]
    pub fn advance(&mut self, alphabet_len: usize) {
        self.index = (self.index + 1) % alphabet_len;
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Jump to `symbol`'s position on the alphabet
    pub fn set_symbol(&mut self, alphabet: &SymbolAlphabet, symbol: char) -> EngineResult<()> {
        self.index = alphabet
            .position_of(symbol)
            .ok_or(EngineError::UnknownSymbol(symbol))?;
        Ok(())
    }

    pub fn set_spinning(&mut self, spinning: bool) {
        self.spinning = spinning;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn state(&self) -> ReelState {
        if self.spinning {
            ReelState::Spinning
        } else {
            ReelState::Stopped
        }
    }

    /// Current symbol on the given alphabet
    pub fn symbol(&self, alphabet: &SymbolAlphabet) -> char {
        alphabet.symbol_at(self.index)
    }
}

impl Default for Reel {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of one reel, for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelSnapshot {
    pub reel: usize,
    pub index: usize,
    pub symbol: char,
    pub spinning: bool,
}
