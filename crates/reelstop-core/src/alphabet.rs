//! Symbol alphabet shared by all reels

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Ordered, cyclic set of distinct reel symbols.
///
/// After the last symbol comes the first again, like a physical reel strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<char>", into = "Vec<char>")]
pub struct SymbolAlphabet {
    symbols: Vec<char>,
}

impl SymbolAlphabet {
    /// Create an alphabet, rejecting empty or repeating symbol lists
    pub fn new(symbols: impl IntoIterator<Item = char>) -> EngineResult<Self> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        if symbols.is_empty() {
            return Err(EngineError::EmptyAlphabet);
        }
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].contains(symbol) {
                return Err(EngineError::DuplicateSymbol(*symbol));
            }
        }
        Ok(Self { symbols })
    }

    /// The digits `'0'..='9'`
    pub fn digits() -> Self {
        Self {
            symbols: ('0'..='9').collect(),
        }
    }

    /// Get symbol at position (wraps around)
    pub fn symbol_at(&self, position: usize) -> char {
        self.symbols[position % self.symbols.len()]
    }

    /// Position of a symbol, if it belongs to this alphabet
    pub fn position_of(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == symbol)
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.position_of(symbol).is_some()
    }

    /// Number of symbols on the strip
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed alphabet
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in strip order
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for SymbolAlphabet {
    fn default() -> Self {
        Self::digits()
    }
}

impl TryFrom<Vec<char>> for SymbolAlphabet {
    type Error = EngineError;

    fn try_from(symbols: Vec<char>) -> EngineResult<Self> {
        Self::new(symbols)
    }
}

impl From<SymbolAlphabet> for Vec<char> {
    fn from(alphabet: SymbolAlphabet) -> Self {
        alphabet.symbols
    }
}
