//! Reel engine configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::alphabet::SymbolAlphabet;
use crate::error::{EngineError, EngineResult};

/// Construction parameters for `ReelEngine`.
///
/// Missing fields fall back to the classic three-reel digits machine:
/// `'0'..='9'` advancing every 50 ms, won on `777`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of reels
    pub reels: usize,
    /// Symbols in strip order
    pub alphabet: Vec<char>,
    /// Time between advances of a spinning reel (ms)
    pub tick_interval_ms: u64,
    /// Symbol every reel must show to win
    pub target: char,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reels: 3,
            alphabet: ('0'..='9').collect(),
            tick_interval_ms: 50,
            target: '7',
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config
    pub fn from_yaml(yaml: &str) -> EngineResult<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            other => Err(EngineError::Config(format!(
                "Unsupported config extension {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Check every construction invariant
    pub fn validate(&self) -> EngineResult<()> {
        if self.reels == 0 {
            return Err(EngineError::NoReels);
        }
        if self.tick_interval_ms == 0 {
            return Err(EngineError::ZeroInterval);
        }
        let alphabet = self.build_alphabet()?;
        if !alphabet.contains(self.target) {
            return Err(EngineError::TargetNotInAlphabet(self.target));
        }
        Ok(())
    }

    pub fn build_alphabet(&self) -> EngineResult<SymbolAlphabet> {
        SymbolAlphabet::new(self.alphabet.iter().copied())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
