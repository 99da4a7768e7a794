//! ReelEvent — state-change notifications for the rendering layer
//!
//! The engine pushes these to every subscriber; renderers redraw from them
//! and never reach back into reel state.

use serde::{Deserialize, Serialize};

/// A reel engine event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReelEvent {
    /// Reel went from stopped to spinning
    Started { reel: usize, symbol: char },
    /// Spinning reel moved to the next symbol
    Advanced { reel: usize, symbol: char },
    /// Reel came to rest
    Stopped { reel: usize, symbol: char },
    /// Symbol picked by hand on a stopped reel
    Selected { reel: usize, symbol: char },
    /// Every reel stopped on the target symbol
    Won { symbol: char },
}

impl ReelEvent {
    /// Reel the event concerns, `None` for engine-wide events
    pub fn reel(&self) -> Option<usize> {
        match *self {
            Self::Started { reel, .. }
            | Self::Advanced { reel, .. }
            | Self::Stopped { reel, .. }
            | Self::Selected { reel, .. } => Some(reel),
            Self::Won { .. } => None,
        }
    }

    pub fn symbol(&self) -> char {
        match *self {
            Self::Started { symbol, .. }
            | Self::Advanced { symbol, .. }
            | Self::Stopped { symbol, .. }
            | Self::Selected { symbol, .. }
            | Self::Won { symbol } => symbol,
        }
    }

    /// Get event type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Advanced { .. } => "advanced",
            Self::Stopped { .. } => "stopped",
            Self::Selected { .. } => "selected",
            Self::Won { .. } => "won",
        }
    }
}
