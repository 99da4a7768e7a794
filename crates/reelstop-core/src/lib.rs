//! # reelstop-core — Multi-Reel Stop Engine
//!
//! N reels cycle through a fixed symbol alphabet, each driven by its own
//! spin scheduler. The player stops reels one by one (or picks a symbol on a
//! stopped reel by hand); once every reel is at rest showing the target
//! symbol, the engine signals a win exactly once.
//!
//! ## Architecture
//!
//! ```text
//! ReelEngine ──────────────► OutcomeSink (win, once per round)
//!     │          └─────────► subscribers (ReelEvent stream)
//!     ├── SymbolAlphabet (shared, read-only)
//!     ├── Reel × N       (index + spinning flag)
//!     ├── SpinScheduler × N ── TickGuard ◄── TickSource
//!     │                                     (ThreadTicker | ManualTicker)
//!     └── evaluate_win(reels, alphabet, target)
//! ```
//!
//! All reel state lives behind a single lock. Ticks, stops, starts and manual
//! selections are serialized on it, so a stopped reel never advances again
//! once `stop_one` has returned.

pub mod alphabet;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod reel;
pub mod scheduler;
pub mod ticker;

pub use alphabet::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use evaluator::*;
pub use events::*;
pub use reel::*;
pub use scheduler::*;
pub use ticker::*;
