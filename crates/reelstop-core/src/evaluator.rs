//! Win evaluation

use crate::alphabet::SymbolAlphabet;
use crate::reel::Reel;

/// True when no reel is spinning
pub fn all_stopped(reels: &[Reel]) -> bool {
    !reels.iter().any(Reel::is_spinning)
}

/// Win iff every reel is stopped on `target`.
///
/// Safe to call at any time; it is simply false while any reel spins.
pub fn evaluate_win(reels: &[Reel], alphabet: &SymbolAlphabet, target: char) -> bool {
    all_stopped(reels) && reels.iter().all(|r| r.symbol(alphabet) == target)
}
