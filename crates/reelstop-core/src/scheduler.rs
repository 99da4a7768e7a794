//! Per-reel spin scheduler

use std::time::Duration;

use crate::ticker::{TickFn, TickGuard, TickSource};

/// Owned, swappable periodic trigger for one reel.
///
/// Every `arm` and `cancel` bumps the generation. A tick callback carries the
/// generation it was armed with, and the engine applies it only while
/// `accepts` still holds, so a tick racing a cancel or re-arm is dropped.
#[derive(Debug, Default)]
pub struct SpinScheduler {
    guard: Option<TickGuard>,
    generation: u64,
}

impl SpinScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any prior trigger, then arm a new one.
    ///
    /// `make_tick` receives the new generation and builds the callback.
    /// Returns the new generation.
    pub fn arm(
        &mut self,
        source: &dyn TickSource,
        reel: usize,
        interval: Duration,
        make_tick: impl FnOnce(u64) -> TickFn,
    ) -> u64 {
        self.cancel();
        let generation = self.generation;
        self.guard = Some(source.arm(reel, interval, make_tick(generation)));
        generation
    }

    /// Stop future ticks. Harmless when never armed.
    pub fn cancel(&mut self) {
        if let Some(mut guard) = self.guard.take() {
            guard.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn is_armed(&self) -> bool {
        self.guard.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a tick armed at `generation` may still be applied
    #[inline]
    pub fn accepts(&self, generation: u64) -> bool {
        self.guard.is_some() && self.generation == generation
    }
}
