//! Tick sources — the periodic-callback capability the engine consumes
//!
//! A `TickSource` turns "call this every `interval`" into a `TickGuard`.
//! Cancelling (or dropping) the guard stops future calls. Two sources ship:
//!
//! - `ThreadTicker`: one named OS thread per armed reel, wall-clock driven.
//! - `ManualTicker`: ticks fire only when the host calls `tick*`. Used by
//!   tests and by hosts that already own a frame loop.
//!
//! Neither source makes cancellation synchronous on its own: a thread may be
//! mid-callback when its guard is cancelled. The engine closes that gap by
//! checking the scheduler generation under its lock before applying a tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use parking_lot::Mutex;

/// Callback fired on every tick
pub type TickFn = Arc<dyn Fn() + Send + Sync>;

/// Periodic trigger factory
pub trait TickSource: Send + Sync {
    /// Start calling `tick` every `interval` for `reel` until the returned
    /// guard is cancelled or dropped.
    fn arm(&self, reel: usize, interval: Duration, tick: TickFn) -> TickGuard;
}

/// Cancellation handle for one armed trigger. Cancels on drop.
#[derive(Debug)]
pub struct TickGuard {
    cancelled: Arc<AtomicBool>,
    wake: Option<Sender<()>>,
}

impl TickGuard {
    /// Guard backed by a shared cancellation flag
    pub fn new(cancelled: Arc<AtomicBool>) -> Self {
        Self {
            cancelled,
            wake: None,
        }
    }

    /// Guard that also wakes a sleeping ticker thread on cancel
    pub fn with_wake(cancelled: Arc<AtomicBool>, wake: Sender<()>) -> Self {
        Self {
            cancelled,
            wake: Some(wake),
        }
    }

    /// Stop future ticks. Never blocks.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(wake) = self.wake.take() {
            let _ = wake.try_send(());
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for TickGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// THREAD TICKER
// ═══════════════════════════════════════════════════════════════════════════════

/// Wall-clock tick source: one thread per armed trigger.
///
/// The thread sleeps on a channel with a deadline, so a cancel wakes it
/// immediately instead of after the remaining interval.
///
/// If the OS refuses the thread, the failure is logged at error level and the
/// returned guard is already cancelled. The engine still reports that reel as
/// spinning, but it never advances until it is started again.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTicker;

impl ThreadTicker {
    pub fn new() -> Self {
        Self
    }
}

impl TickSource for ThreadTicker {
    fn arm(&self, reel: usize, interval: Duration, tick: TickFn) -> TickGuard {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (wake_tx, wake_rx) = bounded::<()>(1);
        let flag = cancelled.clone();

        let spawned = thread::Builder::new()
            .name(format!("reel-{reel}-ticker"))
            .spawn(move || {
                let mut deadline = Instant::now() + interval;
                loop {
                    match wake_rx.recv_deadline(deadline) {
                        Err(RecvTimeoutError::Timeout) => {
                            if flag.load(Ordering::Acquire) {
                                break;
                            }
                            tick();
                            deadline += interval;
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::trace!("Reel {} ticker exiting", reel);
            });

        match spawned {
            Ok(_) => TickGuard::with_wake(cancelled, wake_tx),
            Err(e) => spawn_failed(reel, &e),
        }
    }
}

fn spawn_failed(reel: usize, err: &std::io::Error) -> TickGuard {
    log::error!(
        "Failed to spawn ticker thread for reel {}: {}; reel will not advance",
        reel,
        err
    );
    TickGuard::new(Arc::new(AtomicBool::new(true)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// MANUAL TICKER
// ═══════════════════════════════════════════════════════════════════════════════

struct ManualEntry {
    reel: usize,
    interval: Duration,
    cancelled: Arc<AtomicBool>,
    tick: TickFn,
}

/// Host-driven tick source.
///
/// Cloning shares the same trigger registry, so a test can keep one clone and
/// hand the other to the engine.
#[derive(Clone, Default)]
pub struct ManualTicker {
    entries: Arc<Mutex<Vec<ManualEntry>>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live callbacks for `reel` (or every reel), pruning cancelled ones.
    /// The registry lock is released before anything is fired.
    fn live(&self, reel: Option<usize>) -> Vec<TickFn> {
        let mut entries = self.entries.lock();
        entries.retain(|e| !e.cancelled.load(Ordering::Acquire));
        entries
            .iter()
            .filter(|e| reel.is_none_or(|r| e.reel == r))
            .map(|e| e.tick.clone())
            .collect()
    }

    /// Fire one tick on `reel`. Returns false if it has no live trigger.
    pub fn tick(&self, reel: usize) -> bool {
        let live = self.live(Some(reel));
        for tick in &live {
            tick();
        }
        !live.is_empty()
    }

    /// Fire `n` ticks on `reel`
    pub fn tick_n(&self, reel: usize, n: usize) {
        for _ in 0..n {
            if !self.tick(reel) {
                break;
            }
        }
    }

    /// Fire one tick on every live trigger, in reel order. Returns how many fired.
    pub fn tick_all(&self) -> usize {
        let live = self.live(None);
        for tick in &live {
            tick();
        }
        live.len()
    }

    /// Fire `n` rounds of `tick_all`
    pub fn tick_all_n(&self, n: usize) {
        for _ in 0..n {
            self.tick_all();
        }
    }

    /// Whether `reel` currently has a live trigger
    pub fn is_armed(&self, reel: usize) -> bool {
        !self.live(Some(reel)).is_empty()
    }

    /// Number of live triggers across all reels
    pub fn armed_count(&self) -> usize {
        self.live(None).len()
    }

    /// Interval the live trigger for `reel` was armed with
    pub fn interval(&self, reel: usize) -> Option<Duration> {
        let mut entries = self.entries.lock();
        entries.retain(|e| !e.cancelled.load(Ordering::Acquire));
        entries.iter().find(|e| e.reel == reel).map(|e| e.interval)
    }
}

impl TickSource for ManualTicker {
    fn arm(&self, reel: usize, interval: Duration, tick: TickFn) -> TickGuard {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut entries = self.entries.lock();
        entries.push(ManualEntry {
            reel,
            interval,
            cancelled: cancelled.clone(),
            tick,
        });
        entries.sort_by_key(|e| e.reel);
        TickGuard::new(cancelled)
    }
}
