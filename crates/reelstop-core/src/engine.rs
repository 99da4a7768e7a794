//! Reel Engine — the reel state machine
//!
//! Per reel: `Spinning` ⇄ `Stopped`. Starting arms the reel's scheduler,
//! stopping cancels it and evaluates the win condition. A stopped reel can be
//! set to any symbol by hand, which also evaluates the win condition.
//!
//! The engine is live from construction: every reel is already spinning when
//! `new` returns.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use parking_lot::Mutex;

use crate::alphabet::SymbolAlphabet;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::evaluator::{all_stopped, evaluate_win};
use crate::events::ReelEvent;
use crate::reel::{Reel, ReelSnapshot, ReelState};
use crate::scheduler::SpinScheduler;
use crate::ticker::{TickFn, TickSource};

/// Events buffered per subscriber before new ones are dropped
pub const SUBSCRIBER_CAPACITY: usize = 1024;

/// Receives the win signal. Owns whatever happens next (scene change,
/// progress saving); the engine only reports.
pub trait OutcomeSink: Send + Sync {
    fn on_win(&self, symbol: char);
}

impl<F> OutcomeSink for F
where
    F: Fn(char) + Send + Sync,
{
    fn on_win(&self, symbol: char) {
        self(symbol)
    }
}

/// Win detected under the lock, delivered after it is released so the sink
/// may call back into the engine.
struct PendingWin {
    sink: Option<Arc<dyn OutcomeSink>>,
    symbol: char,
}

impl PendingWin {
    fn deliver(self) {
        if let Some(sink) = self.sink {
            sink.on_win(self.symbol);
        }
    }
}

struct EngineState {
    alphabet: SymbolAlphabet,
    target: char,
    interval: Duration,
    reels: Vec<Reel>,
    schedulers: Vec<SpinScheduler>,
    /// Last win evaluation; the sink fires only on a false → true edge
    won: bool,
    subscribers: Vec<Sender<ReelEvent>>,
    sink: Option<Arc<dyn OutcomeSink>>,
}

impl EngineState {
    fn check_reel(&self, reel: usize) {
        assert!(
            reel < self.reels.len(),
            "reel index {} out of range (engine has {} reels)",
            reel,
            self.reels.len()
        );
    }

    fn symbol(&self, reel: usize) -> char {
        self.reels[reel].symbol(&self.alphabet)
    }

    /// Never blocks: a full subscriber misses the event, a disconnected one
    /// is pruned.
    fn emit(&mut self, event: ReelEvent) {
        self.subscribers.retain(|tx| match tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::trace!("Subscriber full, dropping {} event", event.type_name());
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// Apply one scheduler tick, unless the trigger it came from is stale
    fn tick(&mut self, reel: usize, generation: u64) {
        if !self.reels[reel].is_spinning() || !self.schedulers[reel].accepts(generation) {
            log::trace!("Reel {} dropped stale tick (generation {})", reel, generation);
            return;
        }
        let len = self.alphabet.len();
        self.reels[reel].advance(len);
        let symbol = self.symbol(reel);
        log::trace!("Reel {} -> {:?}", reel, symbol);
        self.emit(ReelEvent::Advanced { reel, symbol });
    }

    fn check_win(&mut self) -> Option<PendingWin> {
        let win = evaluate_win(&self.reels, &self.alphabet, self.target);
        let edge = win && !self.won;
        self.won = win;
        if !edge {
            return None;
        }
        log::info!("All {} reels stopped on {:?}", self.reels.len(), self.target);
        self.emit(ReelEvent::Won { symbol: self.target });
        Some(PendingWin {
            sink: self.sink.clone(),
            symbol: self.target,
        })
    }
}

/// Multi-reel stop engine
///
/// All reel state sits behind one lock: ticks, starts, stops and manual
/// selections are serialized, and a win check always sees one consistent
/// snapshot of every reel.
///
/// An out-of-range reel index is a wiring bug and panics.
pub struct ReelEngine {
    state: Arc<Mutex<EngineState>>,
    ticks: Arc<dyn TickSource>,
}

impl ReelEngine {
    /// Build an engine and start every reel spinning
    pub fn new(config: &EngineConfig, ticks: impl TickSource + 'static) -> EngineResult<Self> {
        config.validate()?;
        let alphabet = config.build_alphabet()?;

        let state = EngineState {
            alphabet,
            target: config.target,
            interval: config.tick_interval(),
            reels: (0..config.reels).map(|_| Reel::new()).collect(),
            schedulers: (0..config.reels).map(|_| SpinScheduler::new()).collect(),
            won: false,
            subscribers: Vec::new(),
            sink: None,
        };

        let engine = Self {
            state: Arc::new(Mutex::new(state)),
            ticks: Arc::new(ticks),
        };

        {
            let mut state = engine.state.lock();
            for reel in 0..config.reels {
                engine.start_locked(&mut state, reel);
            }
        }

        log::info!(
            "Reel engine ready: {} reels, {} symbols, {:?} per tick, target {:?}",
            config.reels,
            config.alphabet.len(),
            config.tick_interval(),
            config.target
        );

        Ok(engine)
    }

    /// Reference machine: three digit reels, 50 ms ticks, target `'7'`
    pub fn with_defaults(ticks: impl TickSource + 'static) -> Self {
        match Self::new(&EngineConfig::default(), ticks) {
            Ok(engine) => engine,
            Err(e) => unreachable!("default config is valid: {}", e),
        }
    }

    fn start_locked(&self, state: &mut EngineState, reel: usize) {
        let was_spinning = state.reels[reel].is_spinning();
        state.reels[reel].set_spinning(true);
        state.won = false;

        let weak: Weak<Mutex<EngineState>> = Arc::downgrade(&self.state);
        let interval = state.interval;
        state.schedulers[reel].arm(self.ticks.as_ref(), reel, interval, move |generation| {
            let tick: TickFn = Arc::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.lock().tick(reel, generation);
                }
            });
            tick
        });

        if !was_spinning {
            let symbol = state.symbol(reel);
            log::debug!("Reel {} started at {:?}", reel, symbol);
            state.emit(ReelEvent::Started { reel, symbol });
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start every reel
    pub fn start_all(&self) {
        let mut state = self.state.lock();
        for reel in 0..state.reels.len() {
            self.start_locked(&mut state, reel);
        }
    }

    /// Start one reel from its current symbol.
    ///
    /// Re-arms the scheduler even when the reel is already spinning, so there
    /// is never more than one live trigger per reel.
    pub fn start_one(&self, reel: usize) {
        let mut state = self.state.lock();
        state.check_reel(reel);
        self.start_locked(&mut state, reel);
    }

    /// Stop one reel and evaluate the win condition.
    ///
    /// Returns false (and evaluates nothing) if the reel was already stopped.
    /// No tick is applied to the reel after this returns.
    pub fn stop_one(&self, reel: usize) -> bool {
        let pending = {
            let mut state = self.state.lock();
            state.check_reel(reel);
            if !state.reels[reel].is_spinning() {
                log::debug!("Reel {} already stopped", reel);
                return false;
            }
            state.reels[reel].set_spinning(false);
            state.schedulers[reel].cancel();

            let symbol = state.symbol(reel);
            log::debug!("Reel {} stopped on {:?}", reel, symbol);
            state.emit(ReelEvent::Stopped { reel, symbol });
            state.check_win()
        };

        if let Some(win) = pending {
            win.deliver();
        }
        true
    }

    /// Set a stopped reel to `symbol` and evaluate the win condition.
    ///
    /// Returns `Ok(false)` without touching the reel while it spins, whatever
    /// the symbol. On a stopped reel, a symbol outside the alphabet is
    /// `Err(UnknownSymbol)`.
    pub fn manual_set_symbol(&self, reel: usize, symbol: char) -> EngineResult<bool> {
        let pending = {
            let mut state = self.state.lock();
            state.check_reel(reel);
            if state.reels[reel].is_spinning() {
                log::debug!("Reel {} is spinning, ignoring selection {:?}", reel, symbol);
                return Ok(false);
            }
            if !state.alphabet.contains(symbol) {
                return Err(EngineError::UnknownSymbol(symbol));
            }
            let EngineState { reels, alphabet, .. } = &mut *state;
            reels[reel].set_symbol(alphabet, symbol)?;
            log::debug!("Reel {} set to {:?}", reel, symbol);
            state.emit(ReelEvent::Selected { reel, symbol });
            state.check_win()
        };

        if let Some(win) = pending {
            win.deliver();
        }
        Ok(true)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // OBSERVERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Register the win sink, replacing any previous one
    pub fn set_outcome_sink(&self, sink: Arc<dyn OutcomeSink>) {
        self.state.lock().sink = Some(sink);
    }

    /// Stream of every state change from now on.
    ///
    /// Buffers up to `SUBSCRIBER_CAPACITY` events. A receiver that is not
    /// drained misses events until it catches up; ticks are never blocked.
    pub fn subscribe(&self) -> Receiver<ReelEvent> {
        let (tx, rx) = bounded(SUBSCRIBER_CAPACITY);
        self.state.lock().subscribers.push(tx);
        rx
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn reel_count(&self) -> usize {
        self.state.lock().reels.len()
    }

    /// Symbol currently shown by `reel`
    pub fn symbol(&self, reel: usize) -> char {
        let state = self.state.lock();
        state.check_reel(reel);
        state.symbol(reel)
    }

    /// Alphabet position currently shown by `reel`
    pub fn index(&self, reel: usize) -> usize {
        let state = self.state.lock();
        state.check_reel(reel);
        state.reels[reel].index()
    }

    pub fn is_spinning(&self, reel: usize) -> bool {
        let state = self.state.lock();
        state.check_reel(reel);
        state.reels[reel].is_spinning()
    }

    pub fn reel_state(&self, reel: usize) -> ReelState {
        let state = self.state.lock();
        state.check_reel(reel);
        state.reels[reel].state()
    }

    /// Whether the symbol picker may open on `reel` (only once it has stopped)
    pub fn is_selectable(&self, reel: usize) -> bool {
        !self.is_spinning(reel)
    }

    /// Picker options, in strip order
    pub fn options(&self) -> Vec<char> {
        self.state.lock().alphabet.symbols().to_vec()
    }

    pub fn alphabet(&self) -> SymbolAlphabet {
        self.state.lock().alphabet.clone()
    }

    pub fn target(&self) -> char {
        self.state.lock().target
    }

    pub fn tick_interval(&self) -> Duration {
        self.state.lock().interval
    }

    pub fn all_stopped(&self) -> bool {
        all_stopped(&self.state.lock().reels)
    }

    /// Whether the reels currently show a win
    pub fn is_won(&self) -> bool {
        self.state.lock().won
    }

    /// Consistent view of every reel
    pub fn snapshot(&self) -> Vec<ReelSnapshot> {
        let state = self.state.lock();
        state
            .reels
            .iter()
            .enumerate()
            .map(|(reel, r)| ReelSnapshot {
                reel,
                index: r.index(),
                symbol: r.symbol(&state.alphabet),
                spinning: r.is_spinning(),
            })
            .collect()
    }
}

impl Drop for ReelEngine {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        for scheduler in &mut state.schedulers {
            scheduler.cancel();
        }
    }
}
