//! Reel engine behaviour suite
//!
//! Drives the public API through a `ManualTicker` so every tick is explicit,
//! plus one wall-clock run on `ThreadTicker`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reelstop_core::{
    EngineConfig, ManualTicker, ReelEngine, ReelEvent, SymbolAlphabet, ThreadTicker,
};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

struct Machine {
    engine: ReelEngine,
    ticker: ManualTicker,
    wins: Arc<Mutex<Vec<char>>>,
}

fn machine(config: EngineConfig) -> Machine {
    let ticker = ManualTicker::new();
    let engine = ReelEngine::new(&config, ticker.clone()).unwrap();
    let wins = Arc::new(Mutex::new(Vec::new()));
    let w = wins.clone();
    engine.set_outcome_sink(Arc::new(move |symbol: char| w.lock().push(symbol)));
    Machine {
        engine,
        ticker,
        wins,
    }
}

fn reference_machine() -> Machine {
    machine(EngineConfig::default())
}

fn win_count(m: &Machine) -> usize {
    m.wins.lock().len()
}

fn assert_indices_in_range(engine: &ReelEngine) {
    let len = engine.alphabet().len();
    for snap in engine.snapshot() {
        assert!(snap.index < len, "reel {} index {} >= {}", snap.reel, snap.index, len);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WIN DETECTION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn win_fires_once_after_last_stop() {
    let m = reference_machine();
    m.engine.start_all();
    m.ticker.tick_all_n(7);

    assert!(m.engine.stop_one(0));
    assert_eq!(win_count(&m), 0, "reels 1 and 2 still spinning");
    assert!(m.engine.stop_one(1));
    assert_eq!(win_count(&m), 0, "reel 2 still spinning");
    assert!(m.engine.stop_one(2));
    assert_eq!(*m.wins.lock(), vec!['7']);

    let symbols: Vec<char> = m.engine.snapshot().iter().map(|s| s.symbol).collect();
    assert_eq!(symbols, vec!['7', '7', '7']);
    assert!(m.engine.is_won());
}

#[test]
fn no_win_on_mismatch() {
    let m = reference_machine();
    m.ticker.tick_all_n(7);
    m.engine.stop_one(0);
    m.engine.stop_one(1);
    // 7 → 3 wraps through 9 and 0
    m.ticker.tick_n(2, 6);
    assert_eq!(m.engine.symbol(2), '3');
    m.engine.stop_one(2);

    assert_eq!(win_count(&m), 0);
    assert!(m.engine.all_stopped());
    assert!(!m.engine.is_won());
}

#[test]
fn repeated_stop_does_not_renotify() {
    let m = reference_machine();
    m.ticker.tick_all_n(7);
    for reel in 0..3 {
        m.engine.stop_one(reel);
    }
    for reel in 0..3 {
        assert!(!m.engine.stop_one(reel));
        assert!(!m.engine.stop_one(reel));
    }
    assert_eq!(win_count(&m), 1);
}

#[test]
fn manual_selection_completes_win() {
    let m = reference_machine();
    m.ticker.tick_all_n(2);
    for reel in 0..3 {
        m.engine.stop_one(reel);
        assert!(m.engine.is_selectable(reel));
    }
    assert_eq!(win_count(&m), 0);

    for reel in 0..3 {
        assert!(m.engine.manual_set_symbol(reel, '7').unwrap());
    }
    assert_eq!(win_count(&m), 1);
}

#[test]
fn respin_after_win_allows_another_round() {
    let m = reference_machine();
    m.ticker.tick_all_n(7);
    for reel in 0..3 {
        m.engine.stop_one(reel);
    }
    assert_eq!(win_count(&m), 1);

    m.engine.start_all();
    assert!(!m.engine.is_won());
    m.ticker.tick_all_n(10);
    for reel in 0..3 {
        m.engine.stop_one(reel);
    }
    assert_eq!(win_count(&m), 2);
}

#[test]
fn custom_alphabet_and_target() {
    let m = machine(EngineConfig {
        reels: 5,
        alphabet: vec!['🍒', '🔔', '⭐'],
        tick_interval_ms: 20,
        target: '⭐',
    });
    assert_eq!(m.engine.options(), vec!['🍒', '🔔', '⭐']);
    m.ticker.tick_all_n(2);
    for reel in 0..5 {
        m.engine.stop_one(reel);
    }
    assert_eq!(*m.wins.lock(), vec!['⭐']);
}

// ═══════════════════════════════════════════════════════════════════════════════
// REEL INVARIANTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn index_stays_in_range() {
    let m = reference_machine();
    for round in 0..35 {
        m.ticker.tick_all();
        if round % 7 == 3 {
            m.engine.stop_one(round % 3);
        }
        if round % 11 == 5 {
            m.engine.start_all();
        }
        assert_indices_in_range(&m.engine);
    }
}

#[test]
fn advance_wraps_to_first_symbol() {
    let m = reference_machine();
    m.ticker.tick_n(0, 9);
    assert_eq!(m.engine.index(0), 9);
    m.ticker.tick(0);
    assert_eq!(m.engine.index(0), 0);
    assert_eq!(m.engine.symbol(0), '0');
}

#[test]
fn selection_ignored_while_spinning() {
    let m = reference_machine();
    m.ticker.tick_n(1, 4);
    assert!(!m.engine.manual_set_symbol(1, '7').unwrap());
    assert_eq!(m.engine.index(1), 4);
    assert!(!m.engine.is_selectable(1));
}

#[test]
fn stopping_one_reel_leaves_others_alone() {
    let m = reference_machine();
    m.ticker.tick_n(0, 1);
    m.ticker.tick_n(1, 2);
    m.ticker.tick_n(2, 3);

    m.engine.stop_one(0);

    assert!(m.engine.is_spinning(1));
    assert!(m.engine.is_spinning(2));
    assert_eq!(m.engine.index(1), 2);
    assert_eq!(m.engine.index(2), 3);

    m.ticker.tick_all();
    assert_eq!(m.engine.index(0), 1);
    assert_eq!(m.engine.index(1), 3);
    assert_eq!(m.engine.index(2), 4);
}

#[test]
fn respin_resumes_from_current_index() {
    let m = reference_machine();
    m.ticker.tick_n(2, 6);
    m.engine.stop_one(2);
    m.engine.manual_set_symbol(2, '8').unwrap();
    m.engine.start_one(2);

    assert_eq!(m.engine.index(2), 8);
    m.ticker.tick_n(2, 3);
    assert_eq!(m.engine.index(2), 1);
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn subscribers_see_the_whole_round() {
    let m = reference_machine();
    let rx = m.engine.subscribe();
    m.ticker.tick_all_n(7);
    for reel in 0..3 {
        m.engine.stop_one(reel);
    }

    let events: Vec<ReelEvent> = rx.try_iter().collect();
    let advanced = events
        .iter()
        .filter(|e| matches!(e, ReelEvent::Advanced { .. }))
        .count();
    assert_eq!(advanced, 21);

    let tail: Vec<&str> = events.iter().rev().take(4).map(|e| e.type_name()).collect();
    assert_eq!(tail, vec!["won", "stopped", "stopped", "stopped"]);
    assert_eq!(events.last(), Some(&ReelEvent::Won { symbol: '7' }));
}

// ═══════════════════════════════════════════════════════════════════════════════
// WALL CLOCK
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn thread_ticker_spins_and_stops_cleanly() {
    let config = EngineConfig {
        tick_interval_ms: 1,
        ..EngineConfig::default()
    };
    let engine = Arc::new(ReelEngine::new(&config, ThreadTicker::new()).unwrap());
    let wins = Arc::new(AtomicUsize::new(0));
    let w = wins.clone();
    engine.set_outcome_sink(Arc::new(move |_symbol: char| {
        w.fetch_add(1, Ordering::SeqCst);
    }));

    let deadline = Instant::now() + Duration::from_secs(5);
    while engine.index(0) == 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }

    // Race the three stops from separate threads
    let handles: Vec<_> = (0..3)
        .map(|reel| {
            let engine = engine.clone();
            thread::spawn(move || engine.stop_one(reel))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }

    assert!(engine.all_stopped());
    let frozen: Vec<usize> = (0..3).map(|r| engine.index(r)).collect();
    thread::sleep(Duration::from_millis(20));
    let later: Vec<usize> = (0..3).map(|r| engine.index(r)).collect();
    assert_eq!(frozen, later, "no tick may land after stop_one returns");
    assert_indices_in_range(&engine);

    // Force a win by hand and check it is reported once
    for reel in 0..3 {
        engine.manual_set_symbol(reel, '7').unwrap();
    }
    engine.stop_one(0);
    assert_eq!(wins.load(Ordering::SeqCst), 1);
}

#[test]
fn alphabet_roundtrips_through_config() {
    let config = EngineConfig::from_json(r#"{ "alphabet": ["a", "b", "c"], "target": "b" }"#)
        .unwrap();
    let engine = ReelEngine::new(&config, ManualTicker::new()).unwrap();
    assert_eq!(engine.alphabet(), SymbolAlphabet::new(['a', 'b', 'c']).unwrap());
    assert_eq!(engine.target(), 'b');
}
