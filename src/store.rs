//! Thread-local session store for the live widget state.
//!
//! The session survives component re-renders: the ticking stopwatch, the lap
//! ledger and the override store live here rather than in hook state, and the
//! component asks for a redraw after mutating them. Thread-local to avoid
//! synchronization overhead in WASM.

use std::cell::RefCell;

use stoper::{LapLedger, OverrideStore, Stopwatch};

/// Live widget state: the clock, the recorded laps, and operator overrides.
#[derive(Debug)]
pub struct Session {
    pub stopwatch: Stopwatch,
    pub laps: LapLedger,
    pub overrides: OverrideStore,
}

impl Session {
    /// Fresh clock and ledger; overrides hydrate from durable storage.
    fn restore() -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            laps: LapLedger::default(),
            overrides: OverrideStore::restore(),
        }
    }
}

thread_local! {
    pub static SESSION: RefCell<Session> = RefCell::new(Session::restore());
}
