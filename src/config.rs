//! Application-level configuration constants.

// Scheduling quanta live with the core; the app owns the actual timers.
pub use stoper::defaults::{SINGLE_RELEASE_MS, TICK_MS};

// Captions (the widget ships in the original's Polish)
pub const APP_TITLE: &str = "Stoper";
pub const MODAL_TITLE: &str = "Rutyny";
pub const LABEL_START: &str = "ROZPOCZNIJ";
pub const LABEL_STOP: &str = "ZATRZYMAJ";
pub const LABEL_RESET: &str = "RESETUJ";
pub const LABEL_LAP: &str = "OKRĄŻENIE";
pub const LABEL_LAPS: &str = "Okrążenia:";
pub const LABEL_CLEAR_ALL: &str = "Wyczyść wszystkie";
