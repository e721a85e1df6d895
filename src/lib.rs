//! Core logic for the Stoper stopwatch widget.
//!
//! Everything in here is plain state plus arithmetic: the ticking clock, the
//! operator-configured override store, the lap resolution rules that decide
//! whether a stop/lap records the true elapsed time or a forced value, and
//! the append-only lap ledger. Scheduling (the tick interval and the single
//! release timer) and rendering live in the application crate; durable
//! storage lives in [`storage`].

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

pub mod storage;

/// Fixed scheduling and value limits, in the clock's own units.
pub mod defaults {
    /// One tick of the running clock, in milliseconds.
    pub const TICK_MS: u32 = 10;
    /// Delay after a stop before an active single override is released.
    pub const SINGLE_RELEASE_MS: u32 = 30;
    /// Largest value a two-digit override slot can hold.
    pub const SLOT_MAX: u32 = 99;
}

static NON_DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").unwrap());

/// One ordered group of two-digit override slots, kept as normalized strings.
pub type OverrideSet = Vec<String>;

// ──────────────────────────────────────────────────────────────────────────────
// Clock arithmetic

/// An elapsed time split into the clock-face components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockParts {
    pub minutes: u32,
    /// Whole seconds within the current minute.
    pub seconds: u32,
    /// Natural centiseconds within the current second.
    pub centis: u32,
}

/// Decompose milliseconds into minutes, seconds-in-minute and centiseconds.
pub fn split_clock(ms: u32) -> ClockParts {
    ClockParts {
        minutes: ms / 60_000,
        seconds: (ms / 1_000) % 60,
        centis: (ms % 1_000) / 10,
    }
}

/// Fold clock-face components back into milliseconds, saturating like
/// [`Stopwatch::tick`] does near the top of the `u32` range.
pub fn join_clock(minutes: u32, seconds: u32, centis: u32) -> u32 {
    minutes
        .saturating_mul(60_000)
        .saturating_add(seconds.saturating_mul(1_000))
        .saturating_add(centis.saturating_mul(10))
}

/// Format milliseconds as the `MM:SS.CC` clock face.
pub fn format_clock(ms: u32) -> String {
    let parts = split_clock(ms);
    format!(
        "{:02}:{:02}.{:02}",
        parts.minutes, parts.seconds, parts.centis
    )
}

/// Normalize raw slot input: keep digits only, fall back to zero for
/// non-numeric text, clamp into `0..=99`, zero-pad to width two.
pub fn normalize_slot(raw: &str) -> String {
    let digits = NON_DIGIT_REGEX.replace_all(raw, "");
    let value = match digits.parse::<u64>() {
        Ok(v) => v.min(u64::from(defaults::SLOT_MAX)),
        // All-digit text too long for u64 is still a huge number.
        Err(_) if digits.is_empty() => 0,
        Err(_) => u64::from(defaults::SLOT_MAX),
    };
    format!("{value:02}")
}

// ──────────────────────────────────────────────────────────────────────────────
// Timing engine

/// Elapsed-time accumulator driven by an external fixed-quantum tick.
///
/// The recurring callback itself is owned by the application; this struct
/// only holds the running flag and the accumulated milliseconds.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stopwatch {
    elapsed_ms: u32,
    running: bool,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Idempotent: starting a running clock is a no-op.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Idempotent: stopping a stopped clock is a no-op.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Zero the clock and stop it, unconditionally.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.running = false;
    }

    /// Advance by one quantum. Ignored while stopped, so a tick callback
    /// racing a stop event cannot move the clock afterwards.
    pub fn tick(&mut self, quantum_ms: u32) {
        if self.running {
            self.elapsed_ms = self.elapsed_ms.saturating_add(quantum_ms);
        }
    }

    /// Rewrite the displayed time. A stop event points the clock at its
    /// resolved value, so the face shows what was recorded.
    pub fn force_elapsed(&mut self, ms: u32) {
        self.elapsed_ms = ms;
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Override store

/// The optional single timed override and its active phase.
///
/// Invariant: `phase_active` implies `target` is set; clearing the target
/// forces the phase inactive.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct SingleOverride {
    target: Option<String>,
    phase_active: bool,
}

/// Operator-configured override state: the ordered override sets with their
/// consumption cursor, the single timed override, and the global mode switch.
///
/// Every mutating operation persists through [`storage`] on a best-effort
/// basis; a failed write never rolls back the in-memory change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideStore {
    sets: Vec<OverrideSet>,
    cursor: usize,
    single: SingleOverride,
    enabled: bool,
}

impl Default for OverrideStore {
    fn default() -> Self {
        Self {
            sets: Vec::new(),
            cursor: 0,
            single: SingleOverride::default(),
            enabled: true,
        }
    }
}

impl OverrideStore {
    /// Hydrate from durable storage. Absent or corrupted data falls back to
    /// empty sets with the mode enabled; a persisted target starts its phase
    /// active, as if it had just been entered.
    pub fn restore() -> Self {
        let persisted = storage::load();
        let single = match persisted.single_target {
            Some(target) => SingleOverride {
                target: Some(target),
                phase_active: true,
            },
            None => SingleOverride::default(),
        };
        Self {
            sets: persisted.sets,
            cursor: 0,
            single,
            enabled: persisted.enabled,
        }
    }

    pub fn sets(&self) -> &[OverrideSet] {
        &self.sets
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn single_target(&self) -> Option<&str> {
        self.single.target.as_deref()
    }

    pub fn single_phase_active(&self) -> bool {
        self.single.phase_active
    }

    /// The override sequence consumed by the cursor: all sets, in order,
    /// flattened. Derived on demand, never stored.
    pub fn flattened(&self) -> Vec<String> {
        self.sets.iter().flatten().cloned().collect()
    }

    pub fn flattened_len(&self) -> usize {
        self.sets.iter().map(Vec::len).sum()
    }

    /// Replace the override sets. Every slot is normalized and the cursor is
    /// clamped to the new flattened length, so replacing with identical sets
    /// leaves consumption progress untouched.
    pub fn set_sets(&mut self, sets: Vec<OverrideSet>) {
        self.sets = sets
            .into_iter()
            .map(|set| set.iter().map(|slot| normalize_slot(slot)).collect())
            .collect();
        let len = self.flattened_len();
        if self.cursor > len {
            self.cursor = len;
        }
        storage::save_sets(&self.sets);
    }

    /// Set or clear the single override target. Setting (re)activates the
    /// phase; clearing forces it inactive. `None` and blank input both clear.
    pub fn set_single_target(&mut self, raw: Option<&str>) {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => {
                let target = normalize_slot(text);
                storage::save_single_target(&target);
                self.single = SingleOverride {
                    target: Some(target),
                    phase_active: true,
                };
            }
            None => {
                storage::clear_single_target();
                self.single = SingleOverride::default();
            }
        }
    }

    /// Flip the global override switch.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        storage::save_flag(storage::KEY_MODE, enabled);
    }

    /// Move the cursor one slot forward, saturating at the sequence length.
    pub fn advance_cursor(&mut self) {
        self.cursor = (self.cursor + 1).min(self.flattened_len());
    }

    /// Release timer fired: leave the phase without clearing the target.
    pub fn deactivate_single(&mut self) {
        self.single.phase_active = false;
    }

    /// Decide the value to record for a stop or lap event.
    ///
    /// Precedence, applied at most once per event:
    /// 1. overrides disabled — the true elapsed time, no state change;
    /// 2. single override with an active phase — seconds are kept and the
    ///    centiseconds become `clamp(target - seconds, 0, 99)`; the
    ///    sequential cursor does not move;
    /// 3. an unconsumed sequential slot — its value becomes the
    ///    centiseconds and the cursor advances;
    /// 4. otherwise the true elapsed time.
    ///
    /// A target that does not parse as a number skips branch 2 entirely; a
    /// sequential slot that does not parse falls back to the natural
    /// centiseconds but still consumes its position.
    pub fn resolve(&mut self, elapsed_ms: u32) -> u32 {
        if !self.enabled {
            return elapsed_ms;
        }
        let parts = split_clock(elapsed_ms);

        if self.single.phase_active {
            if let Some(target) = self
                .single
                .target
                .as_deref()
                .and_then(|t| t.parse::<i64>().ok())
            {
                let centis = (target - i64::from(parts.seconds)).clamp(0, 99) as u32;
                debug!(
                    "single override {target} over {}s -> {centis} centis",
                    parts.seconds
                );
                return join_clock(parts.minutes, parts.seconds, centis);
            }
        }

        if let Some(slot) = self.sets.iter().flatten().nth(self.cursor).cloned() {
            let centis = slot
                .parse::<u32>()
                .map(|v| v.min(defaults::SLOT_MAX))
                .unwrap_or(parts.centis);
            self.advance_cursor();
            debug!(
                "sequential slot {slot:?} -> {centis} centis, cursor {}",
                self.cursor
            );
            return join_clock(parts.minutes, parts.seconds, centis);
        }

        elapsed_ms
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Lap ledger

/// One recorded lap: its 1-based sequence number and the resolved time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapRecord {
    pub number: usize,
    pub recorded_ms: u32,
}

/// Append-only collection of resolved lap values, cleared only by reset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LapLedger {
    records: Vec<LapRecord>,
}

impl LapLedger {
    /// Append a resolved value under the next sequence number.
    pub fn append(&mut self, recorded_ms: u32) -> usize {
        let number = self.records.len() + 1;
        self.records.push(LapRecord {
            number,
            recorded_ms,
        });
        number
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records in insertion order; reversal is a presentation concern.
    pub fn records(&self) -> &[LapRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_sets(sets: Vec<Vec<&str>>) -> OverrideStore {
        let mut store = OverrideStore::default();
        store.set_sets(
            sets.into_iter()
                .map(|set| set.into_iter().map(str::to_string).collect())
                .collect(),
        );
        store
    }

    #[test]
    fn clock_splits_and_rejoins() {
        let parts = split_clock(65_432);
        assert_eq!(parts.minutes, 1);
        assert_eq!(parts.seconds, 5);
        assert_eq!(parts.centis, 43);
        assert_eq!(join_clock(1, 5, 43), 65_430);
        assert_eq!(format_clock(65_432), "01:05.43");
        assert_eq!(format_clock(0), "00:00.00");
    }

    #[test]
    fn join_clock_saturates_at_the_top_of_the_range() {
        // u32::MAX ms is 71582 minutes, 47 s; forcing 99 centis would land
        // just past the range and must clamp instead of overflowing.
        assert_eq!(join_clock(71_582, 47, 99), u32::MAX);
        let mut store = store_with_sets(vec![vec!["99"]]);
        assert_eq!(store.resolve(u32::MAX), u32::MAX);
        assert_eq!(store.cursor(), 1);
    }

    #[test]
    fn slot_normalization_clamps_pads_and_defaults() {
        assert_eq!(normalize_slot("7"), "07");
        assert_eq!(normalize_slot("07"), "07");
        assert_eq!(normalize_slot("150"), "99");
        assert_eq!(normalize_slot("abc"), "00");
        assert_eq!(normalize_slot(""), "00");
        assert_eq!(normalize_slot(" 4 2 "), "42");
        assert_eq!(normalize_slot("99999999999999999999999"), "99");
    }

    #[test]
    fn stopwatch_lifecycle() {
        let mut sw = Stopwatch::new();
        sw.tick(10);
        assert_eq!(sw.elapsed_ms(), 0, "stopped clock ignores ticks");
        sw.start();
        sw.start();
        sw.tick(10);
        sw.tick(10);
        assert_eq!(sw.elapsed_ms(), 20);
        sw.stop();
        sw.tick(10);
        assert_eq!(sw.elapsed_ms(), 20);
        sw.start();
        sw.tick(10);
        sw.reset();
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(!sw.running());
    }

    #[test]
    fn disabled_mode_passes_time_through_untouched() {
        let mut store = store_with_sets(vec![vec!["07"]]);
        store.set_single_target(Some("25"));
        store.set_enabled(false);
        for ms in [0, 1, 999, 65_432, 3_600_000] {
            assert_eq!(store.resolve(ms), ms);
        }
        assert_eq!(store.cursor(), 0, "disabled resolve must not consume");
        assert!(store.single_phase_active());
    }

    #[test]
    fn sequential_slot_replaces_centis_and_advances_cursor() {
        // 1:05.43 against a single-set sequence ["07"].
        let mut store = store_with_sets(vec![vec!["07"]]);
        assert_eq!(store.resolve(65_432), 65_070);
        assert_eq!(store.cursor(), 1);
        // Sequence consumed: the next event records the true time.
        assert_eq!(store.resolve(65_432), 65_432);
        assert_eq!(store.cursor(), 1);
    }

    #[test]
    fn sets_flatten_in_order_across_set_boundaries() {
        let mut store = store_with_sets(vec![vec!["10", "20"], vec!["30"]]);
        assert_eq!(store.flattened(), vec!["10", "20", "30"]);
        assert_eq!(store.resolve(1_000), 1_100);
        assert_eq!(store.resolve(1_000), 1_200);
        assert_eq!(store.resolve(1_000), 1_300);
        assert_eq!(store.resolve(1_000), 1_000);
        assert_eq!(store.cursor(), 3);
    }

    #[test]
    fn single_override_composes_subtractively() {
        // Target 25 at 8 whole seconds keeps the seconds and derives 17.
        let mut store = OverrideStore::default();
        store.set_single_target(Some("25"));
        assert_eq!(store.resolve(8_000), 8_170);
        // Target below the seconds clamps to zero, no wrap.
        store.set_single_target(Some("5"));
        assert_eq!(store.resolve(8_000), 8_000);
        // Upper clamp.
        store.set_single_target(Some("99"));
        assert_eq!(store.resolve(0), 990);
    }

    #[test]
    fn single_override_outranks_sequential_sets() {
        let mut store = store_with_sets(vec![vec!["07"]]);
        store.set_single_target(Some("25"));
        assert_eq!(store.resolve(8_000), 8_170);
        assert_eq!(store.cursor(), 0, "single branch must not touch the cursor");
    }

    #[test]
    fn deactivated_phase_falls_back_to_sequential_then_true_time() {
        // After the release timer fires the target survives but the phase is
        // gone, so resolution falls through to the sets.
        let mut store = store_with_sets(vec![vec!["07"]]);
        store.set_single_target(Some("25"));
        store.deactivate_single();
        assert_eq!(store.single_target(), Some("25"));
        assert!(!store.single_phase_active());
        assert_eq!(store.resolve(8_000), 8_070);
        assert_eq!(store.resolve(8_000), 8_000);
    }

    #[test]
    fn late_release_only_clears_the_phase() {
        // A release firing after unrelated events (or not at all) may only
        // retire the phase; target, sets and cursor stay put.
        let mut store = store_with_sets(vec![vec!["07"]]);
        store.set_single_target(Some("25"));
        store.resolve(8_000);
        store.deactivate_single();
        store.deactivate_single();
        assert_eq!(store.single_target(), Some("25"));
        assert_eq!(store.cursor(), 0);
        assert_eq!(store.flattened(), vec!["07"]);
    }

    #[test]
    fn clearing_target_forces_phase_inactive() {
        let mut store = OverrideStore::default();
        store.set_single_target(Some("25"));
        assert!(store.single_phase_active());
        store.set_single_target(None);
        assert_eq!(store.single_target(), None);
        assert!(!store.single_phase_active());
        // Blank text clears too.
        store.set_single_target(Some("25"));
        store.set_single_target(Some("   "));
        assert_eq!(store.single_target(), None);
        assert!(!store.single_phase_active());
    }

    #[test]
    fn single_target_normalizes_like_a_slot() {
        let mut store = OverrideStore::default();
        store.set_single_target(Some("7"));
        assert_eq!(store.single_target(), Some("07"));
        store.set_single_target(Some("120"));
        assert_eq!(store.single_target(), Some("99"));
        store.set_single_target(Some("x"));
        assert_eq!(store.single_target(), Some("00"));
    }

    #[test]
    fn set_sets_is_idempotent_for_cursor_and_sequence() {
        let sets: Vec<OverrideSet> = vec![vec!["07".into(), "12".into()], vec!["99".into()]];
        let mut store = OverrideStore::default();
        store.set_sets(sets.clone());
        store.resolve(1_000);
        store.resolve(1_000);
        let flattened = store.flattened();
        store.set_sets(sets);
        assert_eq!(store.flattened(), flattened);
        assert_eq!(store.cursor(), 2);
    }

    #[test]
    fn shrinking_sets_clamps_cursor() {
        let mut store = store_with_sets(vec![vec!["01", "02", "03"]]);
        store.resolve(0);
        store.resolve(0);
        store.resolve(0);
        assert_eq!(store.cursor(), 3);
        store.set_sets(vec![vec!["01".into()]]);
        assert_eq!(store.cursor(), 1);
        store.set_sets(Vec::new());
        assert_eq!(store.cursor(), 0);
    }

    #[test]
    fn advance_cursor_saturates() {
        let mut store = store_with_sets(vec![vec!["01"]]);
        store.advance_cursor();
        store.advance_cursor();
        store.advance_cursor();
        assert_eq!(store.cursor(), 1);
    }

    #[test]
    fn set_sets_normalizes_every_slot() {
        let mut store = OverrideStore::default();
        store.set_sets(vec![vec!["7".into(), "abc".into(), "150".into()]]);
        assert_eq!(store.flattened(), vec!["07", "00", "99"]);
    }

    #[test]
    fn ledger_appends_in_order_and_clears() {
        let mut laps = LapLedger::default();
        assert!(laps.is_empty());
        assert_eq!(laps.append(1_000), 1);
        assert_eq!(laps.append(2_000), 2);
        let numbers: Vec<usize> = laps.records().iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(laps.records()[1].recorded_ms, 2_000);
        laps.clear();
        assert!(laps.is_empty());
        assert_eq!(laps.append(3_000), 1, "numbering restarts after clear");
    }
}
