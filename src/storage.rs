//! Durable preference storage on top of `window.localStorage`.
//!
//! Writes are best-effort: an unavailable or full storage is logged and
//! swallowed, never surfaced to the timing flow. Reads are applied once at
//! startup; anything absent or unparsable decodes to the documented
//! defaults. The `override-sets` payload has two accepted shapes — the
//! current nested array-of-arrays and a legacy flat array, which is wrapped
//! into a single set so older data survives the format change.

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::{normalize_slot, OverrideSet};

pub const KEY_SETS: &str = "override-sets";
pub const KEY_MODE: &str = "override-mode";
pub const KEY_SINGLE_TARGET: &str = "single-override-target";
pub const KEY_UI_DARK: &str = "ui-dark";
pub const KEY_UI_LAPS_DESC: &str = "ui-laps-desc";

/// Override preferences as hydrated at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOverrides {
    pub sets: Vec<OverrideSet>,
    pub enabled: bool,
    pub single_target: Option<String>,
}

impl Default for PersistedOverrides {
    fn default() -> Self {
        Self {
            sets: Vec::new(),
            enabled: true,
            single_target: None,
        }
    }
}

/// The two accepted on-disk shapes of the `override-sets` payload. Slots are
/// kept as raw JSON values here because older writers stored plain numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSets {
    Nested(Vec<Vec<Value>>),
    Flat(Vec<Value>),
}

fn slot_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => normalize_slot(s),
        Value::Number(n) => normalize_slot(&n.to_string()),
        other => {
            warn!("non-scalar override slot {other}, normalizing to 00");
            normalize_slot("")
        }
    }
}

/// Decode a raw `override-sets` payload, migrating the legacy flat shape and
/// normalizing every slot regardless of source format. Unparsable payloads
/// decode to no sets at all.
pub fn decode_sets(raw: &str) -> Vec<OverrideSet> {
    match serde_json::from_str::<StoredSets>(raw) {
        Ok(StoredSets::Nested(sets)) => sets
            .iter()
            .map(|set| set.iter().map(slot_from_value).collect())
            .collect(),
        Ok(StoredSets::Flat(slots)) if !slots.is_empty() => {
            // Legacy format: one implicit set wrapping the whole list.
            vec![slots.iter().map(slot_from_value).collect()]
        }
        Ok(StoredSets::Flat(_)) => Vec::new(),
        Err(err) => {
            warn!("discarding unparsable {KEY_SETS} payload: {err}");
            Vec::new()
        }
    }
}

pub fn encode_sets(sets: &[OverrideSet]) -> String {
    serde_json::to_string(sets).unwrap_or_else(|_| "[]".to_string())
}

fn flag_from(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref() {
        Some("1") => true,
        Some("0") => false,
        _ => default,
    }
}

/// Read the full override configuration. Called once at startup.
pub fn load() -> PersistedOverrides {
    PersistedOverrides {
        sets: raw_get(KEY_SETS)
            .map(|raw| decode_sets(&raw))
            .unwrap_or_default(),
        enabled: flag_from(raw_get(KEY_MODE), true),
        single_target: raw_get(KEY_SINGLE_TARGET).map(|raw| normalize_slot(&raw)),
    }
}

/// Read a presentation flag (`"1"`/`"0"`), falling back to `default`.
pub fn load_flag(key: &str, default: bool) -> bool {
    flag_from(raw_get(key), default)
}

pub fn save_sets(sets: &[OverrideSet]) {
    raw_set(KEY_SETS, &encode_sets(sets));
}

pub fn save_flag(key: &str, value: bool) {
    raw_set(key, if value { "1" } else { "0" });
}

pub fn save_single_target(target: &str) {
    raw_set(KEY_SINGLE_TARGET, target);
}

pub fn clear_single_target() {
    raw_remove(KEY_SINGLE_TARGET);
}

// ──────────────────────────────────────────────────────────────────────────────
// Raw localStorage access. Non-wasm builds (the test harness) have no durable
// medium, so reads see nothing and writes vanish, matching the best-effort
// contract.

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    gloo_utils::window().local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
fn raw_get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

#[cfg(target_arch = "wasm32")]
fn raw_set(key: &str, value: &str) {
    match local_storage() {
        Some(store) => {
            if let Err(err) = store.set_item(key, value) {
                warn!("failed to persist {key}: {err:?}");
            }
        }
        None => warn!("localStorage unavailable, {key} not persisted"),
    }
}

#[cfg(target_arch = "wasm32")]
fn raw_remove(key: &str) {
    if let Some(store) = local_storage() {
        let _ = store.remove_item(key);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn raw_get(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
fn raw_set(_key: &str, _value: &str) {}

#[cfg(not(target_arch = "wasm32"))]
fn raw_remove(_key: &str) {}
