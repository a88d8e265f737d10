//! Dirty-state comparison.
//!
//! Decides whether the live editing state has diverged from the last
//! persisted snapshot. Only fields that round-trip through persistence
//! participate: UI-transient selection state is stripped before comparison,
//! so focus churn can never produce a false "unsaved changes" signal.
//! Comparison is deep structural equality over a cleaned JSON form (strings
//! trimmed, all-empty slot objects collapsed to null) so that legacy and
//! freshly-normalized renditions of the same content compare equal.

use serde_json::{Map, Value};

use crate::preset::schema::Preset;

/// Top-level fields that never round-trip through persistence.
const TRANSIENT_TOP_LEVEL: &[&str] = &["slotType", "slotIndex", "selectedSlots", "slotKey"];

/// Per-slot markers that never round-trip through persistence.
const TRANSIENT_SLOT_FIELDS: &[&str] = &["slot", "selected"];

/// Remove UI-transient top-level fields from a snapshot.
pub fn strip_transient(value: &Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(key, _)| !TRANSIENT_TOP_LEVEL.contains(&key.as_str()))
                .map(|(key, v)| (key.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn trim_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other.clone(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Clean one slot-like entry: drop transient markers, trim strings, and
/// collapse an all-empty entry to null.
fn clean_entry(value: &Value) -> Value {
    let Some(fields) = value.as_object() else {
        return trim_value(value);
    };

    let cleaned: Map<String, Value> = fields
        .iter()
        .filter(|(key, _)| !TRANSIENT_SLOT_FIELDS.contains(&key.as_str()))
        .map(|(key, v)| (key.clone(), trim_value(v)))
        .collect();

    if cleaned.values().all(is_blank) {
        Value::Null
    } else {
        Value::Object(cleaned)
    }
}

fn clean_list(value: Option<&Value>) -> Value {
    match value.and_then(Value::as_array) {
        Some(items) => Value::Array(items.iter().map(clean_entry).collect()),
        None => Value::Array(Vec::new()),
    }
}

fn clean_pair(value: Option<&Value>, first: &str, second: &str) -> Value {
    let mut out = Map::new();
    out.insert(
        first.to_string(),
        clean_list(value.and_then(|v| v.get(first))),
    );
    out.insert(
        second.to_string(),
        clean_list(value.and_then(|v| v.get(second))),
    );
    Value::Object(out)
}

fn clean_string(value: Option<&Value>) -> Value {
    match value {
        Some(Value::String(s)) => Value::String(s.trim().to_string()),
        _ => Value::String(String::new()),
    }
}

/// Reduce a preset snapshot to its comparison-relevant form.
pub fn clean_preset(value: &Value) -> Value {
    let stripped = strip_transient(value);

    let mut out = Map::new();
    out.insert(
        "presetName".to_string(),
        clean_string(stripped.get("presetName")),
    );
    out.insert(
        "presetNotes".to_string(),
        clean_string(stripped.get("presetNotes")),
    );
    out.insert(
        "inventorySlots".to_string(),
        clean_list(stripped.get("inventorySlots")),
    );
    out.insert(
        "equipmentSlots".to_string(),
        clean_list(stripped.get("equipmentSlots")),
    );
    out.insert(
        "relics".to_string(),
        clean_pair(stripped.get("relics"), "primaryRelics", "alternativeRelics"),
    );
    out.insert(
        "familiars".to_string(),
        clean_pair(
            stripped.get("familiars"),
            "primaryFamiliars",
            "alternativeFamiliars",
        ),
    );
    out.insert(
        "breakdown".to_string(),
        clean_list(stripped.get("breakdown")),
    );
    Value::Object(out)
}

/// Deep structural equality over the cleaned forms.
pub fn presets_equal(a: &Value, b: &Value) -> bool {
    clean_preset(a) == clean_preset(b)
}

fn signature(preset: &Preset) -> Value {
    let value = serde_json::to_value(preset).unwrap_or(Value::Null);
    clean_preset(&value)
}

/// Tracks divergence of the live preset from its persisted baseline.
///
/// `is_dirty` is three-valued: `None` before any baseline exists (so a
/// "saved" indicator is suppressed on first load), then `Some(true/false)`.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    baseline: Option<Value>,
    dirty: Option<bool>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the given preset as the clean baseline.
    pub fn mark_clean(&mut self, preset: &Preset) {
        self.baseline = Some(signature(preset));
        self.dirty = Some(false);
    }

    /// Re-evaluate dirtiness against the baseline. Call after every change
    /// to the live preset.
    pub fn observe(&mut self, preset: &Preset) -> Option<bool> {
        self.dirty = self
            .baseline
            .as_ref()
            .map(|baseline| signature(preset) != *baseline);
        self.dirty
    }

    pub fn is_dirty(&self) -> Option<bool> {
        self.dirty
    }

    /// Drop the baseline, returning to the pre-load state.
    pub fn reset(&mut self) {
        self.baseline = None;
        self.dirty = None;
    }
}
