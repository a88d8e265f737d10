//! Coercing schema validation.
//!
//! Coercion runs first and is deliberately permissive: slot arrays are
//! resized to their fixed lengths, absent fields take their zero values, and
//! the relic/familiar sub-objects are always materialized so consumers can
//! iterate unconditionally. Only what survives coercion is validated hard;
//! those failures carry a path-qualified violation list.

use serde_json::Value;

use crate::error::{PresetError, PresetResult};
use crate::preset::schema::{
    BreakdownEntry, FamiliarSlots, Preset, RelicSlots, SlotRef, SlotType, EQUIPMENT_SLOT_COUNT,
    INVENTORY_SLOT_COUNT,
};

/// Where validation is running. The persistence boundary is stricter: it
/// additionally requires a non-empty preset name, so legacy documents with
/// blank names still import while an explicit save is rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Normalization,
    Persistence,
}

/// Validate a candidate document, coercing it into a canonical [`Preset`].
pub fn validate_at(candidate: &Value, boundary: Boundary) -> PresetResult<Preset> {
    let Some(obj) = candidate.as_object() else {
        return Err(PresetError::schema(vec![
            "$: expected a preset object".to_string()
        ]));
    };

    let mut violations = Vec::new();

    let preset_name = coerce_string(obj.get("presetName"), "presetName", &mut violations);
    let preset_notes = coerce_string(obj.get("presetNotes"), "presetNotes", &mut violations);

    let mut inventory_slots = coerce_slot_list(
        obj.get("inventorySlots"),
        "inventorySlots",
        &mut violations,
    );
    resize_slots(&mut inventory_slots, INVENTORY_SLOT_COUNT);

    let mut equipment_slots = coerce_slot_list(
        obj.get("equipmentSlots"),
        "equipmentSlots",
        &mut violations,
    );
    resize_slots(&mut equipment_slots, EQUIPMENT_SLOT_COUNT);

    let relics = coerce_relics(obj.get("relics"), &mut violations);
    let familiars = coerce_familiars(obj.get("familiars"), &mut violations);
    let breakdown = coerce_breakdown(obj.get("breakdown"), &mut violations);

    if !violations.is_empty() {
        return Err(PresetError::schema(violations));
    }

    if boundary == Boundary::Persistence && preset_name.trim().is_empty() {
        return Err(PresetError::validation("preset name must not be empty"));
    }

    Ok(Preset {
        preset_name,
        preset_notes,
        inventory_slots,
        equipment_slots,
        relics,
        familiars,
        breakdown,
    })
}

fn coerce_string(value: Option<&Value>, path: &str, violations: &mut Vec<String>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            violations.push(format!("{path}: expected a string"));
            String::new()
        }
    }
}

/// Coerce one slot entry. Strings are taken as the id itself; objects are
/// element-wise defaulted; null becomes unassigned.
fn coerce_slot(value: &Value, path: &str, violations: &mut Vec<String>) -> SlotRef {
    match value {
        Value::Null => SlotRef::empty(),
        Value::String(s) => SlotRef::new(s.clone()),
        Value::Object(fields) => match fields.get("id") {
            None | Some(Value::Null) => SlotRef::empty(),
            Some(Value::String(id)) => SlotRef::new(id.clone()),
            Some(_) => {
                violations.push(format!("{path}.id: expected a string"));
                SlotRef::empty()
            }
        },
        _ => {
            violations.push(format!("{path}: expected a slot object"));
            SlotRef::empty()
        }
    }
}

fn coerce_slot_list(
    value: Option<&Value>,
    path: &str,
    violations: &mut Vec<String>,
) -> Vec<SlotRef> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| coerce_slot(item, &format!("{path}[{i}]"), violations))
            .collect(),
        Some(_) => {
            violations.push(format!("{path}: expected an array"));
            Vec::new()
        }
    }
}

/// Resize a slot array to its fixed length: pad with unassigned references,
/// discard excess entries.
fn resize_slots(slots: &mut Vec<SlotRef>, len: usize) {
    slots.resize_with(len, SlotRef::empty);
}

fn coerce_relics(value: Option<&Value>, violations: &mut Vec<String>) -> RelicSlots {
    match value {
        None | Some(Value::Null) => RelicSlots::default(),
        Some(Value::Object(fields)) => RelicSlots {
            primary_relics: coerce_slot_list(
                fields.get("primaryRelics"),
                "relics.primaryRelics",
                violations,
            ),
            alternative_relics: coerce_slot_list(
                fields.get("alternativeRelics"),
                "relics.alternativeRelics",
                violations,
            ),
        },
        Some(_) => {
            violations.push("relics: expected an object".to_string());
            RelicSlots::default()
        }
    }
}

fn coerce_familiars(value: Option<&Value>, violations: &mut Vec<String>) -> FamiliarSlots {
    match value {
        None | Some(Value::Null) => FamiliarSlots::default(),
        Some(Value::Object(fields)) => FamiliarSlots {
            primary_familiars: coerce_slot_list(
                fields.get("primaryFamiliars"),
                "familiars.primaryFamiliars",
                violations,
            ),
            alternative_familiars: coerce_slot_list(
                fields.get("alternativeFamiliars"),
                "familiars.alternativeFamiliars",
                violations,
            ),
        },
        Some(_) => {
            violations.push("familiars: expected an object".to_string());
            FamiliarSlots::default()
        }
    }
}

fn coerce_breakdown(value: Option<&Value>, violations: &mut Vec<String>) -> Vec<BreakdownEntry> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            violations.push("breakdown: expected an array".to_string());
            return Vec::new();
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Some(fields) = item.as_object() else {
            violations.push(format!("breakdown[{i}]: expected an annotation object"));
            continue;
        };

        let slot_type = match fields.get("slotType").and_then(Value::as_str) {
            Some("inventory") => SlotType::Inventory,
            Some("equipment") => SlotType::Equipment,
            _ => {
                violations.push(format!(
                    "breakdown[{i}].slotType: expected \"inventory\" or \"equipment\""
                ));
                continue;
            }
        };

        let slot_index = match fields.get("slotIndex") {
            None | Some(Value::Null) => 0,
            Some(v) => match v.as_u64() {
                Some(n) => n as usize,
                None => {
                    violations.push(format!(
                        "breakdown[{i}].slotIndex: expected a non-negative integer"
                    ));
                    continue;
                }
            },
        };

        let description = coerce_string(
            fields.get("description"),
            &format!("breakdown[{i}].description"),
            violations,
        );

        entries.push(BreakdownEntry {
            slot_type,
            slot_index,
            description,
        });
    }

    entries
}
