//! Raw preset normalization.
//!
//! Takes an externally-supplied preset document of unknown or legacy shape
//! and produces a canonical [`Preset`]. Slot identifiers are resolved through
//! the entity catalog; legacy per-slot annotations are migrated into the
//! unified breakdown list. Normalization is total over slot content: a
//! malformed slot entry becomes an unassigned reference, never an error.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::catalog::{CatalogService, EntityCatalog};
use crate::error::{PresetError, PresetResult};
use crate::preset::schema::Preset;
use crate::preset::validate::{validate_at, Boundary};

/// Recognized raw document shapes.
///
/// Classification happens once, up front, and migration dispatches on the
/// result instead of optional-chaining through the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPresetDocument<'a> {
    /// The document carries its own top-level `breakdown` field, which passes
    /// through verbatim (new format wins; legacy per-slot notes are ignored).
    Annotated(&'a Value),
    /// Pre-unification document: annotations, if any, live in per-slot
    /// `breakdownNotes` fields and are synthesized into a breakdown list.
    LegacyPerSlotNotes(&'a Value),
}

impl<'a> RawPresetDocument<'a> {
    /// Classify a raw document by its annotation shape.
    pub fn classify(raw: &'a Value) -> Self {
        match raw.get("breakdown") {
            Some(Value::Array(entries)) if !entries.is_empty() => Self::Annotated(raw),
            // A present but non-array breakdown passes through so the
            // validator can report it instead of silently dropping data.
            Some(v) if !v.is_null() && !v.is_array() => Self::Annotated(raw),
            _ => Self::LegacyPerSlotNotes(raw),
        }
    }

    fn raw(&self) -> &'a Value {
        match *self {
            Self::Annotated(raw) | Self::LegacyPerSlotNotes(raw) => raw,
        }
    }

    /// Produce the migrated candidate document for validation.
    fn migrate(&self, catalog: &EntityCatalog) -> Value {
        let raw = self.raw();

        let breakdown = match *self {
            Self::Annotated(raw) => raw
                .get("breakdown")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            Self::LegacyPerSlotNotes(raw) => Value::Array(synthesize_breakdown(raw)),
        };

        json!({
            "presetName": raw.get("presetName").cloned().unwrap_or(Value::Null),
            "presetNotes": raw.get("presetNotes").cloned().unwrap_or(Value::Null),
            "inventorySlots": normalize_slot_list(raw.get("inventorySlots"), catalog),
            "equipmentSlots": normalize_slot_list(raw.get("equipmentSlots"), catalog),
            "relics": {
                "primaryRelics": normalize_slot_list(
                    raw.get("relics").and_then(|r| r.get("primaryRelics")),
                    catalog,
                ),
                "alternativeRelics": normalize_slot_list(
                    raw.get("relics").and_then(|r| r.get("alternativeRelics")),
                    catalog,
                ),
            },
            "familiars": {
                "primaryFamiliars": normalize_slot_list(
                    raw.get("familiars").and_then(|f| f.get("primaryFamiliars")),
                    catalog,
                ),
                "alternativeFamiliars": normalize_slot_list(
                    raw.get("familiars").and_then(|f| f.get("alternativeFamiliars")),
                    catalog,
                ),
            },
            "breakdown": breakdown,
        })
    }
}

/// Extract the raw identifier from a slot entry, in priority order: an
/// explicit `id` field, a legacy `label` field, or the entry itself when it
/// is a plain string.
fn extract_slot_id(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(fields) => match fields.get("id") {
            Some(Value::String(s)) => Some(s),
            // A present non-null id of the wrong type yields no identifier;
            // only a null/absent id falls through to the legacy label.
            Some(Value::Null) | None => match fields.get("label") {
                Some(Value::String(s)) => Some(s),
                _ => None,
            },
            Some(_) => None,
        },
        _ => None,
    }
}

fn normalize_slot(value: &Value, catalog: &EntityCatalog) -> Value {
    let raw_id = extract_slot_id(value).unwrap_or("");
    if raw_id.is_empty() {
        json!({ "id": "" })
    } else {
        json!({ "id": catalog.resolve(raw_id) })
    }
}

fn normalize_slot_list(value: Option<&Value>, catalog: &EntityCatalog) -> Value {
    match value.and_then(Value::as_array) {
        Some(items) => Value::Array(
            items
                .iter()
                .map(|item| normalize_slot(item, catalog))
                .collect(),
        ),
        None => Value::Array(Vec::new()),
    }
}

/// Build a breakdown list from legacy per-slot `breakdownNotes` fields.
fn synthesize_breakdown(raw: &Value) -> Vec<Value> {
    let mut entries = Vec::new();
    for (key, slot_type) in [
        ("inventorySlots", "inventory"),
        ("equipmentSlots", "equipment"),
    ] {
        let Some(slots) = raw.get(key).and_then(Value::as_array) else {
            continue;
        };
        for (index, slot) in slots.iter().enumerate() {
            if let Some(notes) = slot.get("breakdownNotes").and_then(Value::as_str) {
                if !notes.trim().is_empty() {
                    entries.push(json!({
                        "slotType": slot_type,
                        "slotIndex": index,
                        "description": notes,
                    }));
                }
            }
        }
    }
    entries
}

/// Normalizes raw preset documents against the entity catalog.
pub struct Normalizer {
    catalog: Arc<CatalogService>,
}

impl Normalizer {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self { catalog }
    }

    /// Normalize an arbitrary raw document into a canonical preset.
    ///
    /// Awaits the catalog (triggering its fetch on first use). Failures are
    /// surfaced as [`PresetError::NormalizationFailed`]; the caller's prior
    /// state is never touched.
    pub async fn normalize(&self, raw: &Value) -> PresetResult<Preset> {
        let catalog = self
            .catalog
            .load()
            .await
            .map_err(|e| PresetError::normalization(format!("entity catalog unavailable: {e}")))?;

        let migrated = RawPresetDocument::classify(raw).migrate(&catalog);

        validate_at(&migrated, Boundary::Normalization).map_err(|e| match e {
            PresetError::SchemaViolation { violations } => PresetError::normalization(format!(
                "document failed validation after migration: {}",
                violations.join("; ")
            )),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::RawCatalogDocument;
    use crate::catalog::CatalogFetcher;
    use crate::config::CatalogConfig;
    use crate::preset::schema::{SlotType, EQUIPMENT_SLOT_COUNT, INVENTORY_SLOT_COUNT};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use serde_json::json;

    struct StaticFetcher {
        fail: bool,
    }

    #[async_trait]
    impl CatalogFetcher for StaticFetcher {
        async fn fetch(&self) -> PresetResult<RawCatalogDocument> {
            if self.fail {
                return Err(PresetError::transport("offline"));
            }
            serde_json::from_value(json!({
                "categories": [
                    {"name": "Potions", "emojis": [
                        {"id": "sara_brew", "name": "Saradomin brew", "preset_type": "item",
                         "id_aliases": ["Saradomin Brew"]},
                        {"id": "super_restore", "name": "Super restore", "preset_type": "item"}
                    ]},
                    {"name": "Familiars", "emojis": [
                        {"id": "steel_titan", "name": "Steel titan", "preset_type": "familiar",
                         "id_aliases": ["titan"]}
                    ]}
                ]
            }))
            .map_err(PresetError::from)
        }
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(CatalogService::with_fetcher(
            Arc::new(StaticFetcher { fail: false }),
            CatalogConfig::default(),
        )))
    }

    fn failing_normalizer() -> Normalizer {
        Normalizer::new(Arc::new(CatalogService::with_fetcher(
            Arc::new(StaticFetcher { fail: true }),
            CatalogConfig::default(),
        )))
    }

    #[tokio::test]
    async fn test_slot_identifier_priority() {
        let preset = normalizer()
            .normalize(&json!({
                "inventorySlots": [
                    { "id": "sara_brew" },
                    { "label": "Saradomin Brew" },
                    "super_restore",
                    { "name": "no usable identifier" },
                    null,
                    42
                ]
            }))
            .await
            .unwrap();

        assert_eq!(preset.inventory_slots[0].id, "sara_brew");
        // Legacy label resolves through the alias table.
        assert_eq!(preset.inventory_slots[1].id, "sara_brew");
        assert_eq!(preset.inventory_slots[2].id, "super_restore");
        assert_eq!(preset.inventory_slots[3].id, "");
        assert_eq!(preset.inventory_slots[4].id, "");
        assert_eq!(preset.inventory_slots[5].id, "");
    }

    #[tokio::test]
    async fn test_unknown_identifier_passes_through() {
        let preset = normalizer()
            .normalize(&json!({ "inventorySlots": [{ "id": "Removed Item" }] }))
            .await
            .unwrap();
        // Preserved verbatim (lower-cased), never dropped.
        assert_eq!(preset.inventory_slots[0].id, "removed item");
    }

    #[tokio::test]
    async fn test_fixed_shape_regardless_of_input_length() {
        for len in [0usize, 5, 28, 40] {
            let slots: Vec<Value> = (0..len).map(|_| json!({ "id": "sara_brew" })).collect();
            let preset = normalizer()
                .normalize(&json!({ "inventorySlots": slots }))
                .await
                .unwrap();
            assert_eq!(preset.inventory_slots.len(), INVENTORY_SLOT_COUNT);
            assert_eq!(preset.equipment_slots.len(), EQUIPMENT_SLOT_COUNT);
        }
    }

    #[tokio::test]
    async fn test_relics_and_familiars_default_to_empty() {
        let preset = normalizer().normalize(&json!({})).await.unwrap();
        assert!(preset.relics.primary_relics.is_empty());
        assert!(preset.relics.alternative_relics.is_empty());
        assert!(preset.familiars.primary_familiars.is_empty());
        assert!(preset.familiars.alternative_familiars.is_empty());
    }

    #[tokio::test]
    async fn test_legacy_notes_migration() {
        let mut slots = vec![json!({ "id": "" }); 5];
        slots[3] = json!({ "id": "sara_brew", "breakdownNotes": "note" });
        let preset = normalizer()
            .normalize(&json!({ "inventorySlots": slots }))
            .await
            .unwrap();

        assert_eq!(preset.breakdown.len(), 1);
        let entry = &preset.breakdown[0];
        assert_eq!(entry.slot_type, SlotType::Inventory);
        assert_eq!(entry.slot_index, 3);
        assert_eq!(entry.description, "note");
    }

    #[tokio::test]
    async fn test_equipment_notes_tagged_with_type() {
        let preset = normalizer()
            .normalize(&json!({
                "equipmentSlots": [{ "id": "x", "breakdownNotes": "helm note" }]
            }))
            .await
            .unwrap();
        assert_eq!(preset.breakdown.len(), 1);
        assert_eq!(preset.breakdown[0].slot_type, SlotType::Equipment);
        assert_eq!(preset.breakdown[0].slot_index, 0);
    }

    #[tokio::test]
    async fn test_existing_breakdown_wins_over_legacy_notes() {
        let preset = normalizer()
            .normalize(&json!({
                "inventorySlots": [{ "id": "sara_brew", "breakdownNotes": "stale" }],
                "breakdown": [
                    { "slotType": "equipment", "slotIndex": 2, "description": "kept" }
                ]
            }))
            .await
            .unwrap();

        // New format wins verbatim; no merge with per-slot notes.
        assert_eq!(preset.breakdown.len(), 1);
        assert_eq!(preset.breakdown[0].slot_type, SlotType::Equipment);
        assert_eq!(preset.breakdown[0].description, "kept");
    }

    #[tokio::test]
    async fn test_blank_notes_do_not_synthesize_entries() {
        let preset = normalizer()
            .normalize(&json!({
                "inventorySlots": [{ "id": "sara_brew", "breakdownNotes": "   " }]
            }))
            .await
            .unwrap();
        assert!(preset.breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_normalization_is_idempotent() {
        let raw = json!({
            "presetName": "Kerapac duo",
            "inventorySlots": [{ "label": "Saradomin Brew" }, "unknown thing"],
            "relics": { "primaryRelics": [{ "id": "conservation_of_energy" }] },
            "familiars": { "primaryFamiliars": [{ "id": "titan" }] }
        });
        let n = normalizer();
        let once = n.normalize(&raw).await.unwrap();
        let twice = n
            .normalize(&serde_json::to_value(&once).unwrap())
            .await
            .unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_catalog_unavailable_is_normalization_failure() {
        let err = failing_normalizer()
            .normalize(&json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, PresetError::NormalizationFailed(_)));
    }

    #[tokio::test]
    async fn test_corrupt_subshape_is_normalization_failure() {
        // A non-array breakdown survives migration verbatim and is rejected
        // by validation inside the normalizer.
        let err = normalizer()
            .normalize(&json!({ "breakdown": "not a list" }))
            .await
            .unwrap_err();
        assert!(matches!(err, PresetError::NormalizationFailed(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Normalization always yields the fixed shape for arbitrary slot
        /// array lengths.
        #[test]
        fn prop_normalized_shape_is_fixed(len in 0usize..60) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let slots: Vec<Value> = (0..len).map(|_| json!({ "id": "sara_brew" })).collect();
            let preset = rt
                .block_on(normalizer().normalize(&json!({ "inventorySlots": slots })))
                .unwrap();
            prop_assert_eq!(preset.inventory_slots.len(), INVENTORY_SLOT_COUNT);
            prop_assert_eq!(preset.equipment_slots.len(), EQUIPMENT_SLOT_COUNT);
        }
    }
}
