//! Canonical preset shapes.
//!
//! A preset stores identifier-only slot references; names and images are
//! resolved against the entity catalog at render time.

use serde::{Deserialize, Serialize};

/// Fixed inventory size.
pub const INVENTORY_SLOT_COUNT: usize = 28;

/// Fixed equipment size. The index ↔ equipment-category mapping is fixed and
/// external to this core.
pub const EQUIPMENT_SLOT_COUNT: usize = 13;

/// Default relic/familiar prefills of the blank template.
const PRIMARY_RELIC_COUNT: usize = 3;
const ALTERNATIVE_RELIC_COUNT: usize = 3;
const PRIMARY_FAMILIAR_COUNT: usize = 1;
const ALTERNATIVE_FAMILIAR_COUNT: usize = 3;

/// A single slot assignment. The empty string means "unassigned".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRef {
    #[serde(default)]
    pub id: String,
}

impl SlotRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The unassigned reference.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_unassigned(&self) -> bool {
        self.id.is_empty()
    }
}

/// Which fixed slot array an annotation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    Inventory,
    Equipment,
}

/// One free-text annotation, keyed by (slot type, slot index).
///
/// The model itself does not deduplicate; later entries for the same key
/// shadow earlier ones from a consumer's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub slot_type: SlotType,
    pub slot_index: usize,
    #[serde(default)]
    pub description: String,
}

/// Relic slot collections. Always present, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelicSlots {
    #[serde(default)]
    pub primary_relics: Vec<SlotRef>,
    #[serde(default)]
    pub alternative_relics: Vec<SlotRef>,
}

/// Familiar slot collections. Always present, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamiliarSlots {
    #[serde(default)]
    pub primary_familiars: Vec<SlotRef>,
    #[serde(default)]
    pub alternative_familiars: Vec<SlotRef>,
}

/// The canonical, persisted preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    #[serde(default)]
    pub preset_name: String,
    #[serde(default)]
    pub preset_notes: String,
    #[serde(default)]
    pub inventory_slots: Vec<SlotRef>,
    #[serde(default)]
    pub equipment_slots: Vec<SlotRef>,
    #[serde(default)]
    pub relics: RelicSlots,
    #[serde(default)]
    pub familiars: FamiliarSlots,
    #[serde(default)]
    pub breakdown: Vec<BreakdownEntry>,
}

fn blank_slots(len: usize) -> Vec<SlotRef> {
    (0..len).map(|_| SlotRef::empty()).collect()
}

impl Preset {
    /// The blank template used when creating a new preset.
    pub fn empty() -> Self {
        Self {
            preset_name: String::new(),
            preset_notes: String::new(),
            inventory_slots: blank_slots(INVENTORY_SLOT_COUNT),
            equipment_slots: blank_slots(EQUIPMENT_SLOT_COUNT),
            relics: RelicSlots {
                primary_relics: blank_slots(PRIMARY_RELIC_COUNT),
                alternative_relics: blank_slots(ALTERNATIVE_RELIC_COUNT),
            },
            familiars: FamiliarSlots {
                primary_familiars: blank_slots(PRIMARY_FAMILIAR_COUNT),
                alternative_familiars: blank_slots(ALTERNATIVE_FAMILIAR_COUNT),
            },
            breakdown: Vec::new(),
        }
    }
}
