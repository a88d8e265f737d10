//! The canonical preset model and the pipeline around it.
//!
//! # Modules
//!
//! - `schema` - canonical shapes and the blank template
//! - `validate` - coercing validator with boundary-dependent strictness
//! - `normalize` - raw-document normalization and legacy migration
//! - `compare` - dirty-state comparison against a persisted baseline
//! - `summary` - recency-list summaries

pub mod compare;
pub mod normalize;
pub mod schema;
pub mod summary;
pub mod validate;

pub use compare::DirtyTracker;
pub use normalize::{Normalizer, RawPresetDocument};
pub use schema::{
    BreakdownEntry, FamiliarSlots, Preset, RelicSlots, SlotRef, SlotType, EQUIPMENT_SLOT_COUNT,
    INVENTORY_SLOT_COUNT,
};
pub use summary::{PresetSummary, StorageMode};
pub use validate::{validate_at, Boundary};
